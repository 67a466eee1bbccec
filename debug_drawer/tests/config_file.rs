//! Loading [`DebugDrawConfig`] from TOML the way a host's settings file would.

use rstest::rstest;

use lilium_debug_draw::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_RECORDER_CAPACITY, DebugDraw, DebugDrawConfig,
    DebugDrawError, MaterialHandle,
};

#[test]
fn test_empty_file_uses_defaults() {
    let config: DebugDrawConfig = toml::from_str("").unwrap();
    assert_eq!(config, DebugDrawConfig::default());
    assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    assert_eq!(config.recorder_capacity, DEFAULT_RECORDER_CAPACITY);
}

#[test]
fn test_full_file() {
    let config: DebugDrawConfig = toml::from_str(
        r#"
        initial_capacity = 4096
        soft_vertex_ceiling = 200000
        recorder_capacity = 64
        enabled = false

        [materials]
        lines = 1
        world_quads = 2
        glyphs = 7
        "#,
    )
    .unwrap();

    assert_eq!(config.initial_capacity, 4096);
    assert_eq!(config.soft_vertex_ceiling, Some(200_000));
    assert_eq!(config.recorder_capacity, 64);
    assert!(!config.enabled);
    assert_eq!(config.materials.lines, MaterialHandle(1));
    assert_eq!(config.materials.world_quads, MaterialHandle(2));
    assert_eq!(config.materials.pixel_screen_quads, MaterialHandle(0));
    assert_eq!(config.materials.glyphs, MaterialHandle(7));

    let draw = DebugDraw::new(config).unwrap();
    assert!(!draw.is_enabled());
}

#[rstest]
#[case::zero_capacity("initial_capacity = 0")]
#[case::zero_recorder("recorder_capacity = 0")]
#[case::zero_ceiling("soft_vertex_ceiling = 0")]
fn test_invalid_values_rejected_at_construction(#[case] source: &str) {
    let config: DebugDrawConfig = toml::from_str(source).unwrap();
    assert!(matches!(
        DebugDraw::new(config),
        Err(DebugDrawError::InvalidConfig(_))
    ));
}

#[test]
fn test_round_trip_through_toml() {
    let config = DebugDrawConfig::new()
        .with_initial_capacity(1024)
        .with_soft_vertex_ceiling(50_000);
    let text = toml::to_string(&config).unwrap();
    let parsed: DebugDrawConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
