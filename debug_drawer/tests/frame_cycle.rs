//! Frame-cycle integration tests for the debug draw crate.
//!
//! Everything runs headless through a [`RecordingSubmitter`], which keeps a
//! copy of each payload the render hook hands out.

use rstest::rstest;

use lilium_debug_draw::{
    BatchKind, BatchMaterials, BatchPayload, BatchSubmitter, DebugDraw, DebugDrawConfig,
    DrawTarget, FrameView, GlyphQuad, MaterialHandle, Position, QuadColors, QuadSpace,
    RecordingSubmitter, SharedDebugDraw, Topology, colors,
};

const UNIT_SQUARE: [Position; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn debug_draw(initial_capacity: usize) -> DebugDraw {
    init_logging();
    DebugDraw::new(DebugDrawConfig::new().with_initial_capacity(initial_capacity)).unwrap()
}

fn render(draw: &mut DebugDraw) -> RecordingSubmitter {
    let mut submitter = RecordingSubmitter::new();
    draw.on_frame_render(&FrameView::default(), &mut submitter);
    submitter
}

// ============================================================================
// Lines
// ============================================================================

#[rstest]
#[case::none(0)]
#[case::one(1)]
#[case::within_capacity(7)]
#[case::one_growth(12)]
#[case::burst(100)]
fn test_line_payload_matches_calls(#[case] n: usize) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();

    for i in 0..n {
        let x = i as f32;
        draw.draw_line_gradient([x, 0.0, 0.0], [x, 1.0, 0.0], colors::RED, colors::BLUE);
    }

    let submitter = render(&mut draw);
    if n == 0 {
        assert!(submitter.find(BatchKind::Lines).is_none());
        return;
    }

    let lines = submitter.find(BatchKind::Lines).unwrap();
    assert_eq!(lines.topology, Topology::Lines);
    assert_eq!(lines.positions.len(), 2 * n);
    assert_eq!(lines.indices.len(), 2 * n);
    for i in 0..n {
        let x = i as f32;
        assert_eq!(lines.positions[2 * i], [x, 0.0, 0.0]);
        assert_eq!(lines.positions[2 * i + 1], [x, 1.0, 0.0]);
        assert_eq!(lines.colors[2 * i], colors::RED);
        assert_eq!(lines.colors[2 * i + 1], colors::BLUE);
        assert_eq!(lines.indices[2 * i], 2 * i as u32);
        assert_eq!(lines.indices[2 * i + 1], 2 * i as u32 + 1);
    }
}

// ============================================================================
// Quads
// ============================================================================

#[rstest]
#[case::single(1)]
#[case::several(5)]
#[case::past_capacity(40)]
fn test_quad_counts_and_triangles(#[case] n: usize) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();

    for _ in 0..n {
        draw.draw_filled_quad(&UNIT_SQUARE, colors::GREEN.into());
    }

    let submitter = render(&mut draw);
    let quads = submitter.find(BatchKind::Quads(QuadSpace::World)).unwrap();
    assert_eq!(quads.topology, Topology::Triangles);
    assert_eq!(quads.positions.len(), 4 * n);
    assert_eq!(quads.indices.len(), 6 * n);
    for (q, chunk) in quads.indices.chunks(6).enumerate() {
        let base = 4 * q as u32;
        assert_eq!(chunk, [base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

#[rstest]
#[case::uniform(vec![colors::BLUE], [colors::BLUE; 4])]
#[case::per_corner(
    vec![colors::RED, colors::GREEN, colors::BLUE, colors::YELLOW],
    [colors::RED, colors::GREEN, colors::BLUE, colors::YELLOW]
)]
fn test_quad_color_rules(#[case] input: Vec<[f32; 4]>, #[case] expected: [[f32; 4]; 4]) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    draw.draw_filled_quad_slice(&UNIT_SQUARE, &input).unwrap();

    let submitter = render(&mut draw);
    let quads = submitter.find(BatchKind::Quads(QuadSpace::World)).unwrap();
    assert_eq!(quads.colors, expected);
}

#[rstest]
#[case::empty(0)]
#[case::two(2)]
#[case::three(3)]
#[case::five(5)]
fn test_quad_color_length_rejected(#[case] len: usize) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    let input = vec![colors::WHITE; len];

    assert!(draw.draw_filled_quad_slice(&UNIT_SQUARE, &input).is_err());
    assert!(draw.batches().is_empty());
}

#[rstest]
#[case::two(
    vec![colors::RED, colors::GREEN],
    [colors::RED, colors::GREEN, colors::GREEN, colors::GREEN]
)]
#[case::three(
    vec![colors::RED, colors::GREEN, colors::BLUE],
    [colors::RED, colors::GREEN, colors::BLUE, colors::BLUE]
)]
fn test_wire_quad_short_colors_repeat_last(
    #[case] input: Vec<[f32; 4]>,
    #[case] corners: [[f32; 4]; 4],
) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    draw.draw_wire_quad_slice(&UNIT_SQUARE, &input).unwrap();

    let submitter = render(&mut draw);
    let lines = submitter.find(BatchKind::Lines).unwrap();
    assert_eq!(lines.positions.len(), 8);
    for edge in 0..4 {
        let next = (edge + 1) % 4;
        assert_eq!(lines.positions[2 * edge], UNIT_SQUARE[edge]);
        assert_eq!(lines.positions[2 * edge + 1], UNIT_SQUARE[next]);
        assert_eq!(lines.colors[2 * edge], corners[edge]);
        assert_eq!(lines.colors[2 * edge + 1], corners[next]);
    }
}

#[rstest]
#[case::empty(0)]
#[case::five(5)]
fn test_wire_quad_color_length_rejected(#[case] len: usize) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    let input = vec![colors::WHITE; len];

    assert!(draw.draw_wire_quad_slice(&UNIT_SQUARE, &input).is_err());
    assert!(draw.batches().is_empty());
}

#[rstest]
#[case::three(3)]
#[case::five(5)]
fn test_quad_corner_length_rejected(#[case] len: usize) {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    let corners: Vec<Position> = vec![[0.0; 3]; len];
    assert!(draw
        .draw_filled_quad_slice(&corners, &[colors::WHITE])
        .is_err());
    assert!(draw.batches().is_empty());
}

// ============================================================================
// Buffer lifecycle
// ============================================================================

#[test]
fn test_clear_is_idempotent() {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    draw.draw_line([0.0; 3], [1.0; 3], colors::WHITE);
    let capacity = draw.batches().lines.buffer().capacity();

    draw.on_frame_start();
    draw.on_frame_start();

    let lines = draw.batches().lines.buffer();
    assert_eq!(lines.vertex_count(), 0);
    assert_eq!(lines.index_count(), 0);
    assert_eq!(lines.capacity(), capacity);
}

#[test]
fn test_growth_keeps_earlier_geometry() {
    let mut draw = debug_draw(8);
    draw.on_frame_start();

    for i in 0..4 {
        draw.draw_line([i as f32; 3], [i as f32 + 0.5; 3], colors::WHITE);
    }
    let before = draw.batches().lines.build().positions.to_vec();
    let indices_before = draw.batches().lines.build().indices.to_vec();
    let capacity_before = draw.batches().lines.buffer().capacity();

    for i in 4..20 {
        draw.draw_line([i as f32; 3], [i as f32 + 0.5; 3], colors::WHITE);
    }

    let lines = draw.batches().lines.build();
    assert_eq!(&lines.positions[..before.len()], before.as_slice());
    assert_eq!(&lines.indices[..indices_before.len()], indices_before.as_slice());
    assert!(draw.batches().lines.buffer().capacity() > capacity_before);
}

#[test]
fn test_frame_isolation() {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    draw.draw_line([0.0; 3], [1.0; 3], colors::RED);
    draw.draw_filled_quad(&UNIT_SQUARE, colors::RED.into());
    assert_eq!(render(&mut draw).len(), 2);

    draw.on_frame_start();
    assert_eq!(draw.batches().vertex_count(), 0);

    draw.draw_line([5.0; 3], [6.0; 3], colors::GREEN);
    let submitter = render(&mut draw);
    assert_eq!(submitter.len(), 1);
    let lines = submitter.find(BatchKind::Lines).unwrap();
    assert_eq!(lines.positions, vec![[5.0; 3], [6.0; 3]]);
}

#[test]
fn test_end_to_end_line_and_quad() {
    let mut draw = debug_draw(DebugDrawConfig::default().initial_capacity);
    draw.on_frame_start();

    draw.draw_line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], colors::RED);
    draw.draw_filled_quad(&UNIT_SQUARE, QuadColors::Uniform(colors::BLUE));

    let submitter = render(&mut draw);
    assert_eq!(submitter.len(), 2);

    let lines = submitter.find(BatchKind::Lines).unwrap();
    assert_eq!(lines.positions.len(), 2);
    assert_eq!(lines.indices, vec![0, 1]);
    assert_eq!(lines.colors, vec![colors::RED; 2]);

    let quads = submitter.find(BatchKind::Quads(QuadSpace::World)).unwrap();
    assert_eq!(quads.topology, Topology::Triangles);
    assert_eq!(quads.positions.len(), 4);
    assert_eq!(quads.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(quads.colors, vec![colors::BLUE; 4]);
}

// ============================================================================
// Overflow reporting and multi-camera render
// ============================================================================

#[test]
fn test_soft_ceiling_reported_for_offending_frame_only() {
    init_logging();
    let config = DebugDrawConfig::new()
        .with_initial_capacity(64)
        .with_soft_vertex_ceiling(10);
    let mut draw = DebugDraw::new(config).unwrap();

    draw.on_frame_start();
    for _ in 0..6 {
        draw.draw_line([0.0; 3], [1.0; 3], colors::WHITE);
    }
    let report = draw.on_frame_render(&FrameView::default(), &mut RecordingSubmitter::new());
    assert!(report.overflowed);
    assert_eq!(report.submitted, 1);

    draw.on_frame_start();
    draw.draw_line([0.0; 3], [1.0; 3], colors::WHITE);
    let report = draw.on_frame_render(&FrameView::default(), &mut RecordingSubmitter::new());
    assert!(!report.overflowed);
}

#[test]
fn test_repeated_growth_reported() {
    let mut draw = debug_draw(4);
    draw.on_frame_start();
    for i in 0..8 {
        draw.draw_line([i as f32; 3], [1.0; 3], colors::WHITE);
    }
    let report = draw.on_frame_render(&FrameView::default(), &mut RecordingSubmitter::new());
    let lines = report
        .batches
        .iter()
        .find(|b| b.kind == BatchKind::Lines)
        .unwrap();
    assert!(lines.growth_steps > 1);
    assert!(report.overflowed);
}

#[test]
fn test_single_burst_spanning_increments_reported() {
    let mut draw = debug_draw(4);
    draw.on_frame_start();
    let glyph = GlyphQuad {
        positions: UNIT_SQUARE,
        uvs: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    };
    draw.draw_text_run(&vec![glyph; 1000], [0.0; 3], colors::WHITE);

    let report = draw.on_frame_render(&FrameView::default(), &mut RecordingSubmitter::new());
    let glyphs = report
        .batches
        .iter()
        .find(|b| b.kind == BatchKind::Glyphs)
        .unwrap();
    assert_eq!(glyphs.vertices, 4000);
    assert_eq!(glyphs.capacity, 4000);
    assert_eq!(draw.batches().glyphs.buffer().reallocations(), 1);
    assert_eq!(glyphs.growth_steps, 999);
    assert!(report.overflowed);
}

#[test]
fn test_multi_camera_renders_same_payloads() {
    let mut draw = debug_draw(16);
    draw.on_frame_start();
    draw.draw_wire_quad(&UNIT_SQUARE, colors::YELLOW.into());

    let mut submitter = RecordingSubmitter::new();
    let left = FrameView::new([[1.0; 4]; 4], [640.0, 480.0]);
    let right = FrameView::new([[2.0; 4]; 4], [640.0, 480.0]);
    draw.on_frame_render(&left, &mut submitter);
    draw.on_frame_render(&right, &mut submitter);

    let submissions = submitter.take();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].0, left);
    assert_eq!(submissions[1].0, right);
    assert_eq!(submissions[0].1, submissions[1].1);
    assert_eq!(submissions[0].1.positions.len(), 8);
}

// ============================================================================
// Glyphs, materials, closures as submitters
// ============================================================================

#[test]
fn test_text_run_and_materials() {
    init_logging();
    let materials = BatchMaterials {
        lines: MaterialHandle(10),
        glyphs: MaterialHandle(20),
        ..BatchMaterials::default()
    };
    let mut draw = DebugDraw::new(
        DebugDrawConfig::new()
            .with_initial_capacity(8)
            .with_materials(materials),
    )
    .unwrap();
    draw.on_frame_start();

    let glyphs: Vec<GlyphQuad> = (0..3)
        .map(|i| {
            let x = i as f32 * 8.0;
            GlyphQuad {
                positions: [
                    [x, 0.0, 0.0],
                    [x + 8.0, 0.0, 0.0],
                    [x + 8.0, 16.0, 0.0],
                    [x, 16.0, 0.0],
                ],
                uvs: [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            }
        })
        .collect();
    draw.draw_text_run(&glyphs, [100.0, 50.0, 0.0], colors::WHITE);

    let mut submitter = SummarySubmitter::default();
    draw.on_frame_render(&FrameView::default(), &mut submitter);

    assert_eq!(
        submitter.seen,
        vec![(BatchKind::Glyphs, MaterialHandle(20), 18)]
    );
    assert_eq!(submitter.glyph_vertices, 12);
}

/// Keeps only kind, material and index count, the way a renderer would
/// bind one pipeline per payload.
#[derive(Default)]
struct SummarySubmitter {
    seen: Vec<(BatchKind, MaterialHandle, usize)>,
    glyph_vertices: usize,
}

impl BatchSubmitter for SummarySubmitter {
    fn submit(&mut self, _view: &FrameView, payload: &BatchPayload<'_>) {
        self.seen
            .push((payload.kind, payload.material, payload.geometry.index_count()));
        if let Some(vertices) = payload.geometry.interleaved_glyphs() {
            self.glyph_vertices += vertices.len();
        }
    }
}

#[test]
fn test_shared_recorders_from_threads() {
    init_logging();
    let shared = SharedDebugDraw::new(DebugDrawConfig::new().with_initial_capacity(32)).unwrap();
    shared.on_frame_start();

    std::thread::scope(|scope| {
        for t in 0..4 {
            let shared = &shared;
            scope.spawn(move || {
                let mut rec = shared.recorder().unwrap();
                for i in 0..10 {
                    let (x, y) = (t as f32, i as f32);
                    rec.draw_line([x, y, 0.0], [x, y, 1.0], colors::WHITE);
                }
            });
        }
    });

    let mut submitter = RecordingSubmitter::new();
    shared.on_frame_render(&FrameView::default(), &mut submitter);
    let lines = submitter.find(BatchKind::Lines).unwrap();
    assert_eq!(lines.positions.len(), 80);
    assert_eq!(lines.indices, (0..80).collect::<Vec<u32>>());
}
