//! Debug draw configuration.
//!
//! Hosts either build a [`DebugDrawConfig`] with the `with_*` methods or load
//! it from a config file through serde:
//!
//! ```ignore
//! let config: DebugDrawConfig = toml::from_str(r#"
//!     initial_capacity = 4096
//!     soft_vertex_ceiling = 200000
//!
//!     [materials]
//!     lines = 1
//!     glyphs = 7
//! "#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DebugDrawError;

/// Default starting capacity (and growth increment) of every batch, in vertices.
pub const DEFAULT_INITIAL_CAPACITY: usize = u16::MAX as usize;

/// Default starting capacity of the batches owned by a
/// [`DrawRecorder`](crate::DrawRecorder).
pub const DEFAULT_RECORDER_CAPACITY: usize = 256;

/// Opaque host handle to the material/shader a batch is submitted with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MaterialHandle(pub u32);

/// Material used by each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchMaterials {
    pub lines: MaterialHandle,
    pub world_quads: MaterialHandle,
    pub pixel_screen_quads: MaterialHandle,
    pub normalized_screen_quads: MaterialHandle,
    pub glyphs: MaterialHandle,
}

/// Configuration of a [`DebugDraw`](crate::DebugDraw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    /// Starting vertex capacity of each batch. Also the growth increment.
    pub initial_capacity: usize,
    /// Vertex count per batch above which a frame is reported as overflowing.
    pub soft_vertex_ceiling: Option<usize>,
    /// Starting vertex capacity of recorder-local batches.
    pub recorder_capacity: usize,
    /// Whether pushes are accepted at startup.
    pub enabled: bool,
    pub materials: BatchMaterials,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            soft_vertex_ceiling: None,
            recorder_capacity: DEFAULT_RECORDER_CAPACITY,
            enabled: true,
            materials: BatchMaterials::default(),
        }
    }
}

impl DebugDrawConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting capacity and growth increment.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the per-batch soft vertex ceiling.
    pub fn with_soft_vertex_ceiling(mut self, ceiling: usize) -> Self {
        self.soft_vertex_ceiling = Some(ceiling);
        self
    }

    /// Set the starting capacity of recorder-local batches.
    pub fn with_recorder_capacity(mut self, capacity: usize) -> Self {
        self.recorder_capacity = capacity;
        self
    }

    /// Start enabled or disabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the materials batches are submitted with.
    pub fn with_materials(mut self, materials: BatchMaterials) -> Self {
        self.materials = materials;
        self
    }

    /// Check that the config can be used to build buffers.
    pub fn validate(&self) -> Result<(), DebugDrawError> {
        if self.initial_capacity == 0 {
            return Err(DebugDrawError::InvalidConfig(
                "initial_capacity must be non-zero".to_string(),
            ));
        }
        if self.recorder_capacity == 0 {
            return Err(DebugDrawError::InvalidConfig(
                "recorder_capacity must be non-zero".to_string(),
            ));
        }
        if self.soft_vertex_ceiling == Some(0) {
            return Err(DebugDrawError::InvalidConfig(
                "soft_vertex_ceiling must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebugDrawConfig::default();
        assert_eq!(config.initial_capacity, 65535);
        assert_eq!(config.soft_vertex_ceiling, None);
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DebugDrawConfig::new()
            .with_initial_capacity(16)
            .with_soft_vertex_ceiling(64)
            .with_recorder_capacity(8)
            .with_enabled(false);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.soft_vertex_ceiling, Some(64));
        assert_eq!(config.recorder_capacity, 8);
        assert!(!config.enabled);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = DebugDrawConfig::new().with_initial_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(DebugDrawError::InvalidConfig(_))
        ));

        let config = DebugDrawConfig::new().with_recorder_capacity(0);
        assert!(config.validate().is_err());

        let config = DebugDrawConfig::new().with_soft_vertex_ceiling(0);
        assert!(config.validate().is_err());
    }
}
