//! Growable geometry storage shared by every batch kind.
//!
//! A [`GeometryBuffer`] owns parallel position / color / (optional) uv arrays
//! plus an index list. Storage is allocated up front for `capacity` vertices
//! and grows in fixed chunks of the starting capacity, never by doubling and
//! never shrinking. [`clear`](GeometryBuffer::clear) resets the live counts
//! and keeps the allocation, so a steady frame load does not allocate.
//!
//! # Usage
//!
//! ```ignore
//! let mut buffer = GeometryBuffer::new(Topology::Lines, IndexRatio::LINE, 1024, false)?;
//!
//! buffer.reserve_slots(2, 2)?;
//! let a = buffer.append_vertex([0.0; 3], colors::RED, None);
//! let b = buffer.append_vertex([1.0; 3], colors::RED, None);
//! buffer.append_index(a);
//! buffer.append_index(b);
//!
//! let geometry = buffer.build();
//! host.draw(geometry.positions, geometry.colors, geometry.indices);
//!
//! buffer.clear();
//! ```

use crate::error::DebugDrawError;
use crate::vertex::{Color, DebugGlyphVertex, DebugVertex, Position, Uv};

/// How indices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every two indices form a line segment.
    Lines,
    /// Every three indices form a triangle.
    Triangles,
}

impl Topology {
    /// Number of indices consumed per primitive.
    pub fn indices_per_primitive(&self) -> usize {
        match self {
            Self::Lines => 2,
            Self::Triangles => 3,
        }
    }
}

/// Append rule of a batch: every group of `vertices` vertices produces
/// `indices` indices.
///
/// Used to size the index array proportionally to the vertex capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRatio {
    pub vertices: usize,
    pub indices: usize,
}

impl IndexRatio {
    /// One line segment: 2 vertices, 2 indices.
    pub const LINE: Self = Self {
        vertices: 2,
        indices: 2,
    };

    /// One quad split into two triangles: 4 vertices, 6 indices.
    pub const QUAD: Self = Self {
        vertices: 4,
        indices: 6,
    };

    /// Index capacity matching a vertex capacity.
    fn index_capacity(&self, vertex_capacity: usize) -> Option<usize> {
        Some(
            vertex_capacity
                .checked_mul(self.indices)?
                .div_ceil(self.vertices),
        )
    }

    /// Vertex capacity needed to hold `index_count` indices.
    fn vertex_capacity_for(&self, index_count: usize) -> Option<usize> {
        Some(index_count.checked_mul(self.vertices)?.div_ceil(self.indices))
    }
}

/// Growable vertex/color/uv/index storage with chunked growth.
///
/// Invariants:
/// - `vertex_count() <= capacity()` and `index_count() <= index_capacity()`
/// - positions, colors and (when enabled) uvs always hold the same count
/// - capacity only grows
pub struct GeometryBuffer {
    topology: Topology,
    ratio: IndexRatio,
    positions: Vec<Position>,
    colors: Vec<Color>,
    uvs: Option<Vec<Uv>>,
    indices: Vec<u32>,
    capacity: usize,
    index_capacity: usize,
    growth_increment: usize,
    growth_steps: usize,
    reallocations: usize,
}

impl GeometryBuffer {
    /// Create a buffer able to hold `initial_capacity` vertices.
    ///
    /// `initial_capacity` is also the growth increment.
    pub fn new(
        topology: Topology,
        ratio: IndexRatio,
        initial_capacity: usize,
        with_uvs: bool,
    ) -> Result<Self, DebugDrawError> {
        if initial_capacity == 0 {
            return Err(DebugDrawError::InvalidConfig(
                "geometry buffer capacity cannot be zero".to_string(),
            ));
        }
        if ratio.vertices == 0 || ratio.indices == 0 {
            return Err(DebugDrawError::InvalidConfig(format!(
                "index ratio must be non-zero, got {}/{}",
                ratio.indices, ratio.vertices
            )));
        }

        let exhausted = || DebugDrawError::CapacityExhausted {
            requested_vertices: initial_capacity,
            requested_indices: 0,
        };
        let index_capacity = ratio.index_capacity(initial_capacity).ok_or_else(exhausted)?;
        if !fits_index_range(initial_capacity) {
            return Err(exhausted());
        }

        let mut buffer = Self {
            topology,
            ratio,
            positions: Vec::new(),
            colors: Vec::new(),
            uvs: with_uvs.then(Vec::new),
            indices: Vec::new(),
            capacity: 0,
            index_capacity: 0,
            growth_increment: initial_capacity,
            growth_steps: 0,
            reallocations: 0,
        };
        buffer.allocate(initial_capacity, index_capacity)?;
        Ok(buffer)
    }

    /// Topology the indices describe.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Append rule used to size the index array.
    pub fn index_ratio(&self) -> IndexRatio {
        self.ratio
    }

    /// Whether per-vertex texture coordinates are stored.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of live indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Check if no geometry has been appended since the last clear.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index capacity.
    pub fn index_capacity(&self) -> usize {
        self.index_capacity
    }

    /// Chunk size capacity grows by.
    pub fn growth_increment(&self) -> usize {
        self.growth_increment
    }

    /// Growth increments added since the last [`clear`](Self::clear).
    ///
    /// A burst sized in one reallocation counts every increment it spans.
    pub fn growth_steps(&self) -> usize {
        self.growth_steps
    }

    /// Reallocations since the last [`clear`](Self::clear).
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Make room for `additional_vertices` vertices and `additional_indices`
    /// indices.
    ///
    /// Grows by one increment when that suffices. Bursts larger than one
    /// increment are sized directly to the next multiple of the increment, so
    /// a single call reallocates at most once. Live data is preserved.
    ///
    /// Returns `true` if the buffer grew.
    pub fn reserve_slots(
        &mut self,
        additional_vertices: usize,
        additional_indices: usize,
    ) -> Result<bool, DebugDrawError> {
        let exhausted = DebugDrawError::CapacityExhausted {
            requested_vertices: self.vertex_count().saturating_add(additional_vertices),
            requested_indices: self.index_count().saturating_add(additional_indices),
        };

        let needed_vertices = self
            .vertex_count()
            .checked_add(additional_vertices)
            .ok_or_else(|| exhausted.clone())?;
        let needed_indices = self
            .index_count()
            .checked_add(additional_indices)
            .ok_or_else(|| exhausted.clone())?;

        if needed_vertices <= self.capacity && needed_indices <= self.index_capacity {
            return Ok(false);
        }

        let mut new_capacity = self
            .capacity
            .checked_add(self.growth_increment)
            .ok_or_else(|| exhausted.clone())?;
        let mut new_index_capacity = self
            .ratio
            .index_capacity(new_capacity)
            .ok_or_else(|| exhausted.clone())?;

        if needed_vertices > new_capacity || needed_indices > new_index_capacity {
            let target = self
                .ratio
                .vertex_capacity_for(needed_indices)
                .ok_or_else(|| exhausted.clone())?
                .max(needed_vertices);
            new_capacity = target
                .div_ceil(self.growth_increment)
                .checked_mul(self.growth_increment)
                .ok_or_else(|| exhausted.clone())?;
            new_index_capacity = self
                .ratio
                .index_capacity(new_capacity)
                .ok_or_else(|| exhausted.clone())?
                .max(needed_indices);
        }

        if !fits_index_range(new_capacity) {
            return Err(exhausted);
        }

        let old_capacity = self.capacity;
        self.allocate(new_capacity, new_index_capacity)
            .map_err(|_| exhausted)?;
        self.growth_steps += (new_capacity - old_capacity) / self.growth_increment;
        self.reallocations += 1;

        log::debug!(
            "{:?} geometry buffer grew to {} vertices / {} indices",
            self.topology,
            new_capacity,
            new_index_capacity
        );
        Ok(true)
    }

    /// Append one vertex and return its index.
    ///
    /// Capacity must have been reserved with
    /// [`reserve_slots`](Self::reserve_slots). `uv` is ignored by buffers
    /// without uvs and defaults to zero in buffers with uvs.
    #[inline]
    pub fn append_vertex(&mut self, position: Position, color: Color, uv: Option<Uv>) -> u32 {
        debug_assert!(
            self.positions.len() < self.capacity,
            "append_vertex without reserved capacity"
        );
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.colors.push(color);
        if let Some(uvs) = &mut self.uvs {
            uvs.push(uv.unwrap_or_default());
        }
        index
    }

    /// Append one index.
    ///
    /// Capacity must have been reserved with
    /// [`reserve_slots`](Self::reserve_slots).
    #[inline]
    pub fn append_index(&mut self, value: u32) {
        debug_assert!(
            self.indices.len() < self.index_capacity,
            "append_index without reserved capacity"
        );
        self.indices.push(value);
    }

    /// Reset the live counts, keeping the allocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        if let Some(uvs) = &mut self.uvs {
            uvs.clear();
        }
        self.indices.clear();
        self.growth_steps = 0;
        self.reallocations = 0;
    }

    /// Borrow the live data for submission.
    ///
    /// Call after the frame's last push and before [`clear`](Self::clear).
    pub fn build(&self) -> RenderableGeometry<'_> {
        RenderableGeometry {
            positions: &self.positions,
            colors: &self.colors,
            uvs: self.uvs.as_deref(),
            indices: &self.indices,
            topology: self.topology,
        }
    }

    /// Append all live data of `other`, rebasing its indices.
    ///
    /// Both buffers must share topology and uv layout.
    pub fn extend_from(&mut self, other: &GeometryBuffer) -> Result<bool, DebugDrawError> {
        if other.topology != self.topology || other.has_uvs() != self.has_uvs() {
            return Err(DebugDrawError::InvalidConfig(format!(
                "cannot merge {:?} buffer (uvs: {}) into {:?} buffer (uvs: {})",
                other.topology,
                other.has_uvs(),
                self.topology,
                self.has_uvs()
            )));
        }
        if other.is_empty() {
            return Ok(false);
        }

        let grew = self.reserve_slots(other.vertex_count(), other.index_count())?;
        let base = self.vertex_count() as u32;

        self.positions.extend_from_slice(&other.positions);
        self.colors.extend_from_slice(&other.colors);
        if let (Some(uvs), Some(other_uvs)) = (&mut self.uvs, &other.uvs) {
            uvs.extend_from_slice(other_uvs);
        }
        self.indices
            .extend(other.indices.iter().map(|index| index + base));

        Ok(grew)
    }

    fn allocate(&mut self, capacity: usize, index_capacity: usize) -> Result<(), DebugDrawError> {
        let exhausted = |_| DebugDrawError::CapacityExhausted {
            requested_vertices: capacity,
            requested_indices: index_capacity,
        };

        let vertex_count = self.positions.len();
        self.positions
            .try_reserve_exact(capacity - vertex_count)
            .map_err(exhausted)?;
        self.colors
            .try_reserve_exact(capacity - vertex_count)
            .map_err(exhausted)?;
        if let Some(uvs) = &mut self.uvs {
            uvs.try_reserve_exact(capacity - vertex_count)
                .map_err(exhausted)?;
        }
        let index_count = self.indices.len();
        self.indices
            .try_reserve_exact(index_capacity - index_count)
            .map_err(exhausted)?;

        self.capacity = capacity;
        self.index_capacity = index_capacity;
        Ok(())
    }
}

impl std::fmt::Debug for GeometryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryBuffer")
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertex_count())
            .field("index_count", &self.index_count())
            .field("capacity", &self.capacity)
            .field("index_capacity", &self.index_capacity)
            .field("uvs", &self.has_uvs())
            .field("growth_steps", &self.growth_steps)
            .field("reallocations", &self.reallocations)
            .finish()
    }
}

/// The live contents of a [`GeometryBuffer`], ready for one draw submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableGeometry<'a> {
    pub positions: &'a [Position],
    pub colors: &'a [Color],
    pub uvs: Option<&'a [Uv]>,
    pub indices: &'a [u32],
    pub topology: Topology,
}

impl RenderableGeometry<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of lines or triangles.
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    /// Interleave positions and colors for a single vertex buffer upload.
    pub fn interleaved(&self) -> Vec<DebugVertex> {
        self.positions
            .iter()
            .zip(self.colors)
            .map(|(&position, &color)| DebugVertex { position, color })
            .collect()
    }

    /// Interleave positions, colors and uvs. `None` without uvs.
    pub fn interleaved_glyphs(&self) -> Option<Vec<DebugGlyphVertex>> {
        let uvs = self.uvs?;
        Some(
            self.positions
                .iter()
                .zip(self.colors)
                .zip(uvs)
                .map(|((&position, &color), &uv)| DebugGlyphVertex {
                    position,
                    color,
                    uv,
                })
                .collect(),
        )
    }

    /// Raw `u32` index data.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Check that every vertex index of a buffer with `capacity` vertices fits `u32`.
#[inline]
fn fits_index_range(capacity: usize) -> bool {
    u32::try_from(capacity.saturating_sub(1)).is_ok()
}
