//! Kind-specific batches over [`GeometryBuffer`](crate::buffer::GeometryBuffer).
//!
//! - [`LineBatch`] - line list, 2 vertices / 2 indices per segment
//! - [`QuadBatch`] - triangle list, 4 vertices / 6 indices per quad
//! - [`GlyphBatch`] - textured triangle list, 4 vertices / 6 indices per glyph
//! - [`FrameBatches`] - every batch one frame accumulates into

mod glyph;
mod line;
mod quad;

pub use glyph::{GlyphBatch, GlyphQuad};
pub use line::LineBatch;
pub use quad::{QuadBatch, QuadSpace, push_wire_quad};

pub(crate) use quad::quad_corners;

use crate::buffer::GeometryBuffer;
use crate::config::BatchMaterials;
use crate::error::DebugDrawError;
use crate::submit::{BatchKind, BatchPayload};

/// The full set of batches a frame's draw calls land in.
///
/// Emission order is fixed: lines, world quads, pixel-screen quads,
/// normalized-screen quads, glyphs.
#[derive(Debug)]
pub struct FrameBatches {
    pub lines: LineBatch,
    pub world_quads: QuadBatch,
    pub pixel_screen_quads: QuadBatch,
    pub normalized_screen_quads: QuadBatch,
    pub glyphs: GlyphBatch,
}

impl FrameBatches {
    /// Create every batch with the same starting capacity.
    pub fn new(
        initial_capacity: usize,
        materials: &BatchMaterials,
    ) -> Result<Self, DebugDrawError> {
        Ok(Self {
            lines: LineBatch::new(initial_capacity, materials.lines)?,
            world_quads: QuadBatch::new(
                initial_capacity,
                materials.world_quads,
                QuadSpace::World,
            )?,
            pixel_screen_quads: QuadBatch::new(
                initial_capacity,
                materials.pixel_screen_quads,
                QuadSpace::PixelScreen,
            )?,
            normalized_screen_quads: QuadBatch::new(
                initial_capacity,
                materials.normalized_screen_quads,
                QuadSpace::NormalizedScreen,
            )?,
            glyphs: GlyphBatch::new(initial_capacity, materials.glyphs)?,
        })
    }

    /// Quad batch for a coordinate space.
    pub fn quads(&self, space: QuadSpace) -> &QuadBatch {
        match space {
            QuadSpace::World => &self.world_quads,
            QuadSpace::PixelScreen => &self.pixel_screen_quads,
            QuadSpace::NormalizedScreen => &self.normalized_screen_quads,
        }
    }

    /// Mutable quad batch for a coordinate space.
    pub fn quads_mut(&mut self, space: QuadSpace) -> &mut QuadBatch {
        match space {
            QuadSpace::World => &mut self.world_quads,
            QuadSpace::PixelScreen => &mut self.pixel_screen_quads,
            QuadSpace::NormalizedScreen => &mut self.normalized_screen_quads,
        }
    }

    /// Every batch with its kind, in emission order.
    pub fn buffers(&self) -> [(BatchKind, &GeometryBuffer); 5] {
        let [world, pixel_screen, normalized_screen] =
            QuadSpace::ALL.map(|space| (BatchKind::Quads(space), self.quads(space).buffer()));
        [
            (BatchKind::Lines, self.lines.buffer()),
            world,
            pixel_screen,
            normalized_screen,
            (BatchKind::Glyphs, self.glyphs.buffer()),
        ]
    }

    /// Build the payload of every non-empty batch, in emission order.
    pub fn payloads(&self) -> Vec<BatchPayload<'_>> {
        let [world, pixel_screen, normalized_screen] =
            QuadSpace::ALL.map(|space| self.quads(space).material());
        let materials = [
            self.lines.material(),
            world,
            pixel_screen,
            normalized_screen,
            self.glyphs.material(),
        ];
        self.buffers()
            .into_iter()
            .zip(materials)
            .filter(|((_, buffer), _)| !buffer.is_empty())
            .map(|((kind, buffer), material)| BatchPayload {
                kind,
                material,
                geometry: buffer.build(),
            })
            .collect()
    }

    /// Check if no batch holds geometry.
    pub fn is_empty(&self) -> bool {
        self.buffers().iter().all(|(_, buffer)| buffer.is_empty())
    }

    /// Total live vertices across every batch.
    pub fn vertex_count(&self) -> usize {
        self.buffers()
            .iter()
            .map(|(_, buffer)| buffer.vertex_count())
            .sum()
    }

    /// Reset every batch, keeping allocations.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.world_quads.clear();
        self.pixel_screen_quads.clear();
        self.normalized_screen_quads.clear();
        self.glyphs.clear();
    }

    /// Append everything `other` holds, batch by batch.
    pub fn extend_from(&mut self, other: &FrameBatches) -> Result<(), DebugDrawError> {
        self.lines.extend_from(&other.lines)?;
        self.world_quads.extend_from(&other.world_quads)?;
        self.pixel_screen_quads
            .extend_from(&other.pixel_screen_quads)?;
        self.normalized_screen_quads
            .extend_from(&other.normalized_screen_quads)?;
        self.glyphs.extend_from(&other.glyphs)?;
        Ok(())
    }
}
