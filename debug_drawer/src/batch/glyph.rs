use glam::Vec3;

use super::quad::{append_quad_indices, quad_corners};
use crate::buffer::{GeometryBuffer, IndexRatio, RenderableGeometry, Topology};
use crate::config::MaterialHandle;
use crate::error::DebugDrawError;
use crate::vertex::{Color, Position, QuadColors, Uv};

/// One pre-shaped glyph: a textured quad relative to its string origin.
///
/// Produced by the host's text shaper; corner order and winding follow the
/// same rule as [`QuadBatch`](super::QuadBatch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub positions: [Position; 4],
    pub uvs: [Uv; 4],
}

/// Textured triangle-list batch for glyph quads.
#[derive(Debug)]
pub struct GlyphBatch {
    buffer: GeometryBuffer,
    material: MaterialHandle,
}

impl GlyphBatch {
    /// Create a glyph batch holding `initial_capacity` vertices before growing.
    pub fn new(initial_capacity: usize, material: MaterialHandle) -> Result<Self, DebugDrawError> {
        Ok(Self {
            buffer: GeometryBuffer::new(
                Topology::Triangles,
                IndexRatio::QUAD,
                initial_capacity,
                true,
            )?,
            material,
        })
    }

    /// Append one glyph quad translated by `offset`.
    pub fn push_glyph_quad(
        &mut self,
        glyph: &GlyphQuad,
        colors: QuadColors,
        offset: Position,
    ) -> Result<(), DebugDrawError> {
        self.buffer.reserve_slots(4, 6)?;
        self.append_glyph(glyph, colors, offset);
        Ok(())
    }

    /// Append one glyph quad from unchecked slices.
    ///
    /// Rejects anything but exactly 4 positions, 4 uvs and 1 or 4 colors.
    pub fn push_glyph_quad_slice(
        &mut self,
        positions: &[Position],
        uvs: &[Uv],
        colors: &[Color],
        offset: Position,
    ) -> Result<(), DebugDrawError> {
        let positions = *quad_corners(positions)?;
        let uvs: [Uv; 4] = uvs
            .try_into()
            .map_err(|_| DebugDrawError::ContractViolation {
                what: "glyph uvs",
                expected: "4",
                got: uvs.len(),
            })?;
        let colors = QuadColors::try_from(colors)?;
        self.push_glyph_quad(&GlyphQuad { positions, uvs }, colors, offset)
    }

    /// Append a run of glyphs sharing one origin, reserving space once.
    pub fn push_glyph_run(
        &mut self,
        glyphs: &[GlyphQuad],
        origin: Position,
        colors: QuadColors,
    ) -> Result<(), DebugDrawError> {
        let exhausted = || DebugDrawError::CapacityExhausted {
            requested_vertices: usize::MAX,
            requested_indices: usize::MAX,
        };
        let vertices = glyphs.len().checked_mul(4).ok_or_else(exhausted)?;
        let indices = glyphs.len().checked_mul(6).ok_or_else(exhausted)?;
        self.buffer.reserve_slots(vertices, indices)?;

        for glyph in glyphs {
            self.append_glyph(glyph, colors, origin);
        }
        Ok(())
    }

    /// Number of glyphs pushed since the last clear.
    pub fn glyph_count(&self) -> usize {
        self.buffer.index_count() / 6
    }

    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    pub fn buffer(&self) -> &GeometryBuffer {
        &self.buffer
    }

    pub fn build(&self) -> RenderableGeometry<'_> {
        self.buffer.build()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub(crate) fn extend_from(&mut self, other: &GlyphBatch) -> Result<bool, DebugDrawError> {
        self.buffer.extend_from(&other.buffer)
    }

    fn append_glyph(&mut self, glyph: &GlyphQuad, colors: QuadColors, offset: Position) {
        let offset = Vec3::from(offset);
        let corner = |i: usize| (Vec3::from(glyph.positions[i]) + offset).to_array();

        let base = self
            .buffer
            .append_vertex(corner(0), colors.corner(0), Some(glyph.uvs[0]));
        for i in 1..4 {
            self.buffer
                .append_vertex(corner(i), colors.corner(i), Some(glyph.uvs[i]));
        }
        append_quad_indices(&mut self.buffer, base);
    }
}
