use serde::{Deserialize, Serialize};

use super::line::LineBatch;
use crate::buffer::{GeometryBuffer, IndexRatio, RenderableGeometry, Topology};
use crate::config::MaterialHandle;
use crate::error::DebugDrawError;
use crate::vertex::{Color, Position, QuadColors};

/// Coordinate space quad corners are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadSpace {
    /// World units, transformed by the camera view-projection.
    World,
    /// Screen pixels, origin at the bottom-left of the viewport.
    PixelScreen,
    /// Normalized screen coordinates in `[0, 1]`.
    NormalizedScreen,
}

impl QuadSpace {
    /// Every space, in emission order.
    pub const ALL: [QuadSpace; 3] = [Self::World, Self::PixelScreen, Self::NormalizedScreen];
}

/// Triangle-list batch of filled quads: 4 vertices and 6 indices per quad.
///
/// Corners are split along the 0-2 diagonal into triangles `(0, 1, 2)` and
/// `(0, 2, 3)`, so they must be given in a consistent winding (e.g.
/// counter-clockwise for a convex planar quad).
#[derive(Debug)]
pub struct QuadBatch {
    buffer: GeometryBuffer,
    material: MaterialHandle,
    space: QuadSpace,
}

impl QuadBatch {
    /// Create a quad batch holding `initial_capacity` vertices before growing.
    pub fn new(
        initial_capacity: usize,
        material: MaterialHandle,
        space: QuadSpace,
    ) -> Result<Self, DebugDrawError> {
        Ok(Self {
            buffer: GeometryBuffer::new(
                Topology::Triangles,
                IndexRatio::QUAD,
                initial_capacity,
                false,
            )?,
            material,
            space,
        })
    }

    /// Append one filled quad.
    pub fn push_quad(
        &mut self,
        corners: &[Position; 4],
        colors: QuadColors,
    ) -> Result<(), DebugDrawError> {
        self.buffer.reserve_slots(4, 6)?;
        let base = self.buffer.append_vertex(corners[0], colors.corner(0), None);
        for (i, corner) in corners.iter().enumerate().skip(1) {
            self.buffer.append_vertex(*corner, colors.corner(i), None);
        }
        append_quad_indices(&mut self.buffer, base);
        Ok(())
    }

    /// Append one filled quad from unchecked slices.
    ///
    /// Rejects anything but exactly 4 corners and 1 or 4 colors.
    pub fn push_quad_slice(
        &mut self,
        corners: &[Position],
        colors: &[Color],
    ) -> Result<(), DebugDrawError> {
        let corners = quad_corners(corners)?;
        let colors = QuadColors::try_from(colors)?;
        self.push_quad(corners, colors)
    }

    /// Number of quads pushed since the last clear.
    pub fn quad_count(&self) -> usize {
        self.buffer.index_count() / 6
    }

    pub fn space(&self) -> QuadSpace {
        self.space
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

    pub(crate) fn extend_from(&mut self, other: &QuadBatch) -> Result<bool, DebugDrawError> {
        self.buffer.extend_from(&other.buffer)
    }
}

/// Append the outline of a quad as 4 segments `(0,1) (1,2) (2,3) (3,0)`.
///
/// Each edge takes the colors of the two corners it joins.
pub fn push_wire_quad(
    lines: &mut LineBatch,
    corners: &[Position; 4],
    colors: QuadColors,
) -> Result<(), DebugDrawError> {
    lines.reserve_lines(4)?;
    for i in 0..4 {
        let next = (i + 1) % 4;
        lines.push_line(
            corners[i],
            corners[next],
            colors.corner(i),
            colors.corner(next),
        )?;
    }
    Ok(())
}

/// Append the two triangles of a quad whose first vertex is `base`.
pub(crate) fn append_quad_indices(buffer: &mut GeometryBuffer, base: u32) {
    for offset in [0, 1, 2, 0, 2, 3] {
        buffer.append_index(base + offset);
    }
}

/// Check that a corner slice holds exactly 4 positions.
pub(crate) fn quad_corners(corners: &[Position]) -> Result<&[Position; 4], DebugDrawError> {
    corners
        .try_into()
        .map_err(|_| DebugDrawError::ContractViolation {
            what: "quad corners",
            expected: "4",
            got: corners.len(),
        })
}
