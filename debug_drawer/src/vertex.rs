//! Vertex attribute types shared by every batch.
//!
//! Batches store attributes in parallel arrays. The interleaved [`DebugVertex`]
//! and [`DebugGlyphVertex`] types exist for hosts that upload a single
//! interleaved vertex buffer.

use crate::error::DebugDrawError;

/// World or screen position of a vertex.
pub type Position = [f32; 3];

/// Linear RGBA color.
pub type Color = [f32; 4];

/// Texture coordinate.
pub type Uv = [f32; 2];

/// Common colors.
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
}

/// Colors for the four corners of a quad.
///
/// Either one color broadcast to every corner or one color per corner in
/// winding order `0 -> 1 -> 2 -> 3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadColors {
    Uniform(Color),
    PerCorner([Color; 4]),
}

impl QuadColors {
    /// Color of corner `index` (`0..4`).
    #[inline]
    pub fn corner(&self, index: usize) -> Color {
        match self {
            Self::Uniform(color) => *color,
            Self::PerCorner(colors) => colors[index],
        }
    }

    /// All four corner colors.
    #[inline]
    pub fn corners(&self) -> [Color; 4] {
        match self {
            Self::Uniform(color) => [*color; 4],
            Self::PerCorner(colors) => *colors,
        }
    }

    /// Resolve 1 to 4 colors, repeating the last one for the missing corners.
    ///
    /// Used by outlines, where a short list still gives every edge a color.
    pub fn clamped(colors: &[Color]) -> Result<Self, DebugDrawError> {
        match *colors {
            [color] => Ok(Self::Uniform(color)),
            [first, ..] if colors.len() <= 4 => {
                let last = colors.len() - 1;
                let mut corners = [first; 4];
                for (i, corner) in corners.iter_mut().enumerate() {
                    *corner = colors[i.min(last)];
                }
                Ok(Self::PerCorner(corners))
            }
            _ => Err(DebugDrawError::ContractViolation {
                what: "wire quad colors",
                expected: "1 to 4",
                got: colors.len(),
            }),
        }
    }
}

impl From<Color> for QuadColors {
    fn from(color: Color) -> Self {
        Self::Uniform(color)
    }
}

impl From<[Color; 4]> for QuadColors {
    fn from(colors: [Color; 4]) -> Self {
        Self::PerCorner(colors)
    }
}

impl TryFrom<&[Color]> for QuadColors {
    type Error = DebugDrawError;

    /// Accepts exactly 1 or exactly 4 colors.
    fn try_from(colors: &[Color]) -> Result<Self, Self::Error> {
        match *colors {
            [color] => Ok(Self::Uniform(color)),
            [c0, c1, c2, c3] => Ok(Self::PerCorner([c0, c1, c2, c3])),
            _ => Err(DebugDrawError::ContractViolation {
                what: "quad colors",
                expected: "1 or 4",
                got: colors.len(),
            }),
        }
    }
}

/// Interleaved vertex for line and untextured quad batches.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: Position,
    pub color: Color,
}

/// Interleaved vertex for glyph batches.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugGlyphVertex {
    pub position: Position,
    pub color: Color,
    pub uv: Uv,
}

/// Uniform buffer data for debug draw shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugUniforms {
    /// Column-major 4x4 view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}
