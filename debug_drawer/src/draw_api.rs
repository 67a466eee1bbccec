use glam::Vec3;

use crate::batch::{self, GlyphQuad, QuadSpace};
use crate::error::DebugDrawError;
use crate::vertex::{Color, Position, QuadColors, Uv, colors};

/// Anything debug geometry can be drawn into.
///
/// Implementors provide the five primitive pushes; every draw call below is
/// built on them. Pushes never fail from the caller's point of view: capacity
/// problems are handled by the implementor. Only the `*_slice` entry points
/// report malformed input, and only while [`is_accepting`](Self::is_accepting).
pub trait DrawTarget {
    /// Whether draw calls currently take effect.
    ///
    /// While `false` every draw call is a no-op, including the `*_slice`
    /// entry points, which then skip validation and return `Ok`.
    fn is_accepting(&self) -> bool;

    /// Push one segment with independent endpoint colors.
    fn push_line(&mut self, start: Position, end: Position, start_color: Color, end_color: Color);

    /// Push one filled quad into the batch of `space`.
    fn push_quad(&mut self, space: QuadSpace, corners: &[Position; 4], colors: QuadColors);

    /// Push the 4 edges of a quad as lines.
    fn push_wire_quad(&mut self, corners: &[Position; 4], colors: QuadColors);

    /// Push one textured glyph quad translated by `offset`.
    fn push_glyph_quad(&mut self, glyph: &GlyphQuad, colors: QuadColors, offset: Position);

    /// Push a run of glyph quads sharing `origin`.
    fn push_glyph_run(&mut self, glyphs: &[GlyphQuad], origin: Position, colors: QuadColors);

    /// Draw a single-colored line segment.
    fn draw_line(&mut self, start: Position, end: Position, color: Color) {
        self.push_line(start, end, color, color);
    }

    /// Draw a line segment blending from `start_color` to `end_color`.
    fn draw_line_gradient(
        &mut self,
        start: Position,
        end: Position,
        start_color: Color,
        end_color: Color,
    ) {
        self.push_line(start, end, start_color, end_color);
    }

    /// Draw a filled world-space quad, split into triangles (0,1,2) and (0,2,3).
    fn draw_filled_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.push_quad(QuadSpace::World, corners, colors);
    }

    /// Draw a filled world-space quad from unchecked slices.
    ///
    /// Requires exactly 4 corners and 1 or 4 colors.
    fn draw_filled_quad_slice(
        &mut self,
        corners: &[Position],
        colors: &[Color],
    ) -> Result<(), DebugDrawError> {
        if !self.is_accepting() {
            return Ok(());
        }
        let corners = batch::quad_corners(corners).map_err(rejected)?;
        let colors = QuadColors::try_from(colors).map_err(rejected)?;
        self.push_quad(QuadSpace::World, corners, colors);
        Ok(())
    }

    /// Draw a filled quad with corners in screen pixels.
    fn draw_pixel_screen_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.push_quad(QuadSpace::PixelScreen, corners, colors);
    }

    /// Draw a filled quad with corners in normalized `[0, 1]` screen coordinates.
    fn draw_normalized_screen_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.push_quad(QuadSpace::NormalizedScreen, corners, colors);
    }

    /// Draw the outline of a quad.
    fn draw_wire_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.push_wire_quad(corners, colors);
    }

    /// Draw the outline of a quad from unchecked slices.
    ///
    /// Requires exactly 4 corners and 1 to 4 colors. Corners past the end of
    /// `colors` take its last entry.
    fn draw_wire_quad_slice(
        &mut self,
        corners: &[Position],
        colors: &[Color],
    ) -> Result<(), DebugDrawError> {
        if !self.is_accepting() {
            return Ok(());
        }
        let corners = batch::quad_corners(corners).map_err(rejected)?;
        let colors = QuadColors::clamped(colors).map_err(rejected)?;
        self.push_wire_quad(corners, colors);
        Ok(())
    }

    /// Draw one pre-shaped glyph.
    fn draw_glyph_quad(&mut self, glyph: &GlyphQuad, colors: QuadColors, offset: Position) {
        self.push_glyph_quad(glyph, colors, offset);
    }

    /// Draw one pre-shaped glyph from unchecked slices.
    fn draw_glyph_quad_slice(
        &mut self,
        positions: &[Position],
        uvs: &[Uv],
        colors: &[Color],
        offset: Position,
    ) -> Result<(), DebugDrawError> {
        if !self.is_accepting() {
            return Ok(());
        }
        let positions = batch::quad_corners(positions).map_err(rejected)?;
        let colors = QuadColors::try_from(colors).map_err(rejected)?;
        let uvs: &[Uv; 4] = uvs.try_into().map_err(|_| {
            rejected(DebugDrawError::ContractViolation {
                what: "glyph uvs",
                expected: "4",
                got: uvs.len(),
            })
        })?;
        let glyph = GlyphQuad {
            positions: *positions,
            uvs: *uvs,
        };
        self.push_glyph_quad(&glyph, colors, offset);
        Ok(())
    }

    /// Draw a shaped text run at `origin` in one color.
    fn draw_text_run(&mut self, glyphs: &[GlyphQuad], origin: Position, color: Color) {
        if !glyphs.is_empty() {
            self.push_glyph_run(glyphs, origin, QuadColors::Uniform(color));
        }
    }

    /// Draw an axis-aligned bounding box (12 edges).
    fn draw_aabb(&mut self, min: Position, max: Position, color: Color) {
        let corner = |i: usize| -> Position {
            [
                if i & 1 == 0 { min[0] } else { max[0] },
                if i & 2 == 0 { min[1] } else { max[1] },
                if i & 4 == 0 { min[2] } else { max[2] },
            ]
        };
        // Corners differing in exactly one axis bit share an edge.
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    self.push_line(corner(i), corner(i | bit), color, color);
                }
            }
        }
    }

    /// Draw a circle in the plane spanned by two orthogonal unit axes.
    fn draw_circle(
        &mut self,
        center: Position,
        radius: f32,
        axis_a: Position,
        axis_b: Position,
        color: Color,
    ) {
        const SEGMENTS: usize = 32;
        let center = Vec3::from(center);
        let a = Vec3::from(axis_a) * radius;
        let b = Vec3::from(axis_b) * radius;

        let mut prev = center + a;
        for i in 1..=SEGMENTS {
            let (sin, cos) = (i as f32 * std::f32::consts::TAU / SEGMENTS as f32).sin_cos();
            let point = center + a * cos + b * sin;
            self.push_line(prev.to_array(), point.to_array(), color, color);
            prev = point;
        }
    }

    /// Draw a wire sphere as three great circles.
    fn draw_sphere(&mut self, center: Position, radius: f32, color: Color) {
        let (x, y, z) = (Vec3::X.to_array(), Vec3::Y.to_array(), Vec3::Z.to_array());
        self.draw_circle(center, radius, x, y, color);
        self.draw_circle(center, radius, x, z, color);
        self.draw_circle(center, radius, y, z, color);
    }

    /// Draw a ray of `length` from `origin` along `direction`.
    fn draw_ray(&mut self, origin: Position, direction: Position, length: f32, color: Color) {
        let end = Vec3::from(origin) + Vec3::from(direction) * length;
        self.push_line(origin, end.to_array(), color, color);
    }

    /// Draw a three-axis cross marker.
    fn draw_cross(&mut self, center: Position, size: f32, color: Color) {
        let center = Vec3::from(center);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let half = axis * size * 0.5;
            self.push_line((center - half).to_array(), (center + half).to_array(), color, color);
        }
    }

    /// Draw an axes gizmo (X red, Y green, Z blue).
    fn draw_axes(&mut self, center: Position, size: f32) {
        self.draw_ray(center, Vec3::X.to_array(), size, colors::RED);
        self.draw_ray(center, Vec3::Y.to_array(), size, colors::GREEN);
        self.draw_ray(center, Vec3::Z.to_array(), size, colors::BLUE);
    }

    /// Draw a square grid on the XZ plane with `2 * half_count` cells per side.
    fn draw_grid(&mut self, center: Position, cell_size: f32, half_count: u32, color: Color) {
        let center = Vec3::from(center);
        let extent = cell_size * half_count as f32;
        let n = half_count as i32;

        for i in -n..=n {
            let offset = i as f32 * cell_size;
            let along_z = center + Vec3::new(offset, 0.0, 0.0);
            let along_x = center + Vec3::new(0.0, 0.0, offset);
            self.push_line(
                (along_z - Vec3::Z * extent).to_array(),
                (along_z + Vec3::Z * extent).to_array(),
                color,
                color,
            );
            self.push_line(
                (along_x - Vec3::X * extent).to_array(),
                (along_x + Vec3::X * extent).to_array(),
                color,
                color,
            );
        }
    }
}

/// Log a malformed draw call before handing the error back to the caller.
fn rejected(err: DebugDrawError) -> DebugDrawError {
    log::warn!("Debug draw call rejected: {err}");
    err
}
