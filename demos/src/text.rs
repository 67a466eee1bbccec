//! Minimal monospace text shaping for the demo host.
//!
//! Assumes a 16x16 ASCII glyph atlas: the glyph for byte `b` sits in cell
//! `(b % 16, b / 16)`. Non-ASCII characters fall back to `?`.

use glam::Vec2;
use lilium_debug_draw::GlyphQuad;

const ATLAS_CELLS: u32 = 16;

/// Shape `text` into one glyph quad per visible character, starting at the
/// local origin and advancing `cell.x` per character. `\n` starts a new line
/// `cell.y` below.
pub fn shape_monospace(text: &str, cell: Vec2) -> Vec<GlyphQuad> {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = Vec2::ZERO;

    for ch in text.chars() {
        match ch {
            '\n' => {
                pen = Vec2::new(0.0, pen.y - cell.y);
                continue;
            }
            ' ' => {}
            _ => glyphs.push(glyph_at(pen, cell, atlas_index(ch))),
        }
        pen.x += cell.x;
    }

    glyphs
}

fn atlas_index(ch: char) -> u32 {
    if ch.is_ascii_graphic() {
        ch as u32
    } else {
        '?' as u32
    }
}

fn glyph_at(pen: Vec2, cell: Vec2, index: u32) -> GlyphQuad {
    let step = 1.0 / ATLAS_CELLS as f32;
    let u = (index % ATLAS_CELLS) as f32 * step;
    let v = (index / ATLAS_CELLS) as f32 * step;

    let min = pen;
    let max = pen + cell;
    GlyphQuad {
        positions: [
            [min.x, min.y, 0.0],
            [max.x, min.y, 0.0],
            [max.x, max.y, 0.0],
            [min.x, max.y, 0.0],
        ],
        uvs: [[u, v + step], [u + step, v + step], [u + step, v], [u, v]],
    }
}
