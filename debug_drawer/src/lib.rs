//! Immediate-mode debug geometry batching.
//!
//! Draw calls (lines, quads, glyph quads) issued from anywhere in a frame
//! are appended to growable per-kind buffers, turned into one indexed
//! payload per batch at render time, and discarded at the next frame start.
//! Camera, shaders and the actual GPU submission belong to the host.
//!
//! # Architecture
//!
//! - [`GeometryBuffer`] - Growable vertex/color/uv/index arrays with chunked growth
//! - [`LineBatch`], [`QuadBatch`], [`GlyphBatch`] - Topology and append rule per primitive kind
//! - [`DebugDraw`] - The handle owning every batch and running the frame cycle
//! - [`SharedDebugDraw`] / [`DrawRecorder`] - Multi-threaded front-end merging per-system batches
//! - [`DrawTarget`] - The draw API shared by [`DebugDraw`] and [`DrawRecorder`]
//! - [`BatchSubmitter`] - Host interface receiving the finished [`BatchPayload`]s
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let mut debug_draw = DebugDraw::new(DebugDrawConfig::default())?;
//!
//! // Earliest hook of every frame:
//! debug_draw.on_frame_start();
//!
//! // Anywhere in the frame's logic:
//! debug_draw.draw_line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], colors::RED);
//! debug_draw.draw_filled_quad(&corners, colors::BLUE.into());
//!
//! // Render hook, once per camera:
//! let view = FrameView::new(camera.view_proj(), [width, height]);
//! debug_draw.on_frame_render(&view, &mut renderer);
//! ```

mod batch;
mod buffer;
mod config;
mod draw_api;
mod error;
mod frame;
mod shared;
mod submit;
mod vertex;

pub use batch::{
    FrameBatches, GlyphBatch, GlyphQuad, LineBatch, QuadBatch, QuadSpace, push_wire_quad,
};
pub use buffer::{GeometryBuffer, IndexRatio, RenderableGeometry, Topology};
pub use config::{
    BatchMaterials, DEFAULT_INITIAL_CAPACITY, DEFAULT_RECORDER_CAPACITY, DebugDrawConfig,
    MaterialHandle,
};
pub use draw_api::DrawTarget;
pub use error::DebugDrawError;
pub use frame::{BatchReport, DebugDraw, FramePhase, FrameReport, FrameView};
pub use shared::{DrawRecorder, SharedDebugDraw};
pub use submit::{BatchKind, BatchPayload, BatchSubmitter, OwnedBatch, RecordingSubmitter};
pub use vertex::{
    Color, DebugGlyphVertex, DebugUniforms, DebugVertex, Position, QuadColors, Uv, colors,
};
