//! Frame lifecycle of the debug draw system.
//!
//! The host drives [`DebugDraw`] through two hooks:
//!
//! 1. [`on_frame_start`](DebugDraw::on_frame_start) at the earliest point of
//!    its frame, before any logic that may draw. Clears the previous frame.
//! 2. [`on_frame_render`](DebugDraw::on_frame_render) from its render path,
//!    once per camera. Builds every batch and hands it to the submitter.
//!
//! Every draw call between the two is a pure append.
//!
//! ```text
//!            on_frame_start            first push            on_frame_render
//! Finalizing ──────────────> Idle ──────────────> Accumulating ──────────────> Finalizing
//! ```

use crate::batch::{FrameBatches, GlyphQuad, QuadSpace, push_wire_quad};
use crate::config::DebugDrawConfig;
use crate::draw_api::DrawTarget;
use crate::error::DebugDrawError;
use crate::submit::{BatchKind, BatchSubmitter};
use crate::vertex::{Color, DebugUniforms, Position, QuadColors};

/// Phase of the frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramePhase {
    /// Buffers are empty, no push received yet this frame.
    #[default]
    Idle,
    /// Pushes are being accepted.
    Accumulating,
    /// The frame has been rendered; waiting for the next frame start.
    Finalizing,
}

/// Camera data the host renders a frame with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    /// Column-major view-projection matrix for world-space batches.
    pub view_proj: [[f32; 4]; 4],
    /// Viewport size in pixels, for pixel-screen quads.
    pub viewport_size: [f32; 2],
}

impl FrameView {
    pub fn new(view_proj: [[f32; 4]; 4], viewport_size: [f32; 2]) -> Self {
        Self {
            view_proj,
            viewport_size,
        }
    }

    /// Uniform block for the world-space shaders.
    pub fn uniforms(&self) -> DebugUniforms {
        DebugUniforms {
            view_proj: self.view_proj,
        }
    }
}

impl Default for FrameView {
    fn default() -> Self {
        Self {
            view_proj: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            viewport_size: [1.0, 1.0],
        }
    }
}

/// Per-batch statistics of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub kind: BatchKind,
    pub vertices: usize,
    pub indices: usize,
    pub capacity: usize,
    /// Growth increments added this frame.
    pub growth_steps: usize,
}

/// Outcome of one [`on_frame_render`](DebugDraw::on_frame_render) call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Frame counter at render time.
    pub frame: u64,
    /// Number of payloads handed to the submitter.
    pub submitted: usize,
    pub batches: Vec<BatchReport>,
    /// A batch grew more than once or crossed the soft ceiling this frame.
    pub overflowed: bool,
}

/// Debug draw handle: owns the batches and runs the frame cycle.
///
/// Construct once at startup and pass it (or a
/// [`SharedDebugDraw`](crate::SharedDebugDraw)) to whatever code draws.
/// Draw calls come from the [`DrawTarget`] trait.
pub struct DebugDraw {
    config: DebugDrawConfig,
    batches: FrameBatches,
    phase: FramePhase,
    frame: u64,
    enabled: bool,
    fault: Option<DebugDrawError>,
    overflow_reported: bool,
    late_push_reported: bool,
}

impl DebugDraw {
    /// Create the debug draw system and allocate its batches.
    pub fn new(config: DebugDrawConfig) -> Result<Self, DebugDrawError> {
        config.validate()?;
        let batches = FrameBatches::new(config.initial_capacity, &config.materials)?;
        log::debug!(
            "Debug draw created with {} vertices per batch",
            config.initial_capacity
        );
        Ok(Self {
            enabled: config.enabled,
            config,
            batches,
            phase: FramePhase::Idle,
            frame: 0,
            fault: None,
            overflow_reported: false,
            late_push_reported: false,
        })
    }

    pub fn config(&self) -> &DebugDrawConfig {
        &self.config
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of frame starts seen so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Read access to the accumulated batches.
    pub fn batches(&self) -> &FrameBatches {
        &self.batches
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable draw calls. Buffer contents are left untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::info!(
                "Debug draw {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.enabled = enabled;
    }

    /// Flip the enabled state and return the new one.
    pub fn toggle_enabled(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// The error that shut the system down, if any.
    pub fn fault(&self) -> Option<&DebugDrawError> {
        self.fault.as_ref()
    }

    /// Frame-start hook: discard the previous frame and accept new pushes.
    ///
    /// Must run after the previous frame's render consumed the batches and
    /// before any draw call of the new frame.
    pub fn on_frame_start(&mut self) {
        self.batches.clear();
        self.overflow_reported = false;
        self.late_push_reported = false;
        self.frame += 1;
        self.phase = FramePhase::Idle;
    }

    /// Render hook: build every non-empty batch and submit it.
    ///
    /// May run several times per frame (once per camera); each call submits
    /// the same accumulated data. Nothing is submitted while disabled or
    /// after a fault.
    pub fn on_frame_render(
        &mut self,
        view: &FrameView,
        submitter: &mut dyn BatchSubmitter,
    ) -> FrameReport {
        self.phase = FramePhase::Finalizing;

        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };
        if !self.is_accepting() {
            return report;
        }

        let ceiling = self.config.soft_vertex_ceiling;
        for (kind, buffer) in self.batches.buffers() {
            let batch = BatchReport {
                kind,
                vertices: buffer.vertex_count(),
                indices: buffer.index_count(),
                capacity: buffer.capacity(),
                growth_steps: buffer.growth_steps(),
            };
            if batch.growth_steps > 1 || ceiling.is_some_and(|c| batch.vertices > c) {
                report.overflowed = true;
            }
            report.batches.push(batch);
        }

        if report.overflowed && !self.overflow_reported {
            self.overflow_reported = true;
            let summary: Vec<String> = report
                .batches
                .iter()
                .filter(|b| b.growth_steps > 1 || ceiling.is_some_and(|c| b.vertices > c))
                .map(|b| {
                    format!(
                        "{:?}: {} vertices, {} growths",
                        b.kind, b.vertices, b.growth_steps
                    )
                })
                .collect();
            log::warn!(
                "Debug draw frame {} overflowed: {}",
                self.frame,
                summary.join(", ")
            );
        }

        for payload in self.batches.payloads() {
            submitter.submit(view, &payload);
            report.submitted += 1;
        }

        log::trace!(
            "Debug draw frame {} submitted {} batches",
            self.frame,
            report.submitted
        );
        report
    }

    /// Merge batches recorded elsewhere into this frame.
    ///
    /// Follows the same gating as a single push.
    pub fn absorb(&mut self, batches: &FrameBatches) {
        if batches.is_empty() {
            return;
        }
        self.accept(|own| own.extend_from(batches));
    }

    /// Run one push if the system currently accepts pushes.
    fn accept(&mut self, push: impl FnOnce(&mut FrameBatches) -> Result<(), DebugDrawError>) {
        if !self.is_accepting() {
            return;
        }
        match self.phase {
            FramePhase::Finalizing => {
                if !self.late_push_reported {
                    self.late_push_reported = true;
                    log::warn!(
                        "Debug draw push after frame {} was rendered; \
                         dropped until the next frame start",
                        self.frame
                    );
                }
                return;
            }
            FramePhase::Idle => self.phase = FramePhase::Accumulating,
            FramePhase::Accumulating => {}
        }

        if let Err(err) = push(&mut self.batches) {
            self.record_fault(err);
        }
    }

    /// Shut the system down after a push could not be stored.
    fn record_fault(&mut self, err: DebugDrawError) {
        log::error!("Debug draw disabled: {err}");
        self.fault = Some(err);
    }
}

impl DrawTarget for DebugDraw {
    fn is_accepting(&self) -> bool {
        self.enabled && self.fault.is_none()
    }

    fn push_line(&mut self, start: Position, end: Position, start_color: Color, end_color: Color) {
        self.accept(|b| b.lines.push_line(start, end, start_color, end_color));
    }

    fn push_quad(&mut self, space: QuadSpace, corners: &[Position; 4], colors: QuadColors) {
        self.accept(|b| b.quads_mut(space).push_quad(corners, colors));
    }

    fn push_wire_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.accept(|b| push_wire_quad(&mut b.lines, corners, colors));
    }

    fn push_glyph_quad(&mut self, glyph: &GlyphQuad, colors: QuadColors, offset: Position) {
        self.accept(|b| b.glyphs.push_glyph_quad(glyph, colors, offset));
    }

    fn push_glyph_run(&mut self, glyphs: &[GlyphQuad], origin: Position, colors: QuadColors) {
        self.accept(|b| b.glyphs.push_glyph_run(glyphs, origin, colors));
    }
}

impl std::fmt::Debug for DebugDraw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugDraw")
            .field("phase", &self.phase)
            .field("frame", &self.frame)
            .field("enabled", &self.enabled)
            .field("fault", &self.fault)
            .field("vertices", &self.batches.vertex_count())
            .finish()
    }
}
