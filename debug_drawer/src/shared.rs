use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::batch::{FrameBatches, GlyphQuad, QuadSpace, push_wire_quad};
use crate::config::DebugDrawConfig;
use crate::draw_api::DrawTarget;
use crate::error::DebugDrawError;
use crate::frame::{DebugDraw, FrameReport, FrameView};
use crate::submit::BatchSubmitter;
use crate::vertex::{Color, Position, QuadColors};

/// [`DebugDraw`] shared between systems that draw from several threads.
///
/// Each drawing system takes a [`DrawRecorder`] via
/// [`recorder`](Self::recorder). A recorder accumulates into its own batches
/// without locking and merges them into the shared frame when dropped, so the
/// mutex is only held briefly per recorder.
///
/// The frame tick advances in [`on_frame_start`](Self::on_frame_start).
/// Recorders created for an older tick are discarded on drop.
pub struct SharedDebugDraw {
    current_tick: AtomicU64,
    recorder_capacity: usize,
    inner: Mutex<DebugDraw>,
}

impl SharedDebugDraw {
    /// Create a shared debug draw system.
    pub fn new(config: DebugDrawConfig) -> Result<Self, DebugDrawError> {
        let recorder_capacity = config.recorder_capacity;
        Ok(Self {
            current_tick: AtomicU64::new(0),
            recorder_capacity,
            inner: Mutex::new(DebugDraw::new(config)?),
        })
    }

    /// Get the current tick.
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Acquire)
    }

    /// Frame-start hook. See [`DebugDraw::on_frame_start`].
    pub fn on_frame_start(&self) {
        let mut inner = self.inner.lock();
        inner.on_frame_start();
        self.current_tick.fetch_add(1, Ordering::AcqRel);
    }

    /// Render hook. See [`DebugDraw::on_frame_render`].
    pub fn on_frame_render(
        &self,
        view: &FrameView,
        submitter: &mut dyn BatchSubmitter,
    ) -> FrameReport {
        self.inner.lock().on_frame_render(view, submitter)
    }

    /// Create a recorder for the current tick.
    ///
    /// Fails only if the recorder's own batches cannot be allocated.
    pub fn recorder(&self) -> Result<DrawRecorder<'_>, DebugDrawError> {
        let materials = self.inner.lock().config().materials;
        Ok(DrawRecorder {
            shared: self,
            tick: self.current_tick(),
            batches: FrameBatches::new(self.recorder_capacity, &materials)?,
            failed: false,
        })
    }

    /// Lock the underlying [`DebugDraw`] for direct drawing or toggling.
    ///
    /// The lock is not re-entrant. While the guard is held, the same thread
    /// must not call [`recorder`](Self::recorder), either hook, or drop a
    /// non-empty [`DrawRecorder`]; each of these locks again and deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, DebugDraw> {
        self.inner.lock()
    }

    /// Merge a finished recorder's batches.
    fn flush(&self, tick: u64, batches: &FrameBatches) {
        if batches.is_empty() {
            return;
        }
        // The tick only advances under the lock, so compare while holding it.
        let mut inner = self.inner.lock();
        let current = self.current_tick();
        if tick != current {
            log::warn!(
                "DrawRecorder flushed for tick {} but current is {}; discarding",
                tick,
                current
            );
            return;
        }
        inner.absorb(batches);
    }
}

impl std::fmt::Debug for SharedDebugDraw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDebugDraw")
            .field("current_tick", &self.current_tick())
            .field("recorder_capacity", &self.recorder_capacity)
            .finish_non_exhaustive()
    }
}

/// A short-lived drawing context with its own batches.
///
/// Merges into the parent [`SharedDebugDraw`] on [`Drop`].
pub struct DrawRecorder<'a> {
    shared: &'a SharedDebugDraw,
    tick: u64,
    batches: FrameBatches,
    failed: bool,
}

impl DrawRecorder<'_> {
    /// Tick this recorder was created for.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Geometry recorded so far.
    pub fn batches(&self) -> &FrameBatches {
        &self.batches
    }

    fn record(&mut self, push: impl FnOnce(&mut FrameBatches) -> Result<(), DebugDrawError>) {
        if self.failed {
            return;
        }
        if let Err(err) = push(&mut self.batches) {
            log::error!("DrawRecorder stopped recording: {err}");
            self.failed = true;
        }
    }
}

impl DrawTarget for DrawRecorder<'_> {
    fn is_accepting(&self) -> bool {
        !self.failed
    }

    fn push_line(&mut self, start: Position, end: Position, start_color: Color, end_color: Color) {
        self.record(|b| b.lines.push_line(start, end, start_color, end_color));
    }

    fn push_quad(&mut self, space: QuadSpace, corners: &[Position; 4], colors: QuadColors) {
        self.record(|b| b.quads_mut(space).push_quad(corners, colors));
    }

    fn push_wire_quad(&mut self, corners: &[Position; 4], colors: QuadColors) {
        self.record(|b| push_wire_quad(&mut b.lines, corners, colors));
    }

    fn push_glyph_quad(&mut self, glyph: &GlyphQuad, colors: QuadColors, offset: Position) {
        self.record(|b| b.glyphs.push_glyph_quad(glyph, colors, offset));
    }

    fn push_glyph_run(&mut self, glyphs: &[GlyphQuad], origin: Position, colors: QuadColors) {
        self.record(|b| b.glyphs.push_glyph_run(glyphs, origin, colors));
    }
}

impl Drop for DrawRecorder<'_> {
    fn drop(&mut self) {
        self.shared.flush(self.tick, &self.batches);
    }
}
