//! Host submission interface.
//!
//! The core never talks to a GPU. At render time every non-empty batch is
//! handed to a [`BatchSubmitter`] as a [`BatchPayload`]; the host binds the
//! view transform and material and issues one indexed draw per payload.

use crate::batch::QuadSpace;
use crate::buffer::{RenderableGeometry, Topology};
use crate::config::MaterialHandle;
use crate::frame::FrameView;
use crate::vertex::{Color, Position, Uv};

/// Which batch a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Lines,
    Quads(QuadSpace),
    Glyphs,
}

/// One batch's geometry, ready for a single draw submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchPayload<'a> {
    pub kind: BatchKind,
    pub material: MaterialHandle,
    pub geometry: RenderableGeometry<'a>,
}

impl BatchPayload<'_> {
    pub fn topology(&self) -> Topology {
        self.geometry.topology
    }

    /// Copy the borrowed geometry out of the frame buffers.
    pub fn to_owned_batch(&self) -> OwnedBatch {
        OwnedBatch {
            kind: self.kind,
            material: self.material,
            topology: self.geometry.topology,
            positions: self.geometry.positions.to_vec(),
            colors: self.geometry.colors.to_vec(),
            uvs: self.geometry.uvs.map(<[Uv]>::to_vec),
            indices: self.geometry.indices.to_vec(),
        }
    }
}

/// Consumer of finished batches, implemented by the host renderer.
pub trait BatchSubmitter {
    /// Submit one batch drawn with `view`.
    ///
    /// The payload borrows the frame buffers and is only valid for the
    /// duration of the call.
    fn submit(&mut self, view: &FrameView, payload: &BatchPayload<'_>);
}

impl<F> BatchSubmitter for F
where
    F: FnMut(&FrameView, &BatchPayload<'_>),
{
    fn submit(&mut self, view: &FrameView, payload: &BatchPayload<'_>) {
        self(view, payload)
    }
}

/// A payload copied out of the frame buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedBatch {
    pub kind: BatchKind,
    pub material: MaterialHandle,
    pub topology: Topology,
    pub positions: Vec<Position>,
    pub colors: Vec<Color>,
    pub uvs: Option<Vec<Uv>>,
    pub indices: Vec<u32>,
}

/// Submitter that keeps copies of everything it receives.
///
/// Useful for headless hosts, tests and capturing a frame for inspection.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    submissions: Vec<(FrameView, OwnedBatch)>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far, in submission order.
    pub fn submissions(&self) -> &[(FrameView, OwnedBatch)] {
        &self.submissions
    }

    /// The first recorded batch of a kind.
    pub fn find(&self, kind: BatchKind) -> Option<&OwnedBatch> {
        self.submissions
            .iter()
            .map(|(_, batch)| batch)
            .find(|batch| batch.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Take the recorded batches, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<(FrameView, OwnedBatch)> {
        std::mem::take(&mut self.submissions)
    }
}

impl BatchSubmitter for RecordingSubmitter {
    fn submit(&mut self, view: &FrameView, payload: &BatchPayload<'_>) {
        self.submissions.push((*view, payload.to_owned_batch()));
    }
}
