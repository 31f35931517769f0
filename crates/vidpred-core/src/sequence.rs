use std::ops::Range;

use crate::error::{Error, Result};
use crate::frame::{Frame, FrameShape};

/// An ordered, non-empty run of frames that all share one [`FrameShape`].
///
/// The editing methods (`fill_range`, `shift_left`) only ever overwrite frames
/// with copies of other frames from the same sequence, so the length and the
/// per-frame shape cannot change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    frames: Vec<Frame>,
    shape: FrameShape,
}

impl Sequence {
    /// Build a sequence, checking that it is non-empty and uniformly shaped.
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let shape = match frames.first() {
            Some(f) => f.shape(),
            None => return Err(Error::msg("a sequence needs at least one frame")),
        };
        if let Some(bad) = frames.iter().find(|f| f.shape() != shape) {
            return Err(Error::shape_mismatch(shape, bad.shape()));
        }
        Ok(Sequence { frames, shape })
    }

    /// Caller guarantees a non-empty, uniformly shaped frame list.
    pub(crate) fn from_parts(frames: Vec<Frame>, shape: FrameShape) -> Self {
        Sequence { frames, shape }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Shape shared by every frame.
    pub fn frame_shape(&self) -> FrameShape {
        self.shape
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, t: usize) -> &Frame {
        &self.frames[t]
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Overwrite every frame in `range` with a copy of frame `src`.
    ///
    /// `src` is read before any write, so it may lie inside `range`. The range
    /// is clamped to the sequence length.
    pub fn fill_range(&mut self, range: Range<usize>, src: usize) {
        let end = range.end.min(self.frames.len());
        if range.start >= end {
            return;
        }
        let template = self.frames[src].clone();
        for frame in &mut self.frames[range.start..end] {
            frame.clone_from(&template);
        }
    }

    /// Move frames `[start + by, len)` down to `[start, len - by)`.
    ///
    /// The tail `[len - by, len)` keeps its original frames. Nothing happens
    /// when `start + by >= len`.
    pub fn shift_left(&mut self, start: usize, by: usize) {
        let len = self.frames.len();
        if by == 0 || start.saturating_add(by) >= len {
            return;
        }
        for dst in start..len - by {
            let src = self.frames[dst + by].clone();
            self.frames[dst] = src;
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
