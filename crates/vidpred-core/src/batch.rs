use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame::{Frame, FrameShape};
use crate::sequence::Sequence;

// SequenceBatch: a stack of equal-length, equal-shape sequences
//
// Stored sample-major as one contiguous buffer:
//
//   [B, T, C, H, W]     offset(b, t) = (b * T + t) * C * H * W
//
// Prediction models usually consume time-major input ([T, B, C, H, W]) so they
// can step through time; `to_time_major` / `from_time_major` convert between
// the two layouts. Frames are already channel-first, so no further axis
// reordering is needed.

/// Dimensions of a [`SequenceBatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchShape {
    pub batch: usize,
    pub time: usize,
    pub frame: FrameShape,
}

impl BatchShape {
    pub fn new(batch: usize, time: usize, frame: FrameShape) -> Self {
        BatchShape { batch, time, frame }
    }

    pub fn elem_count(&self) -> usize {
        self.batch * self.time * self.frame.elem_count()
    }

    /// The dimensions as `[B, T, C, H, W]`.
    pub fn dims(&self) -> [usize; 5] {
        let [c, h, w] = self.frame.dims();
        [self.batch, self.time, c, h, w]
    }
}

impl fmt::Display for BatchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [b, t, c, h, w] = self.dims();
        write!(f, "[{b}, {t}, {c}, {h}, {w}]")
    }
}

/// A batch of sequences in `[B, T, C, H, W]` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceBatch {
    data: Vec<f64>,
    shape: BatchShape,
}

impl SequenceBatch {
    /// Wrap a sample-major buffer.
    pub fn new(data: Vec<f64>, shape: BatchShape) -> Result<Self> {
        if shape.batch == 0 || shape.time == 0 {
            return Err(Error::msg(format!("empty batch shape {shape}")));
        }
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
            });
        }
        Ok(SequenceBatch { data, shape })
    }

    /// Stack sequences into a batch. All sequences must have the same length
    /// and frame shape.
    pub fn from_sequences(sequences: &[Sequence]) -> Result<Self> {
        let first = sequences
            .first()
            .ok_or_else(|| Error::msg("cannot batch zero sequences"))?;
        let shape = BatchShape::new(sequences.len(), first.len(), first.frame_shape());
        let mut data = Vec::with_capacity(shape.elem_count());
        for seq in sequences {
            let got = BatchShape::new(sequences.len(), seq.len(), seq.frame_shape());
            if got != shape {
                return Err(Error::shape_mismatch(shape, got));
            }
            for frame in seq {
                data.extend_from_slice(frame.data());
            }
        }
        Ok(SequenceBatch { data, shape })
    }

    /// Rebuild a batch from a time-major `[T, B, C, H, W]` buffer.
    pub fn from_time_major(data: &[f64], shape: BatchShape) -> Result<Self> {
        if shape.batch == 0 || shape.time == 0 {
            return Err(Error::msg(format!("empty batch shape {shape}")));
        }
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
            });
        }
        let n = shape.frame.elem_count();
        let mut out = vec![0.0; data.len()];
        for t in 0..shape.time {
            for b in 0..shape.batch {
                let src = (t * shape.batch + b) * n;
                let dst = (b * shape.time + t) * n;
                out[dst..dst + n].copy_from_slice(&data[src..src + n]);
            }
        }
        Ok(SequenceBatch { data: out, shape })
    }

    /// Copy the batch out in time-major `[T, B, C, H, W]` order.
    pub fn to_time_major(&self) -> Vec<f64> {
        let shape = self.shape;
        let n = shape.frame.elem_count();
        let mut out = vec![0.0; self.data.len()];
        for b in 0..shape.batch {
            for t in 0..shape.time {
                let src = (b * shape.time + t) * n;
                let dst = (t * shape.batch + b) * n;
                out[dst..dst + n].copy_from_slice(&self.data[src..src + n]);
            }
        }
        out
    }

    pub fn shape(&self) -> BatchShape {
        self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn batch_size(&self) -> usize {
        self.shape.batch
    }

    pub fn seq_len(&self) -> usize {
        self.shape.time
    }

    /// Flat `[C, H, W]` pixels of sample `b` at timestep `t`.
    pub fn frame_data(&self, b: usize, t: usize) -> &[f64] {
        let n = self.shape.frame.elem_count();
        let off = (b * self.shape.time + t) * n;
        &self.data[off..off + n]
    }

    /// The `H * W` plane of channel `c` of sample `b` at timestep `t`.
    pub fn channel(&self, b: usize, t: usize, c: usize) -> &[f64] {
        let plane = self.shape.frame.plane_len();
        &self.frame_data(b, t)[c * plane..(c + 1) * plane]
    }

    /// Copy out one frame.
    pub fn frame(&self, b: usize, t: usize) -> Frame {
        Frame::from_parts(self.frame_data(b, t).to_vec(), self.shape.frame)
    }

    /// Copy out sample `b` as a [`Sequence`].
    pub fn sequence(&self, b: usize) -> Sequence {
        let frames = (0..self.shape.time).map(|t| self.frame(b, t)).collect();
        Sequence::from_parts(frames, self.shape.frame)
    }
}
