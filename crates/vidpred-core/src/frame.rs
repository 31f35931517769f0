use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Frame: a single decoded video frame
//
// Pixels are stored planar (channel-first, row-major), i.e. in [C, H, W]
// layout, as f64 values. Frames produced by the decoder are normalised to
// [0, 1]; frames built by callers (model predictions) may hold any value.
//
//   index(c, y, x) = c * H * W + y * W + x

/// Rec. 601 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Channel/height/width of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl FrameShape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        FrameShape {
            channels,
            height,
            width,
        }
    }

    /// Number of pixels in one channel plane (H * W).
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// Total number of elements (C * H * W).
    pub fn elem_count(&self) -> usize {
        self.channels * self.plane_len()
    }

    /// The dimensions as `[C, H, W]`.
    pub fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.channels, self.height, self.width)
    }
}

/// One frame of pixel data in `[C, H, W]` layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Vec<f64>,
    shape: FrameShape,
}

impl Frame {
    /// Wrap a planar buffer. Fails if the buffer length does not match the shape.
    pub fn new(data: Vec<f64>, shape: FrameShape) -> Result<Self> {
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
            });
        }
        Ok(Frame { data, shape })
    }

    /// Caller guarantees `data.len() == shape.elem_count()`.
    pub(crate) fn from_parts(data: Vec<f64>, shape: FrameShape) -> Self {
        debug_assert_eq!(data.len(), shape.elem_count());
        Frame { data, shape }
    }

    /// A frame with every element set to `value`.
    pub fn filled(shape: FrameShape, value: f64) -> Self {
        Frame {
            data: vec![value; shape.elem_count()],
            shape,
        }
    }

    pub fn zeros(shape: FrameShape) -> Self {
        Self::filled(shape, 0.0)
    }

    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// The `H * W` plane of channel `c`.
    ///
    /// # Panics
    /// Panics if `c >= channels`.
    pub fn channel(&self, c: usize) -> &[f64] {
        let n = self.shape.plane_len();
        &self.data[c * n..(c + 1) * n]
    }

    pub fn channel_mut(&mut self, c: usize) -> &mut [f64] {
        let n = self.shape.plane_len();
        &mut self.data[c * n..(c + 1) * n]
    }

    /// Pixel value at `(c, y, x)`.
    pub fn get(&self, c: usize, y: usize, x: usize) -> f64 {
        let FrameShape { height, width, .. } = self.shape;
        self.data[c * height * width + y * width + x]
    }

    pub fn set(&mut self, c: usize, y: usize, x: usize, value: f64) {
        let FrameShape { height, width, .. } = self.shape;
        self.data[c * height * width + y * width + x] = value;
    }

    /// Apply `f` to every element in place.
    pub fn map_inplace(&mut self, f: impl Fn(f64) -> f64) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }
}
