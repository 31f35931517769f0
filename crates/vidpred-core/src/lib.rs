//! # vidpred-core
//!
//! Shared primitives for the vidpred crates.
//!
//! This crate provides:
//! - [`Frame`] / [`FrameShape`]: one planar `[C, H, W]` image
//! - [`Sequence`]: an ordered, uniformly shaped run of frames
//! - [`SequenceBatch`] / [`BatchShape`]: `[B, T, C, H, W]` stacks with
//!   time-major conversion
//! - [`Error`] / [`Result`]: the error type used across the workspace

pub mod batch;
pub mod error;
pub mod frame;
pub mod sequence;

pub use batch::{BatchShape, SequenceBatch};
pub use error::{Error, Result};
pub use frame::{Frame, FrameShape};
pub use sequence::Sequence;
