//! # vidpred-data
//!
//! Sequence sampling from an on-disk video corpus.
//!
//! This crate provides:
//! - [`SamplerConfig`]: serde-loadable sampler settings
//! - [`CorpusIndex`]: task → video index built once per sampler
//! - [`FrameDecoder`] / [`ImageFileDecoder`]: frame file to `[C, H, W]` pixels
//! - [`Implausibility`]: occlude / freeze / shift edits for anomaly data
//! - [`SequenceSampler`]: seeded random or sequential window sampling
//! - [`SequenceDataset`] / [`SequenceLoader`]: indexed access and batching
//
// Corpus layout:  root/task/video/<video>_NNNN.png  (NNNN is 1-based)

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod decode;
pub mod implausible;
pub mod loader;
pub mod sampler;

pub use config::{ChannelMode, SamplerConfig, TaskSelector};
pub use corpus::CorpusIndex;
pub use dataset::{SampleOutcome, SequenceDataset};
pub use decode::{FrameDecoder, ImageFileDecoder};
pub use implausible::{Edit, Implausibility, ImplausibilityPolicy};
pub use loader::{SequenceLoader, SequenceLoaderConfig};
pub use sampler::{SequenceSampler, NOMINAL_LEN};
