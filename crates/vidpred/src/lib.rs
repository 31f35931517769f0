//! # vidpred
//!
//! Data loading and evaluation for video prediction experiments.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vidpred::prelude::*;
//!
//! # fn main() -> vidpred::Result<()> {
//! let config = SamplerConfig::new("data/physion").task(TaskSelector::parse("gravity"));
//! let mut sampler = SequenceSampler::new(config)?;
//! let mut loader = SequenceLoader::new(&mut sampler, SequenceLoaderConfig::default());
//! if let Some(batch) = loader.next_batch()? {
//!     let scores = evaluate_reference(&batch, &batch)?;
//!     println!("{:?}", scores.mse.mean_per_timestep());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `vidpred-core` | Frame, Sequence, SequenceBatch, Error |
//! | `vidpred-data` | Corpus index, frame decoding, sampler, implausibility edits, loader |
//! | `vidpred-eval` | MSE / SSIM / PSNR per sample and timestep |
//!
//! ## Modules
//!
//! - [`grid`]: tile frames into rows and grids
//! - [`color`]: luma conversion and 8-bit rendering
//! - [`export`]: save PNG images, grids and animated GIFs

/// Re-export core types.
pub use vidpred_core::{bail, BatchShape, Error, Frame, FrameShape, Result, Sequence, SequenceBatch};

/// Re-export dataset loading.
pub mod data {
    pub use vidpred_data::*;
}

/// Re-export evaluation.
pub mod eval {
    pub use vidpred_eval::*;
}

pub mod color;
pub mod export;
pub mod grid;

/// Prelude: import this for the most common types.
pub mod prelude {
    pub use crate::color::{rgb_to_gray, to_rgb_image};
    pub use crate::data::{
        ChannelMode, Implausibility, ImplausibilityPolicy, SampleOutcome, SamplerConfig,
        SequenceDataset, SequenceLoader, SequenceLoaderConfig, SequenceSampler, TaskSelector,
    };
    pub use crate::eval::{evaluate, evaluate_library, evaluate_reference, EvalMode, Evaluation};
    pub use crate::export::{save_gif, save_grid, save_image, DEFAULT_GIF_DELAY};
    pub use crate::grid::{tile_grid, tile_row};
    pub use crate::{BatchShape, Frame, FrameShape, Sequence, SequenceBatch};
}
