//! # vidpred-eval
//!
//! Frame-by-frame scoring of predicted video sequences.
//!
//! - [`evaluate`]: MSE, SSIM and PSNR tables for two `[B, T, C, H, W]` batches
//! - [`EvalMode`]: reference (published Gaussian SSIM) or library formulas
//! - [`ssim`](ssim::ssim), [`psnr`](pixel::psnr), [`mse`](pixel::mse): the
//!   per-plane kernels
//! - [`Window`]: separable Gaussian / box windows with valid-mode filtering
//!
//! Evaluation is a pure function of its inputs; independent calls can run on
//! separate threads.

pub mod evaluator;
pub mod pixel;
pub mod ssim;
pub mod table;
pub mod window;

pub use evaluator::{
    evaluate, evaluate_library, evaluate_reference, EvalMode, Evaluation, LibraryOptions,
    SSIM_SENTINEL,
};
pub use pixel::{mse, psnr};
pub use ssim::SsimParams;
pub use table::MetricTable;
pub use window::Window;
