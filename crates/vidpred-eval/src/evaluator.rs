// Sequence evaluation: per-sample, per-timestep MSE / SSIM / PSNR
//
// For every (sample b, timestep t) of two [B, T, C, H, W] batches:
//
//   MSE   over the whole [C, H, W] frame
//   SSIM  per channel, then averaged over channels
//   PSNR  per channel, then averaged over channels
//
// Two modes:
//
//   Reference  11x11 Gaussian window (sigma 1.5), range 1, population
//              covariance; PSNR = 10 log10(1 / mse). A non-finite channel
//              SSIM (frame smaller than the window) is recorded as -1. These
//              are the numbers reported by the video prediction papers.
//
//   Library    general-purpose formulas: 7x7 box window with sample
//              covariance, PSNR = 10 log10(R^2 / mse). When no data range is
//              given, SSIM uses R = 2 (the float image range [-1, 1]) and PSNR
//              uses R = 1 for non-negative ground truth, else 2.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vidpred_core::{Error, Result, SequenceBatch};

use crate::pixel::{mse, psnr};
use crate::ssim::{ssim, SsimParams};
use crate::table::MetricTable;

/// Score recorded when a channel's SSIM is not a finite number.
pub const SSIM_SENTINEL: f64 = -1.0;

/// Settings for [`EvalMode::Library`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryOptions {
    /// Dynamic range; `None` infers it per metric as described above.
    pub data_range: Option<f64>,
    /// Side of the box window. Must be odd and at least 3.
    pub win_size: usize,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        LibraryOptions {
            data_range: None,
            win_size: 7,
        }
    }
}

/// Which set of metric formulas to use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    #[default]
    Reference,
    Library(LibraryOptions),
}

/// MSE, SSIM and PSNR tables, each `batch x time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mse: MetricTable,
    pub ssim: MetricTable,
    pub psnr: MetricTable,
}

/// Score `pred` against `gt` frame by frame.
///
/// The batches must have identical shapes.
pub fn evaluate(gt: &SequenceBatch, pred: &SequenceBatch, mode: EvalMode) -> Result<Evaluation> {
    let shape = gt.shape();
    if pred.shape() != shape {
        return Err(Error::shape_mismatch(shape, pred.shape()));
    }
    let frame = shape.frame;
    let (h, w) = (frame.height, frame.width);

    let ssim_params = match mode {
        EvalMode::Reference => SsimParams::gaussian(),
        EvalMode::Library(opts) => {
            if opts.win_size < 3 || opts.win_size % 2 == 0 {
                return Err(Error::InvalidConfig(format!(
                    "win_size must be odd and at least 3, got {}",
                    opts.win_size
                )));
            }
            if opts.win_size > h || opts.win_size > w {
                return Err(Error::WindowTooLarge {
                    window: opts.win_size,
                    height: h,
                    width: w,
                });
            }
            SsimParams::uniform(opts.win_size, opts.data_range.unwrap_or(2.0))
        }
    };
    debug!(shape = %shape, ?mode, "evaluating sequences");

    let mut mse_t = MetricTable::zeros(shape.batch, shape.time);
    let mut ssim_t = MetricTable::zeros(shape.batch, shape.time);
    let mut psnr_t = MetricTable::zeros(shape.batch, shape.time);
    let channels = frame.channels as f64;

    for b in 0..shape.batch {
        for t in 0..shape.time {
            let mut ssim_sum = 0.0;
            let mut psnr_sum = 0.0;
            for c in 0..frame.channels {
                let x = gt.channel(b, t, c);
                let y = pred.channel(b, t, c);

                let s = ssim(x, y, h, w, &ssim_params);
                ssim_sum += match mode {
                    EvalMode::Reference if !s.is_finite() => SSIM_SENTINEL,
                    _ => s,
                };

                let range = match mode {
                    EvalMode::Reference => 1.0,
                    EvalMode::Library(opts) => opts.data_range.unwrap_or_else(|| {
                        if x.iter().all(|&v| v >= 0.0) {
                            1.0
                        } else {
                            2.0
                        }
                    }),
                };
                psnr_sum += psnr(x, y, range);
            }
            ssim_t.set(b, t, ssim_sum / channels);
            psnr_t.set(b, t, psnr_sum / channels);
            mse_t.set(b, t, mse(gt.frame_data(b, t), pred.frame_data(b, t)));
        }
    }

    Ok(Evaluation {
        mse: mse_t,
        ssim: ssim_t,
        psnr: psnr_t,
    })
}

/// [`evaluate`] with the reference (published) formulas.
pub fn evaluate_reference(gt: &SequenceBatch, pred: &SequenceBatch) -> Result<Evaluation> {
    evaluate(gt, pred, EvalMode::Reference)
}

/// [`evaluate`] with the library formulas and default options.
pub fn evaluate_library(gt: &SequenceBatch, pred: &SequenceBatch) -> Result<Evaluation> {
    evaluate(gt, pred, EvalMode::Library(LibraryOptions::default()))
}
