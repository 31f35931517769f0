// SSIM: structural similarity over local windows
//
// For two planes x, y and a weighting window w:
//
//   mu_x   = w * x                 sigma_x^2 = n * (w * x^2 - mu_x^2)
//   mu_y   = w * y                 sigma_y^2 = n * (w * y^2 - mu_y^2)
//                                  sigma_xy  = n * (w * xy  - mu_x mu_y)
//
//   SSIM = ((2 mu_x mu_y + C1) (2 sigma_xy + C2))
//        / ((mu_x^2 + mu_y^2 + C1) (sigma_x^2 + sigma_y^2 + C2))
//
// with C1 = (K1 L)^2, C2 = (K2 L)^2 for dynamic range L, and n = 1 for the
// population covariance or N / (N - 1) for the sample covariance over an
// N-pixel window. The score of an image pair is the mean of the SSIM map.

use crate::window::Window;

pub const K1: f64 = 0.01;
pub const K2: f64 = 0.03;

/// Parameters of one SSIM computation.
#[derive(Debug, Clone)]
pub struct SsimParams {
    pub window: Window,
    /// Dynamic range L of the pixel values.
    pub data_range: f64,
    /// Apply the N / (N - 1) sample-covariance correction.
    pub sample_covariance: bool,
}

impl SsimParams {
    /// 11x11 Gaussian (sigma 1.5), range 1, population covariance: the setup
    /// of Wang et al. used by the video prediction literature.
    pub fn gaussian() -> Self {
        SsimParams {
            window: Window::gaussian(11, 1.5),
            data_range: 1.0,
            sample_covariance: false,
        }
    }

    /// `size x size` box window with sample covariance, as in general-purpose
    /// image libraries.
    pub fn uniform(size: usize, data_range: f64) -> Self {
        SsimParams {
            window: Window::uniform(size),
            data_range,
            sample_covariance: true,
        }
    }

    fn c1(&self) -> f64 {
        (K1 * self.data_range).powi(2)
    }

    fn c2(&self) -> f64 {
        (K2 * self.data_range).powi(2)
    }

    fn cov_norm(&self) -> f64 {
        if self.sample_covariance {
            let n = (self.window.size() * self.window.size()) as f64;
            n / (n - 1.0)
        } else {
            1.0
        }
    }
}

/// SSIM value at every valid window position of two `h x w` planes.
///
/// Empty when the window is larger than the planes.
pub fn ssim_map(x: &[f64], y: &[f64], h: usize, w: usize, params: &SsimParams) -> Vec<f64> {
    let win = &params.window;
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(y).map(|(a, b)| a * b).collect();

    let mu1 = win.filter_valid(x, h, w);
    let mu2 = win.filter_valid(y, h, w);
    let e11 = win.filter_valid(&xx, h, w);
    let e22 = win.filter_valid(&yy, h, w);
    let e12 = win.filter_valid(&xy, h, w);

    let (c1, c2, n) = (params.c1(), params.c2(), params.cov_norm());
    (0..mu1.len())
        .map(|i| {
            let mu1_sq = mu1[i] * mu1[i];
            let mu2_sq = mu2[i] * mu2[i];
            let mu1_mu2 = mu1[i] * mu2[i];
            let sigma1_sq = n * (e11[i] - mu1_sq);
            let sigma2_sq = n * (e22[i] - mu2_sq);
            let sigma12 = n * (e12[i] - mu1_mu2);
            ((2.0 * mu1_mu2 + c1) * (2.0 * sigma12 + c2))
                / ((mu1_sq + mu2_sq + c1) * (sigma1_sq + sigma2_sq + c2))
        })
        .collect()
}

/// Mean SSIM of two planes. NaN when the window does not fit.
pub fn ssim(x: &[f64], y: &[f64], h: usize, w: usize, params: &SsimParams) -> f64 {
    let map = ssim_map(x, y, h, w, params);
    map.iter().sum::<f64>() / map.len() as f64
}
