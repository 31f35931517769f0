// Pixel-wise error metrics

/// Mean squared error over two equally sized buffers.
///
/// For a `[C, H, W]` frame this is the squared error summed over every channel
/// and position, divided by `C * H * W`.
pub fn mse(x: &[f64], y: &[f64]) -> f64 {
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum();
    sum / x.len() as f64
}

/// Peak signal-to-noise ratio in dB: `10 * log10(range^2 / mse)`.
///
/// Identical inputs give `+inf`.
pub fn psnr(x: &[f64], y: &[f64], data_range: f64) -> f64 {
    10.0 * (data_range * data_range / mse(x, y)).log10()
}
