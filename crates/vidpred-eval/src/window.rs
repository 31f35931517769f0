// Sliding windows for local image statistics
//
// Both windows used by SSIM are separable: the 2-D weight at (dy, dx) is
// taps[dy] * taps[dx]. Filtering runs a horizontal pass then a vertical pass.
//
// Only "valid" output positions are produced, i.e. those where the window lies
// entirely inside the image, so an H x W plane filtered with a k x k window
// yields (H - k + 1) x (W - k + 1) values and no padding is ever read. For an
// odd k this is exactly the interior that remains after cropping (k - 1) / 2
// pixels from each edge of a same-size filtered output.

/// A separable square window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    taps: Vec<f64>,
}

impl Window {
    /// Gaussian window of `size` taps with standard deviation `sigma`,
    /// normalised so the 2-D weights sum to 1 (MATLAB `fspecial('gaussian')`).
    ///
    /// Offsets run from `-ceil(size/2) + 1` to `size/2`, so odd sizes are
    /// centred.
    pub fn gaussian(size: usize, sigma: f64) -> Self {
        let lo = 1 - size.div_ceil(2) as isize;
        let raw: Vec<f64> = (0..size as isize)
            .map(|i| {
                let x = (lo + i) as f64;
                (-(x * x) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Window {
            taps: raw.into_iter().map(|v| v / sum).collect(),
        }
    }

    /// Box window: every one of the `size * size` weights is `1 / size^2`.
    pub fn uniform(size: usize) -> Self {
        Window {
            taps: vec![1.0 / size as f64; size],
        }
    }

    /// Side length of the window.
    pub fn size(&self) -> usize {
        self.taps.len()
    }

    /// 1-D taps.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// 2-D weight at row `dy`, column `dx`.
    pub fn weight(&self, dy: usize, dx: usize) -> f64 {
        self.taps[dy] * self.taps[dx]
    }

    /// Output dimensions of a valid-mode filter over an `h x w` plane.
    pub fn valid_dims(&self, h: usize, w: usize) -> (usize, usize) {
        let k = self.size();
        ((h + 1).saturating_sub(k), (w + 1).saturating_sub(k))
    }

    /// Weighted local sums of `plane` (row-major `h x w`) at every valid
    /// position. Returns an empty vector when the window does not fit.
    pub fn filter_valid(&self, plane: &[f64], h: usize, w: usize) -> Vec<f64> {
        let k = self.size();
        let (oh, ow) = self.valid_dims(h, w);
        if oh == 0 || ow == 0 {
            return Vec::new();
        }

        // horizontal pass: h x ow
        let mut rows = vec![0.0; h * ow];
        for y in 0..h {
            let src = &plane[y * w..(y + 1) * w];
            for x in 0..ow {
                rows[y * ow + x] = src[x..x + k]
                    .iter()
                    .zip(&self.taps)
                    .map(|(v, t)| v * t)
                    .sum();
            }
        }

        // vertical pass: oh x ow
        let mut out = vec![0.0; oh * ow];
        for y in 0..oh {
            for (dy, t) in self.taps.iter().enumerate() {
                let src = &rows[(y + dy) * ow..(y + dy + 1) * ow];
                let dst = &mut out[y * ow..(y + 1) * ow];
                for (d, s) in dst.iter_mut().zip(src) {
                    *d += t * s;
                }
            }
        }
        out
    }
}
