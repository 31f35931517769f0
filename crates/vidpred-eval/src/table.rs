use serde::{Deserialize, Serialize};

/// A `samples x timesteps` table of metric values, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl MetricTable {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        MetricTable {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Number of samples.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of timesteps.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, sample: usize, t: usize) -> f64 {
        self.values[sample * self.cols + t]
    }

    pub(crate) fn set(&mut self, sample: usize, t: usize, v: f64) {
        self.values[sample * self.cols + t] = v;
    }

    /// All timesteps of one sample.
    pub fn row(&self, sample: usize) -> &[f64] {
        &self.values[sample * self.cols..(sample + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean over samples at each timestep (the usual per-step curve).
    pub fn mean_per_timestep(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|t| (0..self.rows).map(|s| self.get(s, t)).sum::<f64>() / self.rows as f64)
            .collect()
    }

    /// Mean over every entry.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}
