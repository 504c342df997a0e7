//! Descriptive statistics over a metric series
//!
//! Standard deviation is the population form (divides by `n`), matching
//! `numpy.std` with its default `ddof=0`.

use serde::{Deserialize, Serialize};

/// Summary statistics of a non-empty series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Number of samples.
    pub count: usize,
    /// First sample.
    pub initial: f64,
    /// Last sample.
    pub final_value: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
}

impl SeriesStats {
    /// Compute statistics for `values`.
    ///
    /// Returns `None` for an empty slice; empty series are skipped by the
    /// reporters rather than treated as errors.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(values: &[f64]) -> Option<Self> {
        let (&initial, &final_value) = (values.first()?, values.last()?);
        let n = values.len() as f64;

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            initial,
            final_value,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Absolute change from first to last sample.
    #[must_use]
    pub fn change(&self) -> f64 {
        self.final_value - self.initial
    }

    /// Change relative to the magnitude of the first sample, in percent.
    ///
    /// Defined as `0.0` when the first sample is exactly zero.
    #[must_use]
    pub fn change_pct(&self) -> f64 {
        percent_change(self.initial, self.final_value)
    }

    /// Whether a trend line is meaningful (at least two samples).
    #[must_use]
    pub const fn has_trend(&self) -> bool {
        self.count >= 2
    }
}

/// Percentage change from `initial` to `final_value`, relative to `|initial|`.
///
/// Returns `0.0` when `initial` is exactly zero.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn percent_change(initial: f64, final_value: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    (final_value - initial) / initial.abs() * 100.0
}
