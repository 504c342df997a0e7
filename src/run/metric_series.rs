//! Metric Series - ordered samples of one metric within one run

use serde::{Deserialize, Serialize};

/// Ordered numeric samples for a single metric.
///
/// Samples sourced from event files also carry the training step of each
/// value; text and summary logs only carry values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricSeries {
    steps: Option<Vec<i64>>,
    values: Vec<f64>,
}

impl MetricSeries {
    /// Create a series from values alone.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self {
            steps: None,
            values,
        }
    }

    /// Create a series from `(step, value)` pairs, preserving their order.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = (i64, f64)>) -> Self {
        let (steps, values): (Vec<i64>, Vec<f64>) = points.into_iter().unzip();
        Self {
            steps: Some(steps),
            values,
        }
    }

    /// Get the sample values in recorded order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the step indices, if the source recorded them.
    #[must_use]
    pub fn steps(&self) -> Option<&[i64]> {
        self.steps.as_deref()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First recorded value.
    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Last recorded value.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl From<Vec<f64>> for MetricSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
