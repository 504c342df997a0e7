//! Comparator for two runs
//!
//! Two kinds of comparison are supported:
//!
//! - same-namespace: metric names are matched directly ([`KeyDiff`],
//!   [`compare_final`])
//! - heterogeneous vs single-policy: a fixed correspondence table maps
//!   baseline metric names onto candidate namespaces
//!   ([`compare_cross_namespace`])

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::reporter::rule;
use crate::run::{MetricSet, Namespace, NamespacedMetrics};

/// Metric names split by which side defines them. All lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    /// Names only on the left side.
    pub left_only: Vec<String>,
    /// Names only on the right side.
    pub right_only: Vec<String>,
    /// Names on both sides.
    pub common: Vec<String>,
}

impl KeyDiff {
    /// Diff the metric names of two sets.
    #[must_use]
    pub fn between(left: &MetricSet, right: &MetricSet) -> Self {
        let left_keys: BTreeSet<&str> = left.names().collect();
        let right_keys: BTreeSet<&str> = right.names().collect();

        Self {
            left_only: left_keys
                .difference(&right_keys)
                .map(|s| (*s).to_string())
                .collect(),
            right_only: right_keys
                .difference(&left_keys)
                .map(|s| (*s).to_string())
                .collect(),
            common: left_keys
                .intersection(&right_keys)
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Renders a [`KeyDiff`] with counts and side-specific name lists.
#[derive(Debug, Clone, Copy)]
pub struct KeyDiffReport<'a> {
    left_label: &'a str,
    right_label: &'a str,
    left_count: usize,
    right_count: usize,
    diff: &'a KeyDiff,
}

impl<'a> KeyDiffReport<'a> {
    /// Create a report for `diff`; counts are the sizes of the full sets.
    #[must_use]
    pub const fn new(
        left_label: &'a str,
        right_label: &'a str,
        left_count: usize,
        right_count: usize,
        diff: &'a KeyDiff,
    ) -> Self {
        Self {
            left_label,
            right_label,
            left_count,
            right_count,
            diff,
        }
    }
}

impl fmt::Display for KeyDiffReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} metrics: {}", self.left_label, self.left_count)?;
        writeln!(f, "{} metrics: {}", self.right_label, self.right_count)?;

        writeln!(f, "\n{}-specific metrics:", self.left_label)?;
        for key in &self.diff.left_only {
            writeln!(f, "  - {key}")?;
        }
        writeln!(f, "\n{}-specific metrics:", self.right_label)?;
        for key in &self.diff.right_only {
            writeln!(f, "  - {key}")?;
        }
        Ok(())
    }
}

/// One row of a final-value comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Row label (metric name or correspondence label).
    pub metric: String,
    /// Final value on the left side.
    pub left: f64,
    /// Final value on the right side.
    pub right: f64,
}

impl ComparisonRow {
    /// `right - left`.
    #[must_use]
    pub fn diff(&self) -> f64 {
        self.right - self.left
    }
}

/// Final values of metrics common to both sets, sorted by name.
///
/// Metrics whose series is empty on either side are left out.
#[must_use]
pub fn compare_final(left: &MetricSet, right: &MetricSet) -> Vec<ComparisonRow> {
    KeyDiff::between(left, right)
        .common
        .into_iter()
        .filter_map(|metric| {
            let left = left.final_value(&metric)?;
            let right = right.final_value(&metric)?;
            Some(ComparisonRow {
                metric,
                left,
                right,
            })
        })
        .collect()
}

/// How a candidate-side value is obtained for a correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Final value of a metric in one namespace.
    Single(Namespace, &'static str),
    /// Mean of the final values of a metric in both agent namespaces. When
    /// the second agent lacks the metric, the first agent's value is used.
    AgentMean(&'static str),
}

impl Projection {
    /// Resolve the candidate value.
    #[must_use]
    pub fn resolve(self, candidate: &NamespacedMetrics) -> Option<f64> {
        match self {
            Self::Single(namespace, metric) => candidate.final_value(namespace, metric),
            Self::AgentMean(metric) => {
                let agent0 = candidate.final_value(Namespace::Agent0, metric)?;
                let agent1 = candidate
                    .final_value(Namespace::Agent1, metric)
                    .unwrap_or(agent0);
                Some((agent0 + agent1) / 2.0)
            }
        }
    }
}

/// A fixed mapping from a baseline metric to a candidate projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correspondence {
    /// Row label.
    pub label: &'static str,
    /// Baseline metric name.
    pub baseline: &'static str,
    /// Candidate-side projection.
    pub candidate: Projection,
}

/// Correspondences between a single-policy baseline and a heterogeneous-agent
/// candidate.
pub const CORRESPONDENCES: &[Correspondence] = &[
    Correspondence {
        label: "Average Episode Reward",
        baseline: "average_step_reward",
        candidate: Projection::Single(Namespace::Rewards, "aver_rewards"),
    },
    Correspondence {
        label: "Policy Entropy (exploration)",
        baseline: "dist_entropy",
        candidate: Projection::AgentMean("dist_entropy"),
    },
    Correspondence {
        label: "Value Loss",
        baseline: "value_loss",
        candidate: Projection::Single(Namespace::Critic, "value_loss"),
    },
];

/// Compare a baseline against a namespaced candidate using [`CORRESPONDENCES`].
///
/// A row appears only when both sides resolve to a value.
#[must_use]
pub fn compare_cross_namespace(
    baseline: &MetricSet,
    candidate: &NamespacedMetrics,
) -> Vec<ComparisonRow> {
    CORRESPONDENCES
        .iter()
        .filter_map(|c| {
            Some(ComparisonRow {
                metric: c.label.to_string(),
                left: baseline.final_value(c.baseline)?,
                right: c.candidate.resolve(candidate)?,
            })
        })
        .collect()
}

/// Side-by-side table of [`ComparisonRow`]s.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonTable<'a> {
    title: &'a str,
    left_label: &'a str,
    right_label: &'a str,
    rows: &'a [ComparisonRow],
    metric_width: usize,
    diff_header: &'a str,
    diff_width: usize,
    width: usize,
}

impl<'a> ComparisonTable<'a> {
    /// Create a table for `rows`.
    #[must_use]
    pub const fn new(
        title: &'a str,
        left_label: &'a str,
        right_label: &'a str,
        rows: &'a [ComparisonRow],
    ) -> Self {
        Self {
            title,
            left_label,
            right_label,
            rows,
            metric_width: 30,
            diff_header: "Diff",
            diff_width: 10,
            width: 70,
        }
    }

    /// Use the wide layout (longer labels, wider diff column).
    #[must_use]
    pub const fn wide(mut self) -> Self {
        self.metric_width = 35;
        self.diff_header = "Difference";
        self.diff_width = 15;
        self.width = 80;
        self
    }
}

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mw, dw) = (self.metric_width, self.diff_width);
        let width = self.width;

        writeln!(f)?;
        rule(f, '=', width)?;
        writeln!(f, "{}", self.title)?;
        rule(f, '=', width)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<mw$} {:>15} {:>15} {:>dw$}",
            "Metric", self.left_label, self.right_label, self.diff_header
        )?;
        rule(f, '-', width)?;
        for row in self.rows {
            writeln!(
                f,
                "{:<mw$} {:>15.6} {:>15.6} {:>+dw$.6}",
                row.metric,
                row.left,
                row.right,
                row.diff()
            )?;
        }
        Ok(())
    }
}
