//! Statistics reporters
//!
//! Reporters borrow a [`MetricSet`] and render through `Display`, so callers
//! decide where the text goes.

use std::fmt;

use crate::run::{MetricSeries, MetricSet};
use crate::stats::SeriesStats;

/// Write `width` copies of `ch` followed by a newline.
pub(crate) fn rule(f: &mut fmt::Formatter<'_>, ch: char, width: usize) -> fmt::Result {
    writeln!(f, "{}", ch.to_string().repeat(width))
}

/// Layout of a [`StatsReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// Initial/final/mean/std/min/max and the step count.
    Overview,
    /// Sample count first, plus absolute and percentage change.
    Trend,
}

impl ReportStyle {
    const fn empty_message(self) -> &'static str {
        match self {
            Self::Overview => "No data found!",
            Self::Trend => "No metrics found!",
        }
    }

    const fn width(self) -> usize {
        match self {
            Self::Overview => 60,
            Self::Trend => 70,
        }
    }
}

/// Per-metric descriptive statistics of one run.
///
/// Metrics with an empty series are skipped.
#[derive(Debug, Clone, Copy)]
pub struct StatsReport<'a> {
    name: &'a str,
    set: Option<&'a MetricSet>,
    style: ReportStyle,
}

impl<'a> StatsReport<'a> {
    /// Create a report for `set`, displayed under `name`.
    ///
    /// `None` renders as "no data" (the loader found nothing).
    #[must_use]
    pub const fn new(name: &'a str, set: Option<&'a MetricSet>, style: ReportStyle) -> Self {
        Self { name, set, style }
    }

    fn overview_block(f: &mut fmt::Formatter<'_>, metric: &str, s: &SeriesStats) -> fmt::Result {
        writeln!(f, "{metric}:")?;
        writeln!(f, "  Initial: {:.6}", s.initial)?;
        writeln!(f, "  Final:   {:.6}", s.final_value)?;
        writeln!(f, "  Mean:    {:.6}", s.mean)?;
        writeln!(f, "  Std:     {:.6}", s.std_dev)?;
        writeln!(f, "  Min:     {:.6}", s.min)?;
        writeln!(f, "  Max:     {:.6}", s.max)?;
        writeln!(f, "  Steps:   {}", s.count)?;
        writeln!(f)
    }

    fn trend_block(f: &mut fmt::Formatter<'_>, metric: &str, s: &SeriesStats) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{metric}:")?;
        writeln!(f, "  Episodes: {}", s.count)?;
        writeln!(f, "  Initial:  {:.6}", s.initial)?;
        writeln!(f, "  Final:    {:.6}", s.final_value)?;
        writeln!(f, "  Mean:     {:.6}", s.mean)?;
        writeln!(f, "  Std:      {:.6}", s.std_dev)?;
        writeln!(f, "  Min:      {:.6}", s.min)?;
        writeln!(f, "  Max:      {:.6}", s.max)?;
        if s.has_trend() {
            writeln!(f, "  Change:   {:+.6} ({:+.2}%)", s.change(), s.change_pct())?;
        }
        Ok(())
    }
}

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.style.width();
        writeln!(f)?;
        rule(f, '=', width)?;
        match self.style {
            ReportStyle::Overview => writeln!(f, "{} - Training Metrics Summary", self.name)?,
            ReportStyle::Trend => writeln!(f, "{} Training Statistics", self.name)?,
        }
        rule(f, '=', width)?;
        if self.style == ReportStyle::Overview {
            writeln!(f)?;
        }

        let Some(set) = self.set.filter(|set| !set.is_empty()) else {
            return writeln!(f, "{}", self.style.empty_message());
        };

        for (metric, series) in set {
            let Some(stats) = SeriesStats::compute(series.values()) else {
                continue;
            };
            match self.style {
                ReportStyle::Overview => Self::overview_block(f, metric, &stats)?,
                ReportStyle::Trend => Self::trend_block(f, metric, &stats)?,
            }
        }
        Ok(())
    }
}

/// Final value and change of each metric, one line per metric.
#[derive(Debug, Clone, Copy)]
pub struct FinalPerformance<'a> {
    heading: &'a str,
    set: &'a MetricSet,
    keys: Option<&'a [&'a str]>,
    indent: usize,
    with_mean: bool,
}

impl<'a> FinalPerformance<'a> {
    /// List every non-empty metric of `set` under `heading`.
    #[must_use]
    pub const fn new(heading: &'a str, set: &'a MetricSet) -> Self {
        Self {
            heading,
            set,
            keys: None,
            indent: 0,
            with_mean: false,
        }
    }

    /// Restrict the listing to `keys`, in that order.
    #[must_use]
    pub const fn keys(mut self, keys: &'a [&'a str]) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Indent each metric line by `indent` spaces.
    #[must_use]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Also show the series mean.
    #[must_use]
    pub const fn with_mean(mut self) -> Self {
        self.with_mean = true;
        self
    }

    fn line(&self, f: &mut fmt::Formatter<'_>, metric: &str, series: &MetricSeries) -> fmt::Result {
        let Some(stats) = SeriesStats::compute(series.values()) else {
            return Ok(());
        };
        write!(
            f,
            "{:indent$}{metric:30}: {:10.6}  (",
            "",
            stats.final_value,
            indent = self.indent
        )?;
        if self.with_mean {
            write!(f, "mean: {:.6}, ", stats.mean)?;
        }
        writeln!(f, "change: {:+.6})", stats.change())
    }
}

impl fmt::Display for FinalPerformance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        match self.keys {
            Some(keys) => {
                for &key in keys {
                    if let Some(series) = self.set.get(key) {
                        self.line(f, key, series)?;
                    }
                }
            }
            None => {
                for (metric, series) in self.set {
                    self.line(f, metric, series)?;
                }
            }
        }
        Ok(())
    }
}
