//! Statistics reporter and run comparator
//!
//! Everything here renders through `Display`; nothing prints directly.
//!
//! ```rust
//! use runscope::report::{ReportStyle, StatsReport};
//! use runscope::run::MetricSet;
//!
//! let set: MetricSet = [("value_loss", vec![1.0, 0.5])].into_iter().collect();
//! let text = StatsReport::new("Baseline", Some(&set), ReportStyle::Trend).to_string();
//! assert!(text.contains("Change:   -0.500000 (-50.00%)"));
//! ```

mod comparator;
mod reporter;

pub use comparator::{
    compare_cross_namespace, compare_final, ComparisonRow, ComparisonTable, Correspondence,
    KeyDiff, KeyDiffReport, Projection, CORRESPONDENCES,
};
pub use reporter::{FinalPerformance, ReportStyle, StatsReport};
