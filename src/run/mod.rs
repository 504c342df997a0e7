//! Run data model
//!
//! ## Schema Overview
//!
//! ```text
//! RunRecord (directory) ──> MetricSet (N, one per namespace)
//!                               │
//!                               └──< MetricSeries (N) [ordered samples]
//! ```
//!
//! Series are produced once by a parser and only read afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use runscope::run::{MetricSeries, MetricSet};
//!
//! let mut set = MetricSet::new();
//! set.insert("value_loss", MetricSeries::new(vec![1.23, -0.045]));
//!
//! assert_eq!(set.final_value("value_loss"), Some(-0.045));
//! ```

mod metric_series;
mod metric_set;
mod namespace;
mod run_record;

pub use metric_series::MetricSeries;
pub use metric_set::MetricSet;
pub use namespace::{Namespace, NamespacedMetrics};
pub use run_record::RunRecord;
