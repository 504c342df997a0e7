//! # Runscope: Training-Run Inspection
//!
//! Reads the logs a multi-agent training run leaves behind and compares runs
//! against each other.
//!
//! Three independent pipelines produce [`run::MetricSet`]s:
//!
//! - [`loader`]: scalar series from event files below a directory
//! - [`parse::text_log`]: `keyword: <number>` occurrences in a text log
//! - [`parse::summary_json`]: slash-keyed summaries split by namespace
//!
//! [`report`] renders per-metric statistics and side-by-side comparisons.
//! [`monitor`] is a separate GPU memory poller.
//!
//! ## Example Usage
//!
//! ```rust
//! use runscope::parse::parse_text_log_str;
//! use runscope::report::{compare_final, ComparisonTable};
//!
//! let mappo = parse_text_log_str("value_loss: 0.9\nvalue_loss: 0.4\n", &["value_loss"])?;
//! let other = parse_text_log_str("value_loss: 0.8\nvalue_loss: 0.3\n", &["value_loss"])?;
//!
//! let rows = compare_final(&mappo, &other);
//! println!("{}", ComparisonTable::new("Final Metrics", "MAPPO", "Other", &rows));
//! # Ok::<(), runscope::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod loader;
pub mod monitor;
pub mod parse;
pub mod report;
pub mod run;
pub mod stats;

pub use error::{Error, Result};
