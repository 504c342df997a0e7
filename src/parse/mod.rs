//! Log parsers
//!
//! - [`text_log`]: `keyword: <number>` occurrences in a flat training log
//! - [`summary_json`]: slash-keyed summary documents split by namespace
//!
//! Both parsers assume the input file exists; callers check first and report
//! a missing file themselves.

pub mod summary_json;
pub mod text_log;

pub use summary_json::{parse_summary, parse_summary_str};
pub use text_log::{parse_text_log, parse_text_log_str, BASELINE_KEYWORDS};
