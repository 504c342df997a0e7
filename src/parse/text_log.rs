//! Text-log parser
//!
//! Extracts every `keyword: <number>` occurrence for a fixed set of keywords.
//! Numbers accept an optional sign, a decimal point and an exponent.
//!
//! Keywords are anchored at a word boundary, so `critic_value_loss: 2.0` is
//! not counted as a `value_loss` sample. A plain substring search would pick
//! it up.

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::run::{MetricSeries, MetricSet};
use crate::{Error, Result};

/// Keywords logged by the shared-policy (MAPPO) trainer.
pub const BASELINE_KEYWORDS: &[&str] = &[
    "average_step_reward",
    "reach_target_reward",
    "distance_to_target_reward",
    "collision_punishment",
    "push_reward",
    "value_loss",
    "policy_loss",
    "dist_entropy",
    "actor_grad_norm",
    "critic_grad_norm",
    "ratio",
];

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

/// Parse a text log file.
///
/// # Errors
///
/// Returns error if the file cannot be read.
pub fn parse_text_log<P: AsRef<Path>>(path: P, keywords: &[&str]) -> Result<MetricSet> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_text_log_str(&content, keywords)
}

/// Parse text log contents already in memory.
///
/// Every keyword gets an entry; a keyword without matches maps to an empty
/// series.
///
/// # Errors
///
/// Returns error if a keyword produces an invalid pattern.
pub fn parse_text_log_str(content: &str, keywords: &[&str]) -> Result<MetricSet> {
    let mut set = MetricSet::new();

    for &keyword in keywords {
        let pattern = format!(r"\b{}:\s*({NUMBER})", regex::escape(keyword));
        let re = Regex::new(&pattern)
            .map_err(|e| Error::Other(format!("Invalid keyword pattern '{keyword}': {e}")))?;

        let values: Vec<f64> = re
            .captures_iter(content)
            .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
            .collect();

        debug!(keyword, matches = values.len(), "text log keyword scanned");
        set.insert(keyword, MetricSeries::new(values));
    }

    Ok(set)
}
