//! Summary-JSON parser
//!
//! Input shape: `{ "<a>/<b>/.../<metric>": [[t, step, value], ...], ... }`.
//! Only the third element of each triplet is kept.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::run::{MetricSeries, Namespace, NamespacedMetrics};
use crate::{Error, Result};

type RawSummary = BTreeMap<String, Vec<Vec<serde_json::Value>>>;

/// Parse a summary JSON file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not a JSON object of arrays,
/// or an entry has no numeric third element.
pub fn parse_summary<P: AsRef<Path>>(path: P) -> Result<NamespacedMetrics> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_summary_str(&content)
}

/// Parse summary JSON contents already in memory.
///
/// Keys matching none of the namespace markers are dropped.
///
/// # Errors
///
/// Returns error on malformed JSON or an entry without a numeric third
/// element.
pub fn parse_summary_str(content: &str) -> Result<NamespacedMetrics> {
    let raw: RawSummary = serde_json::from_str(content)?;
    let mut metrics = NamespacedMetrics::new();
    let mut dropped = 0usize;

    for (key, entries) in raw {
        let values = entries
            .iter()
            .map(|entry| entry_value(&key, entry))
            .collect::<Result<Vec<f64>>>()?;

        let Some(namespace) = Namespace::classify(&key) else {
            debug!(key = %key, "summary key outside known namespaces");
            dropped += 1;
            continue;
        };

        let metric_name = key.rsplit('/').next().unwrap_or(&key);
        metrics
            .set_mut(namespace)
            .insert(metric_name, MetricSeries::new(values));
    }

    if dropped > 0 {
        warn!(dropped, "summary keys dropped (no agent0/agent1/critic/reward marker)");
    }

    Ok(metrics)
}

fn entry_value(key: &str, entry: &[serde_json::Value]) -> Result<f64> {
    let value = entry.get(2).ok_or_else(|| Error::MalformedSummary {
        key: key.to_string(),
        reason: format!("entry has {} element(s), expected 3", entry.len()),
    })?;

    value.as_f64().ok_or_else(|| Error::MalformedSummary {
        key: key.to_string(),
        reason: format!("value {value} is not numeric"),
    })
}
