//! Application configuration
//!
//! Defaults point at the standard results layout of the push task; a JSON
//! file can override any subset of fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Paths of the runs being inspected, plus monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Text log of the shared-policy baseline run.
    pub baseline_log: PathBuf,

    /// Event-file directory of the baseline run.
    pub baseline_event_dir: PathBuf,

    /// Event-file directory of the heterogeneous-agent run.
    pub candidate_event_dir: PathBuf,

    /// Summary JSON of the heterogeneous-agent run.
    pub candidate_summary: PathBuf,

    /// Heterogeneous-agent run directories to inspect.
    pub candidate_runs: Vec<PathBuf>,

    /// GPU monitor settings.
    pub monitor: MonitorConfig,
}

const CANDIDATE_RUN: &str =
    "./results/mapush/go1push_mid/happo/cuboid/seed-00001-2025-11-19-13-26-03";

impl Default for AppConfig {
    fn default() -> Self {
        let candidate_run = PathBuf::from(CANDIDATE_RUN);
        Self {
            baseline_log: PathBuf::from("./results/models/baseline_mappo/mid/log.txt"),
            baseline_event_dir: PathBuf::from("./results/models/baseline_mappo/mid/logs"),
            candidate_event_dir: candidate_run.join("logs"),
            candidate_summary: candidate_run.join("logs").join("summary.json"),
            candidate_runs: vec![
                candidate_run,
                PathBuf::from(
                    "./results/mapush/go1push_mid/happo/cuboid/seed-00001-2025-11-15-15-34-13",
                ),
            ],
            monitor: MonitorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration file; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load `path` when given, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the given file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// GPU monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between samples.
    pub interval_secs: u64,

    /// Log file entries are appended to.
    pub log_file: PathBuf,

    /// Stop after this many hours; `None` runs until interrupted.
    pub duration_hours: Option<f64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            log_file: PathBuf::from("gpu_vram_log.txt"),
            duration_hours: None,
        }
    }
}

impl MonitorConfig {
    /// Interval between samples.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Time budget, if any. Non-positive, non-finite or unrepresentably
    /// large budgets are unbounded.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration_hours
            .filter(|h| h.is_finite() && *h > 0.0)
            .and_then(|h| Duration::try_from_secs_f64(h * 3600.0).ok())
    }
}
