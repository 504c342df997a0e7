//! Run Record - on-disk layout of one training run

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// Run Record describes a training run directory.
///
/// A run directory is expected to hold a `logs/` subdirectory, a `models/`
/// subdirectory with one entry per checkpoint, and a `config.json` with the
/// arguments the run was launched with. Every part is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    run_id: String,
    path: PathBuf,
    log_entries: Option<Vec<String>>,
    checkpoint_count: Option<usize>,
    config: Option<serde_json::Value>,
}

impl RunRecord {
    /// Inspect a run directory.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the directory does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if a subdirectory cannot be listed or `config.json`
    /// exists but is not valid JSON.
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "run directory missing");
            return Ok(None);
        }

        let run_id = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let logs_dir = path.join("logs");
        let log_entries = if logs_dir.exists() {
            Some(list_entries(&logs_dir)?)
        } else {
            None
        };

        let models_dir = path.join("models");
        let checkpoint_count = if models_dir.exists() {
            Some(list_entries(&models_dir)?.len())
        } else {
            None
        };

        let config_file = path.join("config.json");
        let config = if config_file.exists() {
            let contents = fs::read_to_string(&config_file)?;
            Some(serde_json::from_str(&contents)?)
        } else {
            None
        };

        Ok(Some(Self {
            run_id,
            path: path.to_path_buf(),
            log_entries,
            checkpoint_count,
            config,
        }))
    }

    /// Get the run ID (directory name).
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the run directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries of the `logs/` subdirectory, if it exists.
    #[must_use]
    pub fn log_entries(&self) -> Option<&[String]> {
        self.log_entries.as_deref()
    }

    /// Number of entries in `models/`, if it exists.
    #[must_use]
    pub const fn checkpoint_count(&self) -> Option<usize> {
        self.checkpoint_count
    }

    /// Get the parsed `config.json`, if any.
    #[must_use]
    pub const fn config(&self) -> Option<&serde_json::Value> {
        self.config.as_ref()
    }

    /// Look up a nested config field by its path of object keys.
    #[must_use]
    pub fn config_field(&self, path: &[&str]) -> Option<&serde_json::Value> {
        path.iter()
            .try_fold(self.config.as_ref()?, |value, key| value.get(key))
    }

    /// Training algorithm (`main_args.algo`).
    #[must_use]
    pub fn algorithm(&self) -> Option<&serde_json::Value> {
        self.config_field(&["main_args", "algo"])
    }

    /// Number of parallel environments (`env_args.num_envs`).
    #[must_use]
    pub fn num_envs(&self) -> Option<&serde_json::Value> {
        self.config_field(&["env_args", "num_envs"])
    }

    /// Episode length (`env_args.episode_length`).
    #[must_use]
    pub fn episode_length(&self) -> Option<&serde_json::Value> {
        self.config_field(&["env_args", "episode_length"])
    }

    /// Total environment steps (`algo_args.train.num_env_steps`).
    #[must_use]
    pub fn total_steps(&self) -> Option<&serde_json::Value> {
        self.config_field(&["algo_args", "train", "num_env_steps"])
    }
}

fn list_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
