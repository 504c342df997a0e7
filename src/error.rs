//! Error types for runscope
//!
//! Missing inputs are reported by callers before a parser runs; the variants
//! here cover what a parser or the monitor cannot recover from.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Runscope error types
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file or directory does not exist
    #[error("{what} not found: {}", path.display())]
    MissingInput {
        /// Human-readable name of the input
        what: String,
        /// Path that was checked
        path: PathBuf,
    },

    /// Summary JSON entry has an unexpected shape
    #[error("Malformed summary entry '{key}': {reason}")]
    MalformedSummary {
        /// Summary key (slash-delimited metric path)
        key: String,
        /// What was wrong with the entry
        reason: String,
    },

    /// Event file could not be decoded
    #[error("Event file {} could not be decoded: {reason}", path.display())]
    EventFile {
        /// Path of the offending event file
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// GPU query subprocess failed
    #[error("GPU query failed: {0}")]
    GpuQuery(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Check that a required input exists.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] naming `what` if `path` does not exist.
pub fn ensure_input(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            what: what.to_string(),
            path: path.to_path_buf(),
        })
    }
}
