//! Event-log loader
//!
//! Walks a directory tree for event files and collects every scalar tag into
//! a [`MetricSet`] whose series carry step indices.
//!
//! # Example
//!
//! ```rust,no_run
//! use runscope::loader::load_event_dir;
//!
//! match load_event_dir("./results/models/baseline_mappo/mid/logs")? {
//!     Some(set) => println!("{} scalar tags", set.len()),
//!     None => println!("no event files"),
//! }
//! # Ok::<(), runscope::Error>(())
//! ```

pub mod event_file;

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::run::{MetricSeries, MetricSet};
use crate::Result;

pub use event_file::{decode_scalars, ScalarEvent};

/// File name prefix of event files.
pub const EVENT_FILE_PREFIX: &str = "events.out.tfevents.";

/// Find event files below `root`, in sorted path order.
#[must_use]
pub fn find_event_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(EVENT_FILE_PREFIX))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Qualified metric name: the tag prefixed by the event file's parent
/// directory name, or the bare tag when the parent is the current directory.
#[must_use]
pub fn qualified_name(event_file: &Path, tag: &str) -> String {
    match event_file
        .parent()
        .and_then(Path::file_name)
        .and_then(OsStr::to_str)
    {
        Some(dir) if dir != "." => format!("{dir}/{tag}"),
        _ => tag.to_string(),
    }
}

/// Load all scalar series below `root`.
///
/// # Returns
///
/// `Ok(None)` when no event file exists below `root`. A file that fails to
/// decode contributes nothing. When two files yield the same qualified name,
/// the later file in path order wins.
///
/// # Errors
///
/// Returns error only if an event file that was found cannot be read.
pub fn load_event_dir<P: AsRef<Path>>(root: P) -> Result<Option<MetricSet>> {
    let root = root.as_ref();
    let files = find_event_files(root);
    if files.is_empty() {
        info!(dir = %root.display(), "no event files found");
        return Ok(None);
    }

    info!(dir = %root.display(), files = files.len(), "loading event files");
    let mut set = MetricSet::new();

    for path in files {
        let bytes = fs::read(&path)?;
        let scalars = match decode_scalars(&path, &bytes) {
            Ok(scalars) => scalars,
            Err(e) => {
                warn!(error = %e, "skipping event file");
                continue;
            }
        };

        let mut by_tag: BTreeMap<String, Vec<(i64, f64)>> = BTreeMap::new();
        for ScalarEvent { tag, step, value } in scalars {
            by_tag.entry(tag).or_default().push((step, value));
        }

        debug!(file = %path.display(), tags = by_tag.len(), "event file decoded");
        for (tag, points) in by_tag {
            set.insert(qualified_name(&path, &tag), MetricSeries::from_points(points));
        }
    }

    Ok(Some(set))
}
