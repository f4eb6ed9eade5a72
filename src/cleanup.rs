//! Removal of generated index pages.
//!
//! The reverse of [`crate::generate`]: walks the whole tree under the root
//! and deletes every regular file named
//! [`INDEX_FILE_NAME`](crate::naming::INDEX_FILE_NAME). Matching is by
//! file name only, so pages left behind by an older run (or a run with a
//! different config) are removed too.
//!
//! The walk covers hidden directories and does not follow symlinks. Entries
//! that cannot be read or deleted are reported and the walk continues.

use crate::naming;
use crate::types::{Skipped, relative_to};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// What a cleanup pass removed and what it had to skip.
#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    /// Removed index files, relative to the root.
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
}

/// Delete every generated index page under `root`.
pub fn cleanup(root: &Path) -> Result<CleanupReport, CleanupError> {
    if !root.is_dir() {
        return Err(CleanupError::NotADirectory(root.to_path_buf()));
    }

    let mut report = CleanupReport::default();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                report.skipped.push(Skipped::new(root, &path, e));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let is_index = entry
            .file_name()
            .to_str()
            .is_some_and(naming::is_index_file);
        if !is_index {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(path = %entry.path().display(), "removed index");
                report.removed.push(relative_to(root, entry.path()));
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "could not remove index");
                report.skipped.push(Skipped::new(root, entry.path(), e));
            }
        }
    }

    Ok(report)
}

/// Delete exactly the given index pages, relative to `root`.
///
/// Used after a serve session to remove only what that session generated,
/// leaving pages from earlier `generate` runs in place. Already missing
/// files are not an error.
pub fn remove_generated(root: &Path, rel_paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for rel in rel_paths {
        let path = root.join(rel);
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(rel.clone()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not remove index");
                report.skipped.push(Skipped::new(root, &path, e));
            }
        }
    }

    report
}
