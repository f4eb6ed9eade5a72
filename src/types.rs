//! Shared types used across the scan, generate, and cleanup passes.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A directory or file a pass could not handle.
///
/// Passes are best-effort: a failure on one entry is recorded here and the
/// walk moves on. `path` is relative to the gallery root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

impl Skipped {
    pub fn new(root: &Path, path: &Path, reason: impl ToString) -> Self {
        Self {
            path: relative_to(root, path),
            reason: reason.to_string(),
        }
    }
}

/// Strip `root` from `path`, falling back to the path itself when it lies
/// outside the root.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Render a relative directory path for display, with `./` for the root.
pub fn display_dir(rel: &Path) -> String {
    if rel.as_os_str().is_empty() {
        "./".to_string()
    } else {
        format!("{}/", rel.to_string_lossy().replace('\\', "/"))
    }
}
