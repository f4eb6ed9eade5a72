//! Directory walking and gallery planning.
//!
//! Walks a directory tree and works out which directories get an index page,
//! producing a [`Gallery`] plan that [`crate::generate`] renders. Nothing is
//! written here.
//!
//! ## Which directories qualify
//!
//! ```text
//! photos/                 # qualifies: has a.jpg
//! ├── a.jpg
//! ├── notes.txt           # ignored, not an image
//! ├── trips/              # qualifies: has a qualifying child
//! │   ├── docs/           # skipped, no images anywhere below
//! │   │   └── plan.pdf
//! │   └── rome/           # qualifies: has b.png
//! │       └── b.png
//! └── .cache/             # hidden, not walked unless include_hidden
//!     └── c.jpg
//! ```
//!
//! - A directory qualifies when it holds at least one image, or at least one
//!   qualifying subdirectory.
//! - Images and subdirectories are ordered by name, so the same tree always
//!   produces the same plan.
//! - Symlinked directories are not followed; a symlink to an image file is
//!   listed like the file itself.
//!
//! ## Errors
//!
//! Only a bad root is fatal. A subdirectory that cannot be read is recorded
//! in [`Gallery::skipped`] and treated as empty.

use crate::config::GalleryConfig;
use crate::types::{Skipped, relative_to};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Plan for one generate pass.
#[derive(Debug, Serialize)]
pub struct Gallery {
    pub root: PathBuf,
    /// Qualifying directories in pre-order, parents before children.
    pub dirs: Vec<GalleryDir>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Skipped>,
}

/// A directory that gets an index page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryDir {
    /// Path relative to the gallery root; empty for the root itself.
    pub rel_path: PathBuf,
    /// Image file names, sorted.
    pub images: Vec<String>,
    /// Names of qualifying subdirectories, sorted.
    pub subdirs: Vec<String>,
}

impl GalleryDir {
    pub fn is_root(&self) -> bool {
        self.rel_path.as_os_str().is_empty()
    }

    /// Number of path components below the root.
    pub fn depth(&self) -> usize {
        self.rel_path.components().count()
    }

    /// Directory names from the root down to this directory.
    pub fn segments(&self) -> Vec<String> {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect()
    }
}

impl Gallery {
    /// Total number of images across all directories.
    pub fn image_count(&self) -> usize {
        self.dirs.iter().map(|d| d.images.len()).sum()
    }

    pub fn find(&self, rel_path: &Path) -> Option<&GalleryDir> {
        self.dirs.iter().find(|d| d.rel_path == rel_path)
    }
}

/// Scan `root` and plan which directories get index pages.
pub fn scan(root: &Path, config: &GalleryConfig) -> Result<Gallery, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    // The root must be listable; anything deeper is best-effort
    fs::read_dir(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut skipped = Vec::new();
    let dirs = scan_directory(root, root, config, &mut skipped).unwrap_or_default();

    Ok(Gallery {
        root: root.to_path_buf(),
        dirs,
        skipped,
    })
}

/// Scan one directory and its descendants.
///
/// Returns the qualifying subtree in pre-order (this directory first), or
/// `None` if nothing below here has images.
fn scan_directory(
    path: &Path,
    root: &Path,
    config: &GalleryConfig,
    skipped: &mut Vec<Skipped>,
) -> Option<Vec<GalleryDir>> {
    let entries = match collect_entries(path, root, config, skipped) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %path.display(), error = %e, "skipping unreadable directory");
            skipped.push(Skipped::new(root, path, e));
            return None;
        }
    };

    let mut subdirs = Vec::new();
    let mut descendants = Vec::new();
    for name in &entries.subdirs {
        if let Some(subtree) = scan_directory(&path.join(name), root, config, skipped) {
            subdirs.push(name.clone());
            descendants.extend(subtree);
        }
    }

    if entries.images.is_empty() && subdirs.is_empty() {
        return None;
    }

    let mut tree = Vec::with_capacity(descendants.len() + 1);
    tree.push(GalleryDir {
        rel_path: relative_to(root, path),
        images: entries.images,
        subdirs,
    });
    tree.extend(descendants);
    Some(tree)
}

/// Directory entries split into images and subdirectories, both sorted.
#[derive(Debug, Default)]
struct Entries {
    images: Vec<String>,
    subdirs: Vec<String>,
}

fn collect_entries(
    path: &Path,
    root: &Path,
    config: &GalleryConfig,
    skipped: &mut Vec<Skipped>,
) -> std::io::Result<Entries> {
    let mut entries = Entries::default();

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %path.display(), error = %e, "skipping unreadable entry");
                skipped.push(Skipped::new(root, path, e));
                continue;
            }
        };
        let entry_path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %entry_path.display(), "skipping non-UTF-8 file name");
            skipped.push(Skipped::new(root, &entry_path, "file name is not valid UTF-8"));
            continue;
        };
        if !config.gallery.include_hidden && is_hidden(&name) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(path = %entry_path.display(), error = %e, "skipping entry");
                skipped.push(Skipped::new(root, &entry_path, e));
                continue;
            }
        };

        if file_type.is_dir() {
            entries.subdirs.push(name);
        } else if entry_path.is_file() && is_image(&name, &config.gallery.extensions) {
            entries.images.push(name);
        }
    }

    entries.images.sort();
    entries.subdirs.sort();
    Ok(entries)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Whether a file name has a non-empty stem and one of the image extensions.
///
/// `extensions` are expected lowercase; the file's extension is compared
/// case-insensitively.
pub fn is_image(name: &str, extensions: &[String]) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty() && extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}
