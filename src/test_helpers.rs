//! Shared test utilities for the gallerize test suite.
//!
//! Builds throwaway directory trees and inspects what a pass left behind.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = make_tree(&["a.jpg", "sub/b.png", "empty/"]);
//! let gallery = scan(tmp.path(), &GalleryConfig::default()).unwrap();
//! assert_eq!(dir_paths(&gallery), vec!["", "sub"]);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::naming::INDEX_FILE_NAME;
use crate::scan::{Gallery, GalleryDir};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory populated with the given relative paths.
///
/// Paths ending in `/` become empty directories; everything else becomes a
/// small file whose content is its own path, so copies are distinguishable.
pub fn make_tree(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    add_to_tree(tmp.path(), paths);
    tmp
}

/// Add more paths to an existing tree, same rules as [`make_tree`].
pub fn add_to_tree(root: &Path, paths: &[&str]) {
    for rel in paths {
        let full = root.join(rel);
        if rel.ends_with('/') {
            std::fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&full, rel.as_bytes()).unwrap();
        }
    }
}

// =========================================================================
// Tree snapshots
// =========================================================================

/// Every file and directory under `root` mapped to its content (empty for
/// directories). Paths use `/` and are relative to the root.
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = if e.file_type().is_file() {
                std::fs::read(e.path()).unwrap()
            } else {
                Vec::new()
            };
            (rel, content)
        })
        .collect()
}

/// Relative paths of every generated index file under `root`, sorted.
pub fn index_files(root: &Path) -> Vec<String> {
    snapshot(root)
        .into_keys()
        .filter(|p| p.rsplit('/').next() == Some(INDEX_FILE_NAME))
        .collect()
}

/// Read the index page generated for a relative directory (`""` for root).
pub fn read_index(root: &Path, rel_dir: &str) -> String {
    let path = root.join(rel_dir).join(INDEX_FILE_NAME);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("no index at {}: {e}", path.display()))
}

// =========================================================================
// Gallery lookups — panic with a clear message on miss
// =========================================================================

/// Relative paths of the planned directories, in plan order.
pub fn dir_paths(gallery: &Gallery) -> Vec<String> {
    gallery
        .dirs
        .iter()
        .map(|d| d.rel_path.to_string_lossy().replace('\\', "/"))
        .collect()
}

/// Find a planned directory by relative path. Panics if not found.
pub fn find_dir<'a>(gallery: &'a Gallery, rel: &str) -> &'a GalleryDir {
    gallery.find(Path::new(rel)).unwrap_or_else(|| {
        let paths = dir_paths(gallery);
        panic!("directory '{rel}' not in plan. Available: {paths:?}")
    })
}
