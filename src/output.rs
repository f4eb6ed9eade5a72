//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Diagnostics (skipped
//! directories as they happen, server lifecycle) go through `tracing` on
//! stderr instead; the reports here are the summary a user reads.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Galleries
//! 001 . (2 images)
//!     Source: ./
//!     001 trips (0 images)
//!         Source: trips/
//!         001 rome (3 images)
//!             Source: trips/rome/
//!
//! Skipped
//!     locked: Permission denied (os error 13)
//!
//! 3 index pages, 5 images
//! ```
//!
//! ## Generate
//!
//! ```text
//! ./ → gallerize.html (2 images, 1 directory)
//! trips/ → trips/gallerize.html (0 images, 1 directory)
//! trips/rome/ → trips/rome/gallerize.html (3 images)
//!
//! Generated 3 index pages
//! ```
//!
//! ## Cleanup
//!
//! ```text
//! Removed gallerize.html
//! Removed trips/gallerize.html
//!
//! Removed 2 index pages
//! ```

use crate::cleanup::CleanupReport;
use crate::generate::GenerateReport;
use crate::scan::Gallery;
use crate::types::{Skipped, display_dir};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 image`, `2 images`, `0 images`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("1 {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Format a directory header: positional index, name and image count.
///
/// ```text
/// 001 rome (3 images)
/// ```
fn entity_header(index: usize, name: &str, images: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        name,
        count(images, "image", "images")
    )
}

fn display_file(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

/// "Skipped" section, empty when nothing was skipped.
fn skipped_section(skipped: &[Skipped]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    for s in skipped {
        let path = if s.path.as_os_str().is_empty() {
            ".".to_string()
        } else {
            display_file(&s.path)
        };
        lines.push(format!("    {}: {}", path, s.reason));
    }
    lines
}

// ============================================================================
// Scan
// ============================================================================

/// Format the gallery plan as an indented tree.
///
/// Each directory is numbered by its position among its siblings.
pub fn format_scan_output(gallery: &Gallery) -> Vec<String> {
    let mut lines = vec!["Galleries".to_string()];
    // Sibling counters per depth; pre-order means a shallower entry resets
    // everything below it.
    let mut positions: Vec<usize> = Vec::new();

    for dir in &gallery.dirs {
        let depth = dir.depth();
        positions.truncate(depth + 1);
        positions.resize(depth + 1, 0);
        positions[depth] += 1;

        let name = dir.segments().pop().unwrap_or_else(|| ".".to_string());
        lines.push(format!(
            "{}{}",
            indent(depth),
            entity_header(positions[depth], &name, dir.images.len())
        ));
        lines.push(format!(
            "{}    Source: {}",
            indent(depth),
            display_dir(&dir.rel_path)
        ));
    }

    if gallery.dirs.is_empty() {
        lines.push("    (no images found)".to_string());
    }

    lines.extend(skipped_section(&gallery.skipped));

    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        count(gallery.dirs.len(), "index page", "index pages"),
        count(gallery.image_count(), "image", "images")
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(gallery: &Gallery) {
    for line in format_scan_output(gallery) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the pages a generate pass wrote.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for written in &report.written {
        let mut detail = count(written.images, "image", "images");
        if written.subdirs > 0 {
            detail.push_str(", ");
            detail.push_str(&count(written.subdirs, "directory", "directories"));
        }
        lines.push(format!(
            "{} → {} ({})",
            display_dir(&written.rel_dir),
            display_file(&written.index_path()),
            detail
        ));
    }

    lines.extend(skipped_section(&report.skipped));

    lines.push(String::new());
    if report.written.is_empty() {
        lines.push("No images found, nothing generated".to_string());
    } else {
        lines.push(format!(
            "Generated {}",
            count(report.written.len(), "index page", "index pages")
        ));
    }
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Cleanup
// ============================================================================

/// Format the pages a cleanup pass removed.
pub fn format_cleanup_output(report: &CleanupReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .removed
        .iter()
        .map(|p| format!("Removed {}", display_file(p)))
        .collect();

    lines.extend(skipped_section(&report.skipped));

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Removed {}",
        count(report.removed.len(), "index page", "index pages")
    ));
    lines
}

/// Print cleanup output to stdout.
pub fn print_cleanup_output(report: &CleanupReport) {
    for line in format_cleanup_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Serve
// ============================================================================

/// Banner shown once the server is listening.
pub fn format_serve_banner(url: &str) -> Vec<String> {
    vec![
        format!("Your images are at {}", url),
        "Press Ctrl-C to stop".to_string(),
    ]
}

/// Print the serve banner to stdout.
pub fn print_serve_banner(url: &str) {
    for line in format_serve_banner(url) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
