//! Index page generation.
//!
//! Takes the [`Gallery`] plan from [`crate::scan`] and writes one
//! `gallerize.html` into every qualifying directory.
//!
//! ## Page Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Gallery / trips / rome            3 images   │  breadcrumb + count
//! ├──────────────────────────────────────────────┤
//! │ ..                                           │  parent (not on root)
//! │ day-1/                                       │  qualifying subdirs
//! ├──────────────────────────────────────────────┤
//! │ [img] [img] [img]                            │  images_per_row per row
//! │ [img]                                        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every link is relative: images by file name, subdirectories by
//! `<name>/gallerize.html`, ancestors by `../`. Thumbnails are the images
//! themselves, scaled by the browser.
//!
//! ## Determinism
//!
//! Pages depend only on the plan and the config: no timestamps, no absolute
//! paths. Generating twice over an unchanged tree writes identical bytes.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! File and directory names are escaped automatically.

use crate::config::{self, GalleryConfig};
use crate::naming::{self, INDEX_FILE_NAME};
use crate::scan::{self, Gallery, GalleryDir, ScanError};
use crate::types::Skipped;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// What a generate pass wrote and what it had to skip.
#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    pub written: Vec<WrittenIndex>,
    pub skipped: Vec<Skipped>,
}

/// One index file written by [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrittenIndex {
    /// Directory relative to the root; empty for the root.
    pub rel_dir: PathBuf,
    pub images: usize,
    pub subdirs: usize,
}

impl WrittenIndex {
    /// Path of the index file relative to the root.
    pub fn index_path(&self) -> PathBuf {
        self.rel_dir.join(INDEX_FILE_NAME)
    }
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Scan `root` and write an index page into every qualifying directory.
pub fn generate(root: &Path, config: &GalleryConfig) -> Result<GenerateReport, GenerateError> {
    let gallery = scan::scan(root, config)?;
    Ok(write_gallery(&gallery, config))
}

/// Render and write the pages for an already scanned gallery.
///
/// A page that cannot be written is reported and the pass continues.
pub fn write_gallery(gallery: &Gallery, config: &GalleryConfig) -> GenerateReport {
    let css = page_css(config);
    let mut report = GenerateReport {
        written: Vec::with_capacity(gallery.dirs.len()),
        skipped: gallery.skipped.clone(),
    };

    for dir in &gallery.dirs {
        let page = render_index(dir, config, &css);
        let index_path = gallery.root.join(&dir.rel_path).join(INDEX_FILE_NAME);
        // Writing through a symlink would clobber its target, and cleanup
        // never removes links
        if fs::symlink_metadata(&index_path).is_ok_and(|m| m.file_type().is_symlink()) {
            warn!(path = %index_path.display(), "index path is a symlink, not writing");
            report.skipped.push(Skipped::new(
                &gallery.root,
                &index_path,
                "index path is a symlink",
            ));
            continue;
        }
        match fs::write(&index_path, page.into_string()) {
            Ok(()) => {
                debug!(path = %index_path.display(), "wrote index");
                report.written.push(WrittenIndex {
                    rel_dir: dir.rel_path.clone(),
                    images: dir.images.len(),
                    subdirs: dir.subdirs.len(),
                });
            }
            Err(e) => {
                warn!(path = %index_path.display(), error = %e, "could not write index");
                report
                    .skipped
                    .push(Skipped::new(&gallery.root, &index_path, e));
            }
        }
    }

    report
}

/// Full stylesheet: config-driven custom properties, then the static rules.
fn page_css(config: &GalleryConfig) -> String {
    format!(
        "{}\n\n:root {{\n    --images-per-row: {};\n}}\n\n{}",
        config::generate_color_css(&config.colors),
        config.gallery.images_per_row,
        CSS_STATIC
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content="gallerize";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                div.content {
                    (content)
                }
            }
        }
    }
}

/// Breadcrumb from the gallery root down to `dir`; ancestors are links.
fn breadcrumb(dir: &GalleryDir, title: &str) -> Markup {
    let segments = dir.segments();
    let depth = segments.len();

    html! {
        nav.breadcrumb {
            @if depth == 0 {
                span.current { (title) }
            } @else {
                a href=(naming::ancestor_index_href(depth)) { (title) }
                @for (i, segment) in segments.iter().enumerate() {
                    " / "
                    @if i + 1 == depth {
                        span.current { (segment) }
                    } @else {
                        a href=(naming::ancestor_index_href(depth - i - 1)) { (segment) }
                    }
                }
            }
        }
    }
}

/// Parent and subdirectory links. Empty on a root without subdirectories.
fn directory_links(dir: &GalleryDir) -> Markup {
    html! {
        @if !dir.is_root() || !dir.subdirs.is_empty() {
            nav.directories {
                ul {
                    @if !dir.is_root() {
                        li { a href=(naming::ancestor_index_href(1)) { ".." } }
                    }
                    @for subdir in &dir.subdirs {
                        li { a href=(naming::subdir_index_href(subdir)) { (subdir) "/" } }
                    }
                }
            }
            hr;
        }
    }
}

/// Image table, `per_row` thumbnails per row, each linking to the image.
fn image_table(images: &[String], per_row: usize) -> Markup {
    html! {
        @if !images.is_empty() {
            table.images {
                @for row in images.chunks(per_row.max(1)) {
                    tr {
                        @for image in row {
                            @let href = naming::image_href(image);
                            td {
                                a href=(href) {
                                    img.image src=(href) alt=(image) loading="lazy";
                                }
                                span.caption { (image) }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page for one directory.
pub fn render_index(dir: &GalleryDir, config: &GalleryConfig, css: &str) -> Markup {
    let title = &config.gallery.title;
    let page_title = match dir.segments().last() {
        Some(name) => format!("{name} - {title}"),
        None => title.clone(),
    };

    let content = html! {
        h2.header {
            (breadcrumb(dir, title))
            span.count { (image_count_label(dir.images.len())) }
        }
        hr;
        (directory_links(dir))
        (image_table(&dir.images, config.gallery.images_per_row))
    };

    base_document(&page_title, css, content)
}

fn image_count_label(count: usize) -> String {
    match count {
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn dir(rel: &str, images: &[&str], subdirs: &[&str]) -> GalleryDir {
        GalleryDir {
            rel_path: PathBuf::from(rel),
            images: images.iter().map(|s| s.to_string()).collect(),
            subdirs: subdirs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn render(d: &GalleryDir) -> String {
        let config = GalleryConfig::default();
        render_index(d, &config, "").into_string()
    }

    // =========================================================================
    // Renderer
    // =========================================================================

    #[test]
    fn page_includes_doctype_and_title() {
        let html = render(&dir("", &["a.jpg"], &[]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gallery</title>"));
    }

    #[test]
    fn subdirectory_page_title_names_directory() {
        let html = render(&dir("trips/rome", &["a.jpg"], &[]));
        assert!(html.contains("<title>rome - Gallery</title>"));
    }

    #[test]
    fn image_links_and_thumbnails_are_relative() {
        let html = render(&dir("", &["a.jpg"], &[]));
        assert!(html.contains(r#"<a href="a.jpg">"#));
        assert!(html.contains(r#"src="a.jpg""#));
    }

    #[test]
    fn subdirectory_links_point_at_child_index() {
        let html = render(&dir("", &[], &["sub"]));
        assert!(html.contains(r#"href="sub/gallerize.html""#));
    }

    #[test]
    fn root_has_no_parent_link() {
        let html = render(&dir("", &["a.jpg"], &["sub"]));
        assert!(!html.contains(r#"href="../gallerize.html""#));
        assert!(!html.contains(">..<"));
    }

    #[test]
    fn nested_page_links_to_parent() {
        let html = render(&dir("sub", &["b.png"], &[]));
        assert!(html.contains(r#"<a href="../gallerize.html">..</a>"#));
    }

    #[test]
    fn breadcrumb_links_each_ancestor() {
        let html = render(&dir("a/b/c", &["x.jpg"], &[]));
        assert!(html.contains(r#"<a href="../../../gallerize.html">Gallery</a>"#));
        assert!(html.contains(r#"<a href="../../gallerize.html">a</a>"#));
        assert!(html.contains(r#"<a href="../gallerize.html">b</a>"#));
        assert!(html.contains(r#"<span class="current">c</span>"#));
    }

    #[test]
    fn image_count_shown() {
        assert!(render(&dir("", &["a.jpg"], &[])).contains("1 image<"));
        assert!(render(&dir("", &["a.jpg", "b.jpg"], &[])).contains("2 images<"));
        assert!(render(&dir("", &[], &["s"])).contains("0 images<"));
    }

    #[test]
    fn rows_hold_images_per_row() {
        let images = ["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg", "6.jpg", "7.jpg"];
        let html = render(&dir("", &images, &[]));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("<td>").count(), 7);

        let mut config = GalleryConfig::default();
        config.gallery.images_per_row = 7;
        let html = render_index(&dir("", &images, &[]), &config, "").into_string();
        assert_eq!(html.matches("<tr>").count(), 1);
    }

    #[test]
    fn no_table_without_images() {
        let html = render(&dir("", &[], &["sub"]));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn names_are_escaped_and_hrefs_encoded() {
        let html = render(&dir("", &["<b>&x.jpg"], &["my dir"]));
        assert!(html.contains("&lt;b&gt;&amp;x.jpg"));
        assert!(!html.contains("<b>&x"));
        assert!(html.contains(r#"href="%3Cb%3E%26x.jpg""#));
        assert!(html.contains(r#"href="my%20dir/gallerize.html""#));
    }

    #[test]
    fn custom_title_used() {
        let mut config = GalleryConfig::default();
        config.gallery.title = "Holidays".to_string();
        let html = render_index(&dir("", &["a.jpg"], &[]), &config, "").into_string();
        assert!(html.contains("<title>Holidays</title>"));
    }

    #[test]
    fn css_carries_colors_and_row_width() {
        let mut config = GalleryConfig::default();
        config.gallery.images_per_row = 4;
        config.colors.light.background = "#fafafa".to_string();
        let css = page_css(&config);
        assert!(css.contains("--images-per-row: 4;"));
        assert!(css.contains("--color-bg: #fafafa"));
        assert!(css.contains(".images td"));
    }

    // =========================================================================
    // Generate pass
    // =========================================================================

    #[test]
    fn generate_writes_root_and_sub_index() {
        let tmp = make_tree(&["a.jpg", "sub/b.png"]);
        let report = generate(tmp.path(), &GalleryConfig::default()).unwrap();

        assert_eq!(
            index_files(tmp.path()),
            vec!["gallerize.html", "sub/gallerize.html"]
        );
        assert_eq!(report.written.len(), 2);
        assert!(report.skipped.is_empty());

        let root = read_index(tmp.path(), "");
        assert!(root.contains(r#"href="a.jpg""#));
        assert!(root.contains(r#"href="sub/gallerize.html""#));

        let sub = read_index(tmp.path(), "sub");
        assert!(sub.contains(r#"href="b.png""#));
        assert!(sub.contains(r#"href="../gallerize.html""#));
    }

    #[test]
    fn generate_report_lists_counts() {
        let tmp = make_tree(&["a.jpg", "b.jpg", "sub/c.png"]);
        let report = generate(tmp.path(), &GalleryConfig::default()).unwrap();
        assert_eq!(
            report.written[0],
            WrittenIndex {
                rel_dir: PathBuf::new(),
                images: 2,
                subdirs: 1,
            }
        );
        assert_eq!(
            report.written[1].index_path(),
            PathBuf::from("sub/gallerize.html")
        );
    }

    #[test]
    fn generate_skips_directories_without_images() {
        let tmp = make_tree(&["a.jpg", "docs/readme.txt", "empty/"]);
        generate(tmp.path(), &GalleryConfig::default()).unwrap();

        assert_eq!(index_files(tmp.path()), vec!["gallerize.html"]);
        assert!(!read_index(tmp.path(), "").contains("docs"));
    }

    #[test]
    fn generate_nothing_for_imageless_tree() {
        let tmp = make_tree(&["notes.txt", "docs/a.pdf"]);
        let report = generate(tmp.path(), &GalleryConfig::default()).unwrap();
        assert!(report.written.is_empty());
        assert!(index_files(tmp.path()).is_empty());
    }

    #[test]
    fn generate_twice_is_byte_identical() {
        let tmp = make_tree(&["b.jpg", "a.jpg", "x/y/z.gif", "x/w.png", "m n/o.bmp"]);
        let config = GalleryConfig::default();

        generate(tmp.path(), &config).unwrap();
        let first = snapshot(tmp.path());
        generate(tmp.path(), &config).unwrap();
        let second = snapshot(tmp.path());

        assert_eq!(first, second);
    }

    #[test]
    fn generate_overwrites_existing_index() {
        let tmp = make_tree(&["a.jpg", "gallerize.html"]);
        generate(tmp.path(), &GalleryConfig::default()).unwrap();
        assert!(read_index(tmp.path(), "").starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn generate_invalid_root_is_error() {
        let tmp = make_tree(&[]);
        let result = generate(&tmp.path().join("missing"), &GalleryConfig::default());
        assert!(matches!(
            result,
            Err(GenerateError::Scan(ScanError::NotADirectory(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_directory_reported_and_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = make_tree(&["a.jpg", "ro/b.jpg"]);
        let ro = tmp.path().join("ro");
        fs::set_permissions(&ro, fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores permission bits; nothing to assert there
        if fs::write(ro.join("probe"), b"").is_ok() {
            fs::remove_file(ro.join("probe")).unwrap();
            fs::set_permissions(&ro, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = generate(tmp.path(), &GalleryConfig::default()).unwrap();
        fs::set_permissions(&ro, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, PathBuf::from("ro/gallerize.html"));
        assert_eq!(index_files(tmp.path()), vec!["gallerize.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_index_is_not_written_through() {
        let tmp = make_tree(&["outside.txt", "real/b.jpg"]);
        std::os::unix::fs::symlink(
            tmp.path().join("outside.txt"),
            tmp.path().join("real/gallerize.html"),
        )
        .unwrap();
        let before = snapshot(tmp.path());

        let report = generate(tmp.path(), &GalleryConfig::default()).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("outside.txt")).unwrap(),
            "outside.txt"
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, PathBuf::from("real/gallerize.html"));
        assert_eq!(report.written.len(), 1);

        crate::cleanup::cleanup(tmp.path()).unwrap();
        assert_eq!(snapshot(tmp.path()), before);
    }
}
