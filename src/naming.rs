//! File names and relative hrefs for generated galleries.
//!
//! Every generated page uses the same fixed file name, [`INDEX_FILE_NAME`],
//! so cleanup can find its own artifacts by name alone. All links between
//! pages and to images are relative, which keeps a gallery browsable straight
//! from disk (`file://`) as well as through the server.
//!
//! ## Hrefs
//!
//! Link targets are built from raw file and directory names. Each path
//! segment is percent-encoded on its own so names with spaces, `#`, `?` or
//! non-ASCII characters still resolve, while the `/` separators stay intact:
//! - `a.jpg` → `a.jpg`
//! - `summer 2024/` index → `summer%202024/gallerize.html`
//! - two levels up → `../../gallerize.html`

/// File name of every generated index page.
pub const INDEX_FILE_NAME: &str = "gallerize.html";

/// Optional per-root configuration file.
pub const CONFIG_FILE_NAME: &str = "gallerize.toml";

/// Whether a file name is a generated index page.
pub fn is_index_file(name: &str) -> bool {
    name == INDEX_FILE_NAME
}

/// Percent-encode a single path segment.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Href from a directory's index page to one of its images.
pub fn image_href(file_name: &str) -> String {
    encode_segment(file_name)
}

/// Href from a directory's index page to a child directory's index page.
pub fn subdir_index_href(dir_name: &str) -> String {
    format!("{}/{}", encode_segment(dir_name), INDEX_FILE_NAME)
}

/// Href to the index page `levels_up` directories above the current one.
///
/// `0` points at the page itself.
pub fn ancestor_index_href(levels_up: usize) -> String {
    format!("{}{}", "../".repeat(levels_up), INDEX_FILE_NAME)
}
