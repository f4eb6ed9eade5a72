//! # gallerize
//!
//! Turns a directory of images into a set of static HTML gallery pages, one
//! per directory, and optionally serves them on localhost. Point it at a
//! folder of photos, run it, open the URL it prints.
//!
//! # Passes
//!
//! Every command is a single synchronous pass over the filesystem:
//!
//! | Command    | Module       | Effect                                          |
//! |------------|--------------|-------------------------------------------------|
//! | `scan`     | [`scan`]     | Plan which directories get a page; writes nothing |
//! | `generate` | [`generate`] | Write `gallerize.html` into every planned directory |
//! | `cleanup`  | [`cleanup`]  | Delete every `gallerize.html` under the root     |
//! | `serve`    | [`serve`]    | Serve the tree over HTTP until Ctrl-C            |
//!
//! Running `gallerize` with no command (or just a port) chains them the way a
//! quick look at a folder wants: generate, serve, and clean up on exit, so the
//! folder is left exactly as it was found.
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Only State
//!
//! Nothing is cached or recorded between runs. Generated pages carry a fixed
//! file name ([`naming::INDEX_FILE_NAME`]), which is all cleanup needs to find
//! them again. Generating twice is safe; cleaning up twice is safe.
//!
//! ## Relative Links Only
//!
//! Pages link to images, subdirectories and parents by relative, percent-encoded
//! paths. The same files work over `file://`, through the built-in server, or
//! copied to any static host.
//!
//! ## Deterministic Output
//!
//! Images and directories are sorted by name and pages contain no timestamps,
//! so an unchanged tree always yields byte-identical pages.
//!
//! ## Best-Effort Walks
//!
//! A bad root is fatal. Below the root, a directory that cannot be read or a
//! page that cannot be written or deleted is logged, listed in the command's
//! report, and skipped.

pub mod cleanup;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod serve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
