//! Gallery configuration.
//!
//! Handles loading, validating, and merging the optional `gallerize.toml` in
//! the gallery root. Stock defaults are serialized to a TOML table and the
//! user's file is merged on top, so a config file only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! title = "Gallery"         # Heading of the root page
//! images_per_row = 3        # Thumbnails per table row
//! extensions = ["png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp", "webp"]
//! include_hidden = false    # Walk into dot-directories and list dot-files
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 8000
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"    # Header, breadcrumb, counts
//! border = "#e0e0e0"
//! link = "#333333"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::CONFIG_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `gallerize.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// What gets listed and how pages are laid out.
    pub gallery: GallerySettings,
    /// Where the built-in server listens.
    pub server: ServerConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.images_per_row == 0 {
            return Err(ConfigError::Validation(
                "gallery.images_per_row must be at least 1".into(),
            ));
        }
        if self.gallery.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .gallery
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(ConfigError::Validation(format!(
                "gallery.extensions entries must be bare extensions like \"jpg\", got {bad:?}"
            )));
        }
        if self.server.bind.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind must be an IP address, got {:?}",
                self.server.bind
            )));
        }
        Ok(())
    }

    /// Lowercase all extensions so matching can compare directly.
    fn normalize(mut self) -> Self {
        for ext in &mut self.gallery.extensions {
            *ext = ext.to_ascii_lowercase();
        }
        self
    }
}

/// Listing and layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySettings {
    /// Heading of the root page and first breadcrumb entry.
    pub title: String,
    /// Number of thumbnails per table row.
    pub images_per_row: usize,
    /// File extensions (without the dot) treated as images.
    pub extensions: Vec<String>,
    /// Walk into hidden directories and list hidden files.
    pub include_hidden: bool,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            images_per_row: 3,
            extensions: ["png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            include_hidden: false,
        }
    }
}

/// Built-in HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// The bind address. Only valid after [`GalleryConfig::validate`].
    pub fn ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind.parse().map_err(|_| {
            ConfigError::Validation(format!("server.bind must be an IP address: {}", self.bind))
        })
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Used for the header, breadcrumb and image counts.
    pub text_muted: String,
    pub border: String,
    pub link: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallerize.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize,
/// validate and normalize.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config.normalize())
}

/// Load the config for a gallery root, using defaults when no file exists.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `gallerize.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gallerize configuration
# =======================
# Place this file as gallerize.toml in the directory you run gallerize on.
# All settings are optional; values shown are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Gallery listing and layout
# ---------------------------------------------------------------------------
[gallery]
# Heading of the root page and first breadcrumb entry.
title = "Gallery"

# Thumbnails per table row.
images_per_row = 3

# File extensions treated as images (case-insensitive, no leading dot).
extensions = ["png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp", "webp"]

# Walk into hidden (dot) directories and list hidden files.
include_hidden = false

# ---------------------------------------------------------------------------
# Built-in server
# ---------------------------------------------------------------------------
[server]
# Address to listen on. Use "0.0.0.0" to expose on the local network.
bind = "127.0.0.1"

# Port; a port given on the command line wins.
port = 8000

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Header, breadcrumb, counts
border = "#e0e0e0"
link = "#333333"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
    )
}
