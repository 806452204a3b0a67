//! Host configuration module.
//!
//! Handles loading, validating, and merging the `docs-pdf.toml` file. The
//! file carries two tables: `[site]` holds the global site settings shared
//! with the documentation generator, and `[pdf]` holds the plugin-local
//! settings of the PDF exporter.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! strict = false
//! site_name = ""
//! docs_dir = "docs"
//! # site_author = "Jane Doe"
//! # copyright = "&copy; 2026 Jane Doe"
//! # theme_handler_path = "handlers/theme.css"
//!
//! [site.theme]
//! name = "mkdocs"
//! # custom_dir = "overrides"
//!
//! [pdf]
//! verbose = false
//! output_path = "pdf/document.pdf"
//! cover = true
//! custom_template_path = "templates"
//! toc_title = "Table of contents"
//! toc_level = 2
//! render_js = false
//! headless_chrome_path = "chromium-browser"
//! ```
//!
//! Unknown keys are rejected to catch typos early. The file is sparse:
//! override only the values you need and the stock defaults fill the rest.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "docs-pdf.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The merged host document: site-global settings plus the plugin table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Global site settings (`[site]`).
    pub site: SiteSettings,
    /// PDF plugin settings (`[pdf]`).
    pub pdf: PluginConfig,
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pdf.validate()
    }
}

/// Site-wide settings owned by the documentation generator.
///
/// The PDF options only read these; author and copyright act as fallbacks
/// for the plugin-local values, and the theme and docs directory take part
/// in logo lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    pub site_name: String,
    pub theme: ThemeSettings,
    pub docs_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_handler_path: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            strict: false,
            site_author: None,
            copyright: None,
            site_name: String::new(),
            theme: ThemeSettings::default(),
            docs_dir: "docs".to_string(),
            theme_handler_path: None,
        }
    }
}

/// The active documentation theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSettings {
    /// Theme name, e.g. `"material"` or `"readthedocs"`.
    pub name: String,
    /// Directory with the user's theme overrides, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dir: Option<String>,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            name: "mkdocs".to_string(),
            custom_dir: None,
        }
    }
}

/// Plugin-local settings of the PDF exporter (`[pdf]` table).
///
/// All fields have defaults. Optional strings stay `None` until the user
/// sets them; the options resolver decides the fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Only run when this environment variable is set to `1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_if_env: Option<String>,

    pub verbose: bool,
    pub debug_html: bool,
    pub show_anchors: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_handler_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,

    pub cover: bool,
    /// Directory searched first for `cover.html`, `styles.css` and the logo.
    pub custom_template_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_logo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc_title: Option<String>,
    pub heading_shift: bool,
    pub toc_level: i64,
    pub ordered_chapter_level: i64,
    pub excludes_children: Vec<String>,

    pub exclude_pages: Vec<String>,
    pub convert_iframe: Vec<String>,
    pub two_columns_level: i64,

    pub render_js: bool,
    pub headless_chrome_path: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled_if_env: None,
            verbose: false,
            debug_html: false,
            show_anchors: false,
            output_path: Some("pdf/document.pdf".to_string()),
            theme_handler_path: None,
            author: None,
            copyright: None,
            cover: true,
            custom_template_path: "templates".to_string(),
            cover_title: None,
            cover_subtitle: None,
            cover_logo: None,
            toc_title: Some("Table of contents".to_string()),
            heading_shift: true,
            toc_level: 2,
            ordered_chapter_level: 3,
            excludes_children: Vec::new(),
            exclude_pages: Vec::new(),
            convert_iframe: Vec::new(),
            two_columns_level: 0,
            render_js: false,
            headless_chrome_path: "chromium-browser".to_string(),
        }
    }
}

impl PluginConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let levels = [
            ("toc_level", self.toc_level),
            ("ordered_chapter_level", self.ordered_chapter_level),
            ("two_columns_level", self.two_columns_level),
        ];
        for (key, value) in levels {
            if value < 0 {
                return Err(ConfigError::Validation(format!(
                    "pdf.{key} must not be negative (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// Whether the exporter should run, given an environment lookup.
    ///
    /// - no `enabled_if_env` → always enabled
    /// - `enabled_if_env = "NAME"` → enabled only when `NAME` is `"1"`
    pub fn is_enabled<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.enabled_if_env.as_deref() {
            Some(name) if !name.is_empty() => lookup(name).as_deref() == Some("1"),
            _ => true,
        }
    }

    /// [`is_enabled`](Self::is_enabled) against the process environment.
    pub fn is_enabled_in_env(&self) -> bool {
        self.is_enabled(|name| std::env::var(name).ok())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(HostConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<HostConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: HostConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the host config from `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `docs-pdf.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-pdf Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site settings (shared with the documentation generator)
# ---------------------------------------------------------------------------
[site]
# Treat warnings as errors.
strict = false

# Fallback for the cover title when [pdf].cover_title is not set.
site_name = ""

# Documentation sources; searched for the cover logo.
docs_dir = "docs"

# Fallbacks for [pdf].author and [pdf].copyright. HTML is stripped.
# site_author = "Jane Doe"
# copyright = "&copy; 2026 Jane Doe"

# Used when [pdf].theme_handler_path is not set.
# theme_handler_path = "handlers/theme.css"

[site.theme]
name = "mkdocs"
# Theme override directory; searched for the cover logo and templates.
# custom_dir = "overrides"

# ---------------------------------------------------------------------------
# PDF export
# ---------------------------------------------------------------------------
[pdf]
# Only build the PDF when this environment variable is set to 1.
# enabled_if_env = "ENABLE_PDF_EXPORT"

verbose = false
debug_html = false
show_anchors = false

output_path = "pdf/document.pdf"
# theme_handler_path = "handlers/theme.css"

# author = "Jane Doe"
# copyright = "&copy; 2026 Jane Doe"

# Cover page
cover = true
# Searched first for cover.html, styles.css and the cover logo.
custom_template_path = "templates"
# cover_title = "User Guide"
# cover_subtitle = "Version 2"
# Relative to the template dir, theme dir, docs dir or working dir; or a URL.
# cover_logo = "logo.png"

# Table of contents and chapter headings
toc_title = "Table of contents"
heading_shift = true
toc_level = 2
ordered_chapter_level = 3
excludes_children = []

# Pages
exclude_pages = []
convert_iframe = []
two_columns_level = 0

# Run page JavaScript in a headless browser before rendering.
render_js = false
headless_chrome_path = "chromium-browser"
"##
}
