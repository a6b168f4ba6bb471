//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the config directory overrides any
//! subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! url = "https://forkify-api.herokuapp.com/api/v2/recipes"
//! key = ""                  # Developer key, required for uploads
//! timeout_secs = 10         # Per-request timeout
//!
//! [search]
//! results_per_page = 10
//!
//! [storage]
//! dir = ".recipe-lookup"    # Where bookmarks are persisted
//! bookmarks_key = "bookmarks"
//!
//! [ui]
//! icons = "img/icons.svg"   # Icon sprite referenced by rendered markup
//! modal_close_ms = 2500     # Delay before the upload window closes
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
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

/// Application configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Remote recipe API endpoint and credentials.
    pub api: ApiConfig,
    /// Search result pagination.
    pub search: SearchConfig,
    /// Bookmark persistence.
    pub storage: StorageConfig,
    /// Rendering details.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api.url.starts_with("http://") || self.api.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "api.url must be an http(s) URL".into(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be non-zero".into(),
            ));
        }
        if self.search.results_per_page == 0 {
            return Err(ConfigError::Validation(
                "search.results_per_page must be non-zero".into(),
            ));
        }
        if self.storage.bookmarks_key.is_empty() {
            return Err(ConfigError::Validation(
                "storage.bookmarks_key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the recipes collection (no trailing slash).
    pub url: String,
    /// Developer key sent with searches and uploads.
    pub key: String,
    /// Seconds before a request is abandoned.
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://forkify-api.herokuapp.com/api/v2/recipes".to_string(),
            key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub results_per_page: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_per_page: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one `<key>.json` file per stored key.
    pub dir: PathBuf,
    /// Key under which the bookmark array is stored.
    pub bookmarks_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".recipe-lookup"),
            bookmarks_key: "bookmarks".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Path or URL of the SVG icon sprite.
    pub icons: String,
    /// Milliseconds the upload window stays open after a successful upload.
    pub modal_close_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            icons: "img/icons.svg".to_string(),
            modal_close_ms: 2500,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# recipe-lookup configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Remote recipe API
# ---------------------------------------------------------------------------
[api]
# Base URL of the recipes collection, without a trailing slash.
url = "https://forkify-api.herokuapp.com/api/v2/recipes"

# Developer key. Searches send it along; uploads need it to succeed.
key = ""

# Seconds before a request is abandoned.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
results_per_page = 10

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Directory for persisted data (one <key>.json per key).
dir = ".recipe-lookup"

# Key holding the bookmark array.
bookmarks_key = "bookmarks"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[ui]
# Icon sprite referenced from rendered markup (<use href="...#icon-name">).
icons = "img/icons.svg"

# Milliseconds the upload window stays open after a successful upload.
modal_close_ms = 2500
"##
}
