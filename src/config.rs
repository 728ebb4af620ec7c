//! Application configuration.
//!
//! Configuration is chosen once at startup and never changes afterwards. It
//! is built in three steps:
//!
//! 1. A named [`Profile`] supplies the preset (`development` or
//!    `production`). The name comes from `--profile` or the
//!    `ANNOTATE_GALLERY_ENV` environment variable; unknown names fall back to
//!    `development`.
//! 2. An optional TOML file is merged on top of the preset, key by key.
//! 3. The merged result is deserialized and validated.
//!
//! The resulting [`AppConfig`] is passed explicitly to everything that needs
//! it. There is no global lookup.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - development defaults shown below
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! debug = true               # production: false
//!
//! [thumbnail]
//! size = 150                 # Longer edge of generated thumbnails (px)
//! quality = 85               # JPEG quality (1-100)
//!
//! [cache]
//! max_age = 3600             # Cache-Control max-age in seconds (production: 7200)
//!
//! [files]
//! extensions = [".jpg", ".jpeg", ".png", ".gif", ".bmp"]
//! encoding = "utf-8"         # Only utf-8 is supported
//! decode_errors = "replace"  # "replace" or "strict"
//!
//! [storage]
//! starred_file = "starred_images.json"
//!
//! [logging]
//! dir = "logs"
//! file = "app.log"
//! max_files = 10
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, ThumbnailConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the active profile.
pub const PROFILE_ENV: &str = "ANNOTATE_GALLERY_ENV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Named configuration preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    /// Resolve a profile name. Anything unrecognised, including `default`,
    /// selects [`Profile::Development`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" => Profile::Production,
            _ => Profile::Development,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }

    /// The preset values for this profile.
    pub fn defaults(self) -> AppConfig {
        let base = AppConfig::default();
        match self {
            Profile::Development => AppConfig {
                server: ServerConfig {
                    debug: true,
                    ..base.server
                },
                ..base
            },
            Profile::Production => AppConfig {
                cache: CacheConfig { max_age: 7200 },
                ..base
            },
        }
    }
}

/// Complete application configuration.
///
/// `Default` is the shared base both profiles start from; use
/// [`Profile::defaults`] to get an actual preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP bind address and debug flag.
    pub server: ServerConfig,
    /// Thumbnail size and JPEG quality.
    pub thumbnail: ThumbnailSettings,
    /// HTTP caching for image and thumbnail responses.
    pub cache: CacheConfig,
    /// Which files count as images and how sidecars are decoded.
    pub files: FilesConfig,
    /// Where the starred list lives.
    pub storage: StorageConfig,
    /// Log file placement and retention.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnail.size must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnail.quality) {
            return Err(ConfigError::Validation(
                "thumbnail.quality must be 1-100".into(),
            ));
        }
        if self.files.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "files.extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self.files.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::Validation(format!(
                "files.extensions entries must start with '.': {bad:?}"
            )));
        }
        let encoding = self.files.encoding.to_ascii_lowercase();
        if encoding != "utf-8" && encoding != "utf8" {
            return Err(ConfigError::Validation(format!(
                "files.encoding {:?} is not supported (only utf-8)",
                self.files.encoding
            )));
        }
        if self.logging.file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.file must not be empty".into(),
            ));
        }
        if self.logging.max_files == 0 {
            return Err(ConfigError::Validation(
                "logging.max_files must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Thumbnail parameters in the form the imaging layer takes.
    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            size: self.thumbnail.size,
            quality: Quality::new(self.thumbnail.quality),
        }
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Enables debug-level logging.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailSettings {
    /// Longer edge of a generated thumbnail, in pixels.
    pub size: u32,
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            size: 150,
            quality: 85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// `Cache-Control: max-age` in seconds.
    pub max_age: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_age: 3600 }
    }
}

/// What to do with sidecar bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrors {
    /// Substitute U+FFFD for each invalid sequence.
    #[default]
    Replace,
    /// Fail the read.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Image extensions, with the leading dot. Compared case-insensitively.
    pub extensions: Vec<String>,
    pub encoding: String,
    pub decode_errors: DecodeErrors,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: [".jpg", ".jpeg", ".png", ".gif", ".bmp"]
                .into_iter()
                .map(String::from)
                .collect(),
            encoding: "utf-8".to_string(),
            decode_errors: DecodeErrors::Replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON array of starred images. Relative paths resolve against the
    /// working directory.
    pub starred_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            starred_file: PathBuf::from("starred_images.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    /// Log file name; rotated files insert the date before the extension.
    pub file: String,
    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file: "app.log".to_string(),
            max_files: 10,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

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

/// Merge an optional overlay onto a profile preset, then deserialize and
/// validate.
pub fn resolve_config(
    profile: Profile,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let base = toml::Value::try_from(profile.defaults())
        .map_err(|e| ConfigError::Validation(format!("preset does not serialize: {e}")))?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration for `profile`, applying the TOML file at
/// `overlay_path` when given.
pub fn load_config(profile: Profile, overlay_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let overlay = match overlay_path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(profile, overlay)
}

/// Returns a fully-commented stock overlay file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# annotate-gallery configuration overlay
# ======================================
#
# Pass with --config <file>. Values here override the active profile
# (development or production). Every key is optional; delete what you
# don't need.

[server]
# Address to bind. 0.0.0.0 accepts connections from other machines.
host = "0.0.0.0"
port = 5000
# Verbose logging. development: true, production: false.
debug = true

[thumbnail]
# Longer edge of generated thumbnails, in pixels.
size = 150
# JPEG quality, 1-100.
quality = 85

[cache]
# Cache-Control max-age for /image and /thumbnail responses, in seconds.
# development: 3600, production: 7200.
max_age = 3600

[files]
# Files with these extensions are treated as images (case-insensitive).
extensions = [".jpg", ".jpeg", ".png", ".gif", ".bmp"]
# Sidecar text encoding. Only utf-8 is supported.
encoding = "utf-8"
# "replace" substitutes U+FFFD for undecodable bytes; "strict" fails the read.
decode_errors = "replace"

[storage]
# JSON array of starred images.
starred_file = "starred_images.json"

[logging]
dir = "logs"
file = "app.log"
# Rotated log files kept on disk.
max_files = 10
"##
}
