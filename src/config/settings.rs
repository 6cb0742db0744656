//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory. Every
//! field has a default, so a partial or missing file is fine.

use crate::config::parse_utc_offset;
use crate::error::{ConfigError, ConfigResult};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub(crate) struct Paths {
    /// Configuration directory (~/.config/bannerscan)
    config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created on disk.
    pub(crate) fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "bannerscan", "bannerscan")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub(crate) fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings. Command-line flags override these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Connect timeout per port in milliseconds.
    pub timeout_ms: u64,
    /// Banner connect/read timeout in milliseconds.
    pub banner_timeout_ms: u64,
    /// Worker pool size.
    pub concurrency: usize,
    /// Grab banners from open ports.
    pub grab_banners: bool,
    /// Convert `Date:` banner headers to `reference_offset`.
    pub convert_dates: bool,
    /// UTC offset used for date conversion, e.g. "-03:00".
    pub reference_offset: String,
    /// Directory for exported result files.
    pub output_dir: PathBuf,
    /// Ask whether to save results when no export flag was given.
    pub prompt_export: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 500,
            banner_timeout_ms: 2000,
            concurrency: 50,
            grab_banners: true,
            convert_dates: true,
            reference_offset: "-03:00".to_string(),
            output_dir: PathBuf::from("scans"),
            prompt_export: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no file.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.reference_offset()?;

        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    /// Parsed form of `reference_offset`.
    pub fn reference_offset(&self) -> ConfigResult<FixedOffset> {
        parse_utc_offset(&self.reference_offset)
    }
}
