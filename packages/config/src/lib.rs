#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runtime settings for staging and querying.
//!
//! Settings come from an optional TOML file, then environment overrides.
//! Every field has a default, so an empty or absent file is valid.

pub mod paths;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding [`Settings::data_dir`].
pub const DATA_DIR_ENV: &str = "AROUND_ME_DATA_DIR";

/// Environment variable overriding [`Settings::city_prefix`].
pub const CITY_PREFIX_ENV: &str = "AROUND_ME_CITY_PREFIX";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`].
    #[error("Invalid settings file {path}: {source}")]
    Toml {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_city_prefix() -> String {
    "75".to_string()
}
const fn default_radius_km() -> f64 {
    1.0
}
const fn default_max_candidates() -> usize {
    3
}
const fn default_cutoff() -> f64 {
    0.6
}
fn default_target_language() -> String {
    "en".to_string()
}

/// Staging and query settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory holding raw and staged files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Postal/INSEE prefix of the target city.
    #[serde(default = "default_city_prefix")]
    pub city_prefix: String,
    /// Default search radius in kilometers.
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    /// Maximum number of fuzzy candidates offered for disambiguation.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Minimum similarity ratio for a fuzzy candidate.
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Language street descriptions are translated into.
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            city_prefix: default_city_prefix(),
            radius_km: default_radius_km(),
            max_candidates: default_max_candidates(),
            cutoff: default_cutoff(),
            target_language: default_target_language(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from [`paths::DEFAULT_CONFIG_FILE`]
    /// in the working directory if it exists, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit or discovered file cannot be
    /// read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let discovered = PathBuf::from(paths::DEFAULT_CONFIG_FILE);
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None if discovered.exists() => Some(discovered),
            None => None,
        };

        let mut settings = match file {
            Some(file) => {
                log::debug!("Loading settings from {}", file.display());
                Self::from_file(&file)?
            }
            None => Self::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O or TOML errors.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from a variable lookup (the process environment
    /// in [`Self::load`]). Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(CITY_PREFIX_ENV).filter(|v| !v.is_empty()) {
            self.city_prefix = prefix;
        }
    }
}
