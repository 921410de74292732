//! Optional defaults for the command-line tool.
//!
//! Stored in `~/.netstego/config.toml`, or any path passed with `--config`:
//!
//! ```toml
//! seed = 42
//! max_retries = 20
//! directed = false
//! format = "csv"
//! ```
//!
//! Command-line flags always override these values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::io::EdgeFormat;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Defaults read from the configuration file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Seed used when `--seed` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// BYNIS collision probes per edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,

    /// Treat edge lists as directed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,

    /// Edge-list file format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<EdgeFormat>,
}

impl Settings {
    /// Loads the settings file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the settings from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads `path` when given, the default location otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Path of the default settings file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

/// Get the netstego config directory (`~/.netstego`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".netstego"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_file() {
        let settings: Settings =
            toml::from_str("seed = 42\nmax_retries = 5\ndirected = true\nformat = \"dbstring\"\n").unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.max_retries, Some(5));
        assert_eq!(settings.directed, Some(true));
        assert_eq!(settings.format, Some(EdgeFormat::DbString));
    }

    #[test]
    fn test_missing_keys_default() {
        let settings: Settings = toml::from_str("seed = 7\n").unwrap();
        assert_eq!(settings.max_retries, None);
        assert_eq!(settings.format, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<Settings>("passphrase = \"x\"\n").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let settings = Settings {
            seed: Some(3),
            format: Some(EdgeFormat::Sif),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::resolve(Some(&path)).unwrap(), settings);
    }
}
