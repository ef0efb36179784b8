//! Configuration management for Morph.
//!
//! Configuration is loaded from a platform config directory with sensible
//! defaults; a missing file is not an error.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Morph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder layout
    pub folders: FoldersConfig,

    /// Ingestion settings
    pub processing: ProcessingConfig,

    /// Write-out settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.morph.morph/config.toml
    /// - Linux: ~/.config/morph/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\morph\config\config.toml
    ///
    /// Falls back to ~/.morph/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "morph", "morph")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".morph").join("config.toml")
            })
    }

    /// Get the resolved base folder path (with ~ expansion).
    pub fn base_dir(&self) -> PathBuf {
        let path_str = self.folders.base_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Get the conventional input folder (`<base>/input`).
    pub fn input_dir(&self) -> PathBuf {
        self.base_dir().join("input")
    }

    /// Get the preview destination folder (`<base>/output`).
    pub fn preview_dir(&self) -> PathBuf {
        self.base_dir().join("output")
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.jpeg_quality, 95);
        assert_eq!(config.processing.supported_formats.len(), 9);
        assert_eq!(config.folders.base_dir, PathBuf::from("Morph"));
    }

    #[test]
    fn test_derived_folders() {
        let config = Config::default();
        assert!(config.input_dir().ends_with("Morph/input"));
        assert!(config.preview_dir().ends_with("Morph/output"));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[folders]"));
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("jpeg_quality = 95"));
    }

    #[test]
    fn test_load_from_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.output.jpeg_quality = 80;
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.jpeg_quality, 80);
    }
}
