//! Sub-configuration structs with defaults matching the stock folder layout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Folder layout settings.
///
/// The base folder holds an `input` subfolder (watched by convention, not by
/// the core) and an `output` subfolder used as the preview destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// Base working folder
    pub base_dir: PathBuf,
}

impl Default for FoldersConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("Morph"),
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Recognized input extensions (lowercase, no dot)
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "bmp".to_string(),
                "tga".to_string(),
                "gif".to_string(),
                "webp".to_string(),
                "tiff".to_string(),
                "tif".to_string(),
            ],
        }
    }
}

/// Write-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
