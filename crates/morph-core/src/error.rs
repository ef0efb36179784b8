//! Error types for the Morph image pipeline.
//!
//! Errors are split by scope: per-file failures inside a batch (decode,
//! encode) are logged and skipped by the controller, while whole-operation
//! preconditions (empty store, bad destination) abort before any side effect.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Morph operations.
#[derive(Error, Debug)]
pub enum MorphError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, covering ingestion, filtering, and write-out.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Input path is neither a regular file nor a directory
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// File extension is not a recognized image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Directory ingestion found no loadable images
    #[error("No images loaded from: {0}")]
    NoImagesLoaded(PathBuf),

    /// Operation requires at least one loaded image
    #[error("No images in input")]
    EmptyStore,

    /// A named target matched no loaded image
    #[error("Image not found in input: {0}")]
    TargetNotFound(String),

    /// Export destination directory could not be created
    #[error("Failed to create output directory {path}: {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    /// Image encoding failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Convenience type alias for Morph results.
pub type Result<T> = std::result::Result<T, MorphError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
