//! File discovery for directory ingestion.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Finds loadable image files for the ingestion pass.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// List supported image files directly inside `dir`.
    ///
    /// Non-recursive: subdirectories are not descended into. Results are
    /// sorted by path for deterministic batch order.
    pub fn scan(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && self.is_supported(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        files
    }

    /// Check if a file has a recognized image extension (case-insensitive).
    pub fn is_supported(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.config.supported_formats.iter().any(|fmt| *fmt == ext))
            .unwrap_or(false)
    }
}

/// Lowercased extension of a path, without the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
