//! CLI command handlers.

pub mod config;
pub mod process;
pub mod shell;

use morph_core::Config;

/// Create the working folder tree (base, input, output) if absent.
///
/// The core pipeline expects the preview directory to already exist; this is
/// the one-time bootstrap that guarantees it.
pub fn ensure_folders(config: &Config) -> anyhow::Result<()> {
    for dir in [config.base_dir(), config.input_dir(), config.preview_dir()] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            tracing::info!("Created folder: {}", dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_folders_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.folders.base_dir = dir.path().join("Morph");

        ensure_folders(&config).unwrap();
        assert!(config.base_dir().is_dir());
        assert!(config.input_dir().is_dir());
        assert!(config.preview_dir().is_dir());

        // Idempotent
        ensure_folders(&config).unwrap();
    }
}
