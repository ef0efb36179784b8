//! Pipeline controller: orchestrates ingestion, filter dispatch, preview,
//! export, and memory accounting over the image store.
//!
//! Every operation runs to completion on the calling thread; there is no
//! background work and no concurrent access to the store. Per-file failures
//! inside a batch are logged and skipped; whole-operation preconditions
//! abort before any side effect.

pub mod discovery;

pub use discovery::FileDiscovery;

use std::path::{Path, PathBuf};

use crate::codec::{Codec, EncodeFormat, ImageCodec};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::filter;
use crate::store::{ImageRecord, ImageStore};
use crate::types::{RecordSummary, WriteReport};

use discovery::extension_of;

/// The stateful image pipeline: load, transform, write out, clear.
pub struct Pipeline {
    codec: Box<dyn Codec>,
    discovery: FileDiscovery,
    store: ImageStore,
    preview_dir: PathBuf,
    jpeg_quality: u8,
}

impl Pipeline {
    /// Create a pipeline with the stock `image`-crate codec.
    pub fn new(config: &Config) -> Self {
        Self::with_codec(config, Box::new(ImageCodec::new()))
    }

    /// Create a pipeline with a custom codec implementation.
    pub fn with_codec(config: &Config, codec: Box<dyn Codec>) -> Self {
        Self {
            codec,
            discovery: FileDiscovery::new(config.processing.clone()),
            store: ImageStore::new(),
            preview_dir: config.preview_dir(),
            jpeg_quality: config.output.jpeg_quality,
        }
    }

    /// Load a file or every recognized image directly inside a directory.
    ///
    /// Returns the number of records appended. Directory ingestion skips
    /// files that fail to decode (logged) and fails only if nothing loaded.
    pub fn add_input(&mut self, path: &Path) -> PipelineResult<usize> {
        if !path.exists() {
            return Err(PipelineError::PathNotFound(path.to_path_buf()));
        }

        if path.is_file() {
            if !self.discovery.is_supported(path) {
                return Err(PipelineError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: extension_of(path).unwrap_or_default(),
                });
            }
            self.load_single(path)?;
            return Ok(1);
        }

        if !path.is_dir() {
            return Err(PipelineError::InvalidPath(path.to_path_buf()));
        }

        let mut count = 0;
        for file in self.discovery.scan(path) {
            match self.load_single(&file) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!("Skipping {}: {}", file.display(), e),
            }
        }

        if count == 0 {
            return Err(PipelineError::NoImagesLoaded(path.to_path_buf()));
        }
        tracing::info!("Loaded {} image(s) from {}", count, path.display());
        Ok(count)
    }

    /// Decode one file and append the record.
    fn load_single(&mut self, path: &Path) -> PipelineResult<()> {
        let decoded = self.codec.decode(path)?;
        let record = ImageRecord::new(path, decoded);
        tracing::debug!(
            "Loaded {} ({}x{}, {} channel(s))",
            record.identity_key,
            record.width,
            record.height,
            record.channels
        );
        self.store.add(record);
        Ok(())
    }

    /// Apply the grayscale filter to every record, or to the first record
    /// matching `target` (case-insensitive) if one is named.
    ///
    /// Returns the number of records processed.
    pub fn apply_grayscale(&mut self, target: &str, intensity: f64) -> PipelineResult<usize> {
        if self.store.is_empty() {
            return Err(PipelineError::EmptyStore);
        }

        let intensity = intensity.clamp(0.0, 100.0);
        let selection = self.store.select(target);
        let indices = self.store.selected_indices(selection);
        if indices.is_empty() {
            return Err(PipelineError::TargetNotFound(target.to_string()));
        }

        tracing::debug!("Applying grayscale ({}%)", intensity);
        let mut processed = 0;
        for index in indices {
            if let Some(record) = self.store.get_mut(index) {
                filter::grayscale(record, intensity);
                tracing::debug!("[OK] {}", record.identity_key);
                processed += 1;
            }
        }
        Ok(processed)
    }

    /// Write selected records into the configured preview directory without
    /// removing them from the store.
    ///
    /// The directory is expected to exist already (bootstrapping is the
    /// caller's job); a missing directory surfaces as per-record failures.
    pub fn save_preview(&mut self, target: &str) -> PipelineResult<WriteReport> {
        if self.store.is_empty() {
            return Err(PipelineError::EmptyStore);
        }
        let dir = self.preview_dir.clone();
        tracing::debug!("Saving preview to {}", dir.display());
        self.write_selection(&dir, target, false)
    }

    /// Write selected records into `dest`, creating it if absent, and remove
    /// every successfully written record from the store when
    /// `clear_after_export` is set.
    pub fn export_output(
        &mut self,
        dest: &Path,
        clear_after_export: bool,
        target: &str,
    ) -> PipelineResult<WriteReport> {
        if self.store.is_empty() {
            return Err(PipelineError::EmptyStore);
        }

        if !dest.is_dir() {
            std::fs::create_dir_all(dest).map_err(|e| PipelineError::DirectoryCreate {
                path: dest.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        tracing::debug!("Exporting to {}", dest.display());
        self.write_selection(dest, target, clear_after_export)
    }

    /// Shared write loop for preview and export.
    ///
    /// Successfully written indices are queued and removed in one batch
    /// after the loop, so failed records are never dropped and positions
    /// stay valid throughout.
    fn write_selection(
        &mut self,
        dir: &Path,
        target: &str,
        clear: bool,
    ) -> PipelineResult<WriteReport> {
        let selection = self.store.select(target);
        let indices = self.store.selected_indices(selection);

        let mut report = WriteReport::default();
        let mut to_remove = Vec::new();

        for index in indices {
            let Some(record) = self.store.get(index) else {
                continue;
            };
            match self.write_record(record, dir) {
                Ok(dest) => {
                    tracing::info!("[OK] {} -> {}", record.identity_key, dest.display());
                    report.written += 1;
                    if clear {
                        to_remove.push(index);
                    }
                }
                Err(e) => {
                    tracing::warn!("[FAIL] {}: {}", record.identity_key, e);
                    report.failed += 1;
                }
            }
        }

        if clear && !to_remove.is_empty() {
            report.cleared = self.store.remove_indices(&to_remove);
            tracing::info!("Cleared {} image(s) from input", report.cleared);
        }

        Ok(report)
    }

    /// Encode one record into `dir`, named by its identity key.
    ///
    /// The encode format comes from the record's original source extension,
    /// not its in-memory state; extensions without an encoder (tga, gif,
    /// webp, tiff) fail here.
    fn write_record(&self, record: &ImageRecord, dir: &Path) -> PipelineResult<PathBuf> {
        let ext = record.source_extension().unwrap_or_default();
        let format = EncodeFormat::from_extension(&ext, self.jpeg_quality).ok_or_else(|| {
            PipelineError::Encode {
                path: record.source_path.clone(),
                message: format!("no encoder for .{} output", ext),
            }
        })?;

        let dest = dir.join(&record.identity_key);
        self.codec.encode(
            &dest,
            format,
            record.width,
            record.height,
            record.channels,
            &record.pixels,
        )?;
        Ok(dest)
    }

    /// Summaries of every loaded record, in store order.
    pub fn list_input(&self) -> Vec<RecordSummary> {
        self.store
            .iter()
            .map(|r| RecordSummary {
                name: r.identity_key.clone(),
                width: r.width,
                height: r.height,
                channels: r.channels,
                bytes: r.memory_bytes(),
                modified: r.modified,
            })
            .collect()
    }

    /// Total bytes held by all pixel buffers.
    pub fn memory_usage(&self) -> usize {
        self.store.iter().map(|r| r.memory_bytes()).sum()
    }

    /// Read access to the store.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodedImage;

    fn test_config(base: &Path) -> Config {
        let mut config = Config::default();
        config.folders.base_dir = base.join("Morph");
        config
    }

    fn pipeline_in(base: &Path) -> Pipeline {
        let config = test_config(base);
        std::fs::create_dir_all(config.preview_dir()).unwrap();
        Pipeline::new(&config)
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let pixels: Vec<u8> = (0..width as usize * height as usize * 3)
            .map(|i| (i * 31 % 256) as u8)
            .collect();
        ImageCodec::new()
            .encode(&path, EncodeFormat::Png, width, height, 3, &pixels)
            .unwrap();
        path
    }

    fn unencodable_record(name: &str, width: u32, height: u32) -> ImageRecord {
        // A valid in-memory record whose original extension has no encoder
        let decoded = DecodedImage {
            width,
            height,
            channels: 3,
            pixels: vec![128; width as usize * height as usize * 3],
        };
        ImageRecord::new(Path::new(name), decoded)
    }

    #[test]
    fn test_add_input_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 4, 2);

        let mut pipeline = pipeline_in(dir.path());
        assert_eq!(pipeline.add_input(&path).unwrap(), 1);

        let record = pipeline.store().get(0).unwrap();
        assert_eq!(record.pixels.len(), 4 * 2 * 3);
        assert_eq!(record.identity_key, "one.png");
        assert!(!record.modified);
    }

    #[test]
    fn test_add_input_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_in(dir.path());
        let err = pipeline.add_input(Path::new("/no/such/file.png")).unwrap_err();
        assert!(matches!(err, PipelineError::PathNotFound(_)));
    }

    #[test]
    fn test_add_input_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut pipeline = pipeline_in(dir.path());
        let err = pipeline.add_input(&path).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_add_input_directory_skips_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 3, 3);
        std::fs::write(input.join("readme.txt"), b"not an image").unwrap();

        let mut pipeline = pipeline_in(dir.path());
        assert_eq!(pipeline.add_input(&input).unwrap(), 2);
        assert_eq!(pipeline.store().len(), 2);
    }

    #[test]
    fn test_add_input_directory_with_corrupt_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("broken.png"), b"garbage bytes").unwrap();

        let mut pipeline = pipeline_in(dir.path());
        let err = pipeline.add_input(&input).unwrap_err();
        assert!(matches!(err, PipelineError::NoImagesLoaded(_)));
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn test_add_input_directory_tolerates_partial_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "good.png", 2, 2);
        std::fs::write(input.join("broken.png"), b"garbage bytes").unwrap();

        let mut pipeline = pipeline_in(dir.path());
        assert_eq!(pipeline.add_input(&input).unwrap(), 1);
    }

    #[test]
    fn test_grayscale_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_in(dir.path());
        let err = pipeline.apply_grayscale("", 100.0).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyStore));
    }

    #[test]
    fn test_grayscale_target_not_found_mutates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();
        let before = pipeline.store().get(0).unwrap().pixels.clone();

        let err = pipeline.apply_grayscale("missing.png", 100.0).unwrap_err();
        assert!(matches!(err, PipelineError::TargetNotFound(_)));

        let record = pipeline.store().get(0).unwrap();
        assert!(!record.modified);
        assert_eq!(record.pixels, before);
    }

    #[test]
    fn test_grayscale_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&input).unwrap();
        assert_eq!(pipeline.apply_grayscale("", 100.0).unwrap(), 2);
        assert!(pipeline.store().iter().all(|r| r.modified));
    }

    #[test]
    fn test_grayscale_target_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "Photo.PNG", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();
        assert_eq!(pipeline.apply_grayscale("photo.png", 50.0).unwrap(), 1);
        assert!(pipeline.store().get(0).unwrap().modified);
    }

    #[test]
    fn test_grayscale_targets_only_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&input).unwrap();
        assert_eq!(pipeline.apply_grayscale("a.png", 100.0).unwrap(), 1);
        assert!(pipeline.store().get(0).unwrap().modified);
        assert!(!pipeline.store().get(1).unwrap().modified);
    }

    #[test]
    fn test_save_preview_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();

        let report = pipeline.save_preview("").unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.cleared, 0);
        assert!(report.is_success());
        assert_eq!(pipeline.store().len(), 1);

        let preview = test_config(dir.path()).preview_dir().join("one.png");
        assert!(preview.exists());
    }

    #[test]
    fn test_save_preview_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_in(dir.path());
        let err = pipeline.save_preview("").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyStore));
    }

    #[test]
    fn test_export_clears_written_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 2, 2);
        write_png(&input, "c.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&input).unwrap();

        let dest = dir.path().join("exported");
        let report = pipeline.export_output(&dest, true, "").unwrap();
        assert_eq!(report.written, 3);
        assert_eq!(report.cleared, 3);
        assert!(pipeline.store().is_empty());
        for name in ["a.png", "b.png", "c.png"] {
            assert!(dest.join(name).exists());
        }
    }

    #[test]
    fn test_export_keeps_failed_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&input).unwrap();
        pipeline.store.add(unencodable_record("stuck.tga", 2, 2));

        let dest = dir.path().join("exported");
        let report = pipeline.export_output(&dest, true, "").unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.cleared, 2);

        // Only the unencodable record survives
        assert_eq!(pipeline.store().len(), 1);
        assert_eq!(pipeline.store().get(0).unwrap().identity_key, "stuck.tga");
        assert!(!dest.join("stuck.tga").exists());
    }

    #[test]
    fn test_export_without_clear_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();

        let dest = dir.path().join("exported");
        let report = pipeline.export_output(&dest, false, "").unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.cleared, 0);
        assert_eq!(pipeline.store().len(), 1);
    }

    #[test]
    fn test_export_target_no_match_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();

        let dest = dir.path().join("exported");
        let report = pipeline.export_output(&dest, true, "missing.png").unwrap();
        assert_eq!(report.written, 0);
        assert!(!report.is_success());
        assert_eq!(pipeline.store().len(), 1);
    }

    #[test]
    fn test_export_directory_create_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "one.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&path).unwrap();

        // Destination collides with a regular file
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"occupied").unwrap();

        let err = pipeline.export_output(&blocked, true, "").unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryCreate { .. }));
        assert_eq!(pipeline.store().len(), 1);
    }

    #[test]
    fn test_memory_usage_sums_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_in(dir.path());
        assert_eq!(pipeline.memory_usage(), 0);

        let a = write_png(dir.path(), "a.png", 4, 2);
        let b = write_png(dir.path(), "b.png", 3, 3);
        pipeline.add_input(&a).unwrap();
        pipeline.add_input(&b).unwrap();

        assert_eq!(pipeline.memory_usage(), 4 * 2 * 3 + 3 * 3 * 3);
    }

    #[test]
    fn test_list_input_reflects_store_order_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("batch");
        std::fs::create_dir(&input).unwrap();
        write_png(&input, "a.png", 2, 2);
        write_png(&input, "b.png", 2, 2);

        let mut pipeline = pipeline_in(dir.path());
        pipeline.add_input(&input).unwrap();
        pipeline.apply_grayscale("b.png", 100.0).unwrap();

        let listing = pipeline.list_input();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "a.png");
        assert!(!listing[0].modified);
        assert_eq!(listing[1].name, "b.png");
        assert!(listing[1].modified);
        assert_eq!(listing[0].bytes, 2 * 2 * 3);
    }
}
