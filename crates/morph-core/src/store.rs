//! In-memory image store: records, identity, selection, and removal.

use std::path::{Path, PathBuf};

use crate::codec::DecodedImage;

/// Normalize a filename into an identity key.
///
/// Applied once at record creation and to every lookup key, so all matching
/// is case-insensitive by construction.
pub fn normalize_key(name: &str) -> String {
    name.to_lowercase()
}

/// One decoded image held in memory.
///
/// The pixel buffer is exclusively owned and always exactly
/// `width * height * channels` bytes; a record is only ever created from a
/// successful decode, so it is never observed with an empty buffer.
#[derive(Debug)]
pub struct ImageRecord {
    /// Origin path, immutable after creation
    pub source_path: PathBuf,

    /// Lowercased filename, the sole lookup key
    pub identity_key: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Channels per pixel (1-4), interleaved
    pub channels: u8,

    /// Raw row-major pixel data
    pub pixels: Vec<u8>,

    /// Set by any filter application, never cleared
    pub modified: bool,
}

impl ImageRecord {
    /// Build a record from a decode result, deriving the identity key from
    /// the source filename.
    pub fn new(source_path: &Path, decoded: DecodedImage) -> Self {
        let file_name = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        Self {
            source_path: source_path.to_path_buf(),
            identity_key: normalize_key(file_name),
            width: decoded.width,
            height: decoded.height,
            channels: decoded.channels,
            pixels: decoded.pixels,
            modified: false,
        }
    }

    /// Lowercased extension of the original source file (no dot).
    pub fn source_extension(&self) -> Option<String> {
        self.source_path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_key)
    }

    /// Bytes held by the pixel buffer.
    pub fn memory_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

/// Result of resolving a target name against the store.
///
/// A single selection primitive shared by filter, preview, and export, so
/// "all records" vs "first name match" is never re-derived per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No target given: every record, in insertion order
    All(usize),
    /// Target matched: the first record with that identity key
    One(usize),
    /// Target given but nothing matched
    NotFound,
}

/// Insertion-ordered collection of image records.
///
/// Ordering only changes by append (load) or batch removal (export-with-
/// clear). Duplicate identity keys are allowed; targeting resolves to the
/// first match in insertion order.
#[derive(Debug, Default)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of the store.
    pub fn add(&mut self, record: ImageRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ImageRecord> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    /// Case-insensitive exact match on the identity key; first match in
    /// insertion order.
    pub fn find_by_name(&self, name: &str) -> Option<&ImageRecord> {
        let key = normalize_key(name);
        self.records.iter().find(|r| r.identity_key == key)
    }

    /// Resolve a target name into a selection over the store.
    ///
    /// An empty target selects everything. The distinction between
    /// `All(0)` and `NotFound` lets callers separate "store empty" from
    /// "target missing".
    pub fn select(&self, target: &str) -> Selection {
        if target.is_empty() {
            return Selection::All(self.records.len());
        }
        let key = normalize_key(target);
        match self.records.iter().position(|r| r.identity_key == key) {
            Some(index) => Selection::One(index),
            None => Selection::NotFound,
        }
    }

    /// Indices covered by a selection, in insertion order.
    pub fn selected_indices(&self, selection: Selection) -> Vec<usize> {
        match selection {
            Selection::All(n) => (0..n).collect(),
            Selection::One(index) => vec![index],
            Selection::NotFound => Vec::new(),
        }
    }

    /// Remove the records at the given positions.
    ///
    /// Indices are processed from highest to lowest so earlier removals
    /// cannot shift the positions still pending. Returns the number removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> usize {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = 0;
        for &index in sorted.iter().rev() {
            if index < self.records.len() {
                self.records.remove(index);
                removed += 1;
            }
        }
        removed
    }
}
