//! Morph Core - In-memory image batch pipeline.
//!
//! Morph ingests raster images from disk, holds their decoded buffers in
//! memory, applies per-pixel filters, and writes results back out with an
//! explicit clear-on-export lifecycle.
//!
//! # Architecture
//!
//! ```text
//! add_input → [Image Store] → apply filters → save_preview / export_output
//! ```
//!
//! Decoding and encoding of concrete formats live behind the [`codec::Codec`]
//! boundary; the pipeline itself only ever sees raw interleaved buffers.
//! Everything runs synchronously on the calling thread: each operation runs
//! to completion before the next is issued, so the store never needs a lock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use morph_core::{Config, Pipeline};
//!
//! let config = Config::load()?;
//! let mut pipeline = Pipeline::new(&config);
//!
//! pipeline.add_input("./photos".as_ref())?;
//! pipeline.apply_grayscale("", 100.0)?;
//! let report = pipeline.export_output("./out".as_ref(), true, "")?;
//! println!("Export complete! ({} file(s))", report.written);
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use codec::{Codec, DecodedImage, EncodeFormat, ImageCodec};
pub use config::Config;
pub use error::{ConfigError, MorphError, PipelineError, PipelineResult, Result};
pub use pipeline::Pipeline;
pub use store::{ImageRecord, ImageStore, Selection};
pub use types::{RecordSummary, WriteReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_pipeline_from_default_config() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config);
        assert_eq!(pipeline.memory_usage(), 0);
        assert!(pipeline.list_input().is_empty());
    }
}
