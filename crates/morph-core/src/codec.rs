//! Codec adapter: the decode/encode boundary between the pipeline and the
//! concrete image formats.
//!
//! The pipeline only ever sees raw interleaved 8-bit buffers plus dimensions.
//! `ImageCodec` is the stock implementation backed by the `image` crate; the
//! `Codec` trait keeps the boundary swappable for tests.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder};

use crate::error::{PipelineError, PipelineResult};

/// A decoded image: dimensions plus an exclusively owned pixel buffer.
///
/// Invariant: `pixels.len() == width * height * channels`. The buffer is
/// row-major with channels interleaved per pixel.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Channels per pixel (1-4)
    pub channels: u8,
    /// Raw interleaved 8-bit pixel data
    pub pixels: Vec<u8>,
}

/// Supported encode targets for preview/export write-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    Png,
    Jpeg { quality: u8 },
    Bmp,
}

impl EncodeFormat {
    /// Resolve the encode format from a lowercase file extension (no dot).
    ///
    /// Only png, jpg/jpeg, and bmp can be written; any other extension
    /// returns `None` and the record counts as a write failure.
    pub fn from_extension(ext: &str, jpeg_quality: u8) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg {
                quality: jpeg_quality,
            }),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// Abstract decode/encode capability.
///
/// Failures are reported to the caller, never retried.
pub trait Codec {
    /// Decode the image at `path` into a raw pixel buffer.
    fn decode(&self, path: &Path) -> PipelineResult<DecodedImage>;

    /// Encode a raw pixel buffer and write it to `path`.
    fn encode(
        &self,
        path: &Path,
        format: EncodeFormat,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> PipelineResult<()>;
}

/// Codec implementation backed by the `image` crate.
#[derive(Debug, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }

    fn color_type(path: &Path, channels: u8) -> PipelineResult<ExtendedColorType> {
        match channels {
            1 => Ok(ExtendedColorType::L8),
            2 => Ok(ExtendedColorType::La8),
            3 => Ok(ExtendedColorType::Rgb8),
            4 => Ok(ExtendedColorType::Rgba8),
            other => Err(PipelineError::Encode {
                path: path.to_path_buf(),
                message: format!("unsupported channel count: {}", other),
            }),
        }
    }
}

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> PipelineResult<DecodedImage> {
        let reader = image::ImageReader::open(path)
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open file: {}", e),
            })?
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();

        // Keep the source channel count for the 8-bit layouts the filter
        // engine understands; everything else normalizes to rgb8/rgba8.
        let (channels, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (1u8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2u8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3u8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4u8, buf.into_raw()),
            other if other.color().has_alpha() => (4u8, other.to_rgba8().into_raw()),
            other => (3u8, other.to_rgb8().into_raw()),
        };

        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * channels as usize
        );

        Ok(DecodedImage {
            width,
            height,
            channels,
            pixels,
        })
    }

    fn encode(
        &self,
        path: &Path,
        format: EncodeFormat,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> PipelineResult<()> {
        let color = Self::color_type(path, channels)?;

        let file = File::create(path).map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: format!("Cannot create file: {}", e),
        })?;
        let mut writer = BufWriter::new(file);

        let result = match format {
            EncodeFormat::Png => {
                PngEncoder::new(&mut writer).write_image(pixels, width, height, color)
            }
            EncodeFormat::Jpeg { quality } => JpegEncoder::new_with_quality(&mut writer, quality)
                .write_image(pixels, width, height, color),
            EncodeFormat::Bmp => {
                BmpEncoder::new(&mut writer).write_image(pixels, width, height, color)
            }
        };

        result.map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
