//! Deterministic PNG encoding of reconstructed sprites.
//!
//! Fixed compression and filter settings give byte-identical output for the
//! same bitmap, so the BLAKE3 digest can be used as a stable fingerprint.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::bitmap::Bitmap;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    /// Encoder failure, including errors from the destination writer.
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// PNG encoder settings.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smallest output.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Fastest encode.
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Encode a bitmap as an 8-bit RGBA PNG into `writer`.
pub fn write_bitmap_to_writer<W: Write>(
    bitmap: &Bitmap,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(PngError::InvalidDimensions { width, height });
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&bitmap.to_rgba8())?;
    Ok(())
}

/// BLAKE3 hex digest of encoded PNG bytes.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode a bitmap to memory and return the bytes with their digest.
pub fn write_bitmap_to_vec_with_hash(
    bitmap: &Bitmap,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_bitmap_to_writer(bitmap, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}
