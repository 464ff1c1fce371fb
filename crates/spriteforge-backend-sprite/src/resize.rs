//! Mask resampling.

use image::imageops::{self, FilterType};

use crate::bitmap::Bitmap;

/// Resampling tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    /// Nearest neighbour.
    #[default]
    Fast,
    /// Bicubic (Catmull-Rom).
    HighQuality,
}

impl Quality {
    pub fn from_high_quality(high_quality: bool) -> Self {
        if high_quality {
            Quality::HighQuality
        } else {
            Quality::Fast
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Quality::Fast => FilterType::Nearest,
            Quality::HighQuality => FilterType::CatmullRom,
        }
    }
}

/// Resample `bitmap` to exactly `width`×`height`.
pub fn resize(bitmap: &Bitmap, width: u32, height: u32, quality: Quality) -> Bitmap {
    if bitmap.dimensions() == (width, height) {
        return bitmap.clone();
    }
    Bitmap::from_raw_buffer(imageops::resize(
        bitmap.raw(),
        width,
        height,
        quality.filter(),
    ))
}
