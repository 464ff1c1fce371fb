//! Crate-level error type.

use thiserror::Error;

use crate::bitmap::BitmapError;
use crate::clip::ClipError;
use crate::geometry::GeometryError;
use crate::mask::MaskError;
use crate::mesh::MeshError;
use crate::png::PngError;

/// Any error the sprite backend can produce.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("clip error: {0}")]
    Clip(#[from] ClipError),

    #[error("mask error: {0}")]
    Mask(#[from] MaskError),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    /// No reconstruction path produced a bitmap.
    #[error("sprite '{0}' could not be reconstructed")]
    NotReconstructed(String),
}

/// Result alias for the sprite backend.
pub type Result<T> = std::result::Result<T, SpriteError>;
