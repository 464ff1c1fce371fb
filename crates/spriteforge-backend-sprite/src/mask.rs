//! Alpha merge and face-overlay compositing.

use image::imageops;
use spriteforge_spec::{FaceOverlay, PixelRect};
use thiserror::Error;

use crate::bitmap::{Bitmap, Channel};
use crate::extract::extract_rect;

/// Errors from the alpha merge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    /// The mask does not cover the colour bitmap.
    #[error("mask {mask_width}x{mask_height} is smaller than colour {width}x{height}")]
    MaskTooSmall {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

/// Merge a colour bitmap with a mask.
///
/// The output has the colour bitmap's size and colour channels; its alpha is
/// the mask's blue channel at the same coordinate. No blending.
pub fn apply_mask(color: &Bitmap, mask: &Bitmap) -> Result<Bitmap, MaskError> {
    let (width, height) = color.dimensions();
    let (mask_width, mask_height) = mask.dimensions();
    if mask_width < width || mask_height < height {
        return Err(MaskError::MaskTooSmall {
            width,
            height,
            mask_width,
            mask_height,
        });
    }

    let mut out = color.clone();
    for y in 0..height {
        for x in 0..width {
            out.set_channel(x, y, Channel::Alpha, mask.channel(x, y, Channel::Blue));
        }
    }
    Ok(out)
}

/// Overwrite `dst` with `src` placed at (`x`, `y`). Parts of `src` outside
/// `dst` are dropped.
pub fn paste(dst: &mut Bitmap, src: &Bitmap, x: i64, y: i64) {
    imageops::replace(dst.raw_mut(), src.raw(), x, y);
}

/// Composite a face overlay onto the base colour and alpha bitmaps.
///
/// For a replacement overlay the face is `face_rect` cut out of the
/// overlay's full canvases, and the face colour is blended over the base
/// colour already at that spot. Otherwise the overlay bitmaps are the face
/// itself. Either way the result overwrites `face_rect` on the base. Alpha is
/// only touched when the overlay has an alpha bitmap.
pub fn apply_face_overlay(
    base_color: &mut Bitmap,
    base_alpha: &mut Bitmap,
    face_color: &Bitmap,
    face_alpha: Option<&Bitmap>,
    overlay: &FaceOverlay,
) {
    let rect = overlay.face_rect;
    let (x, y) = (rect.x as i64, rect.y as i64);

    if overlay.is_face_replacement {
        // Only the part of the face that lands on the base matters.
        if let Some(visible) = visible_part(rect, base_color) {
            if let (Ok(mut face), Ok(src)) = (
                extract_rect(base_color, visible),
                extract_rect(face_color, visible),
            ) {
                imageops::overlay(face.raw_mut(), src.raw(), 0, 0);
                paste(base_color, &face, visible.x as i64, visible.y as i64);
            }
        }
        if let Some(alpha) = face_alpha {
            if let Some(visible) = visible_part(rect, base_alpha) {
                if let Ok(face) = extract_rect(alpha, visible) {
                    paste(base_alpha, &face, visible.x as i64, visible.y as i64);
                }
            }
        }
    } else {
        paste(base_color, face_color, x, y);
        if let Some(alpha) = face_alpha {
            paste(base_alpha, alpha, x, y);
        }
    }
}

/// Intersection of `rect` with the bounds of `bitmap`, if not empty.
fn visible_part(rect: PixelRect, bitmap: &Bitmap) -> Option<PixelRect> {
    let x0 = (rect.x as i64).max(0);
    let y0 = (rect.y as i64).max(0);
    let x1 = (rect.x as i64 + rect.width as i64).min(bitmap.width() as i64);
    let y1 = (rect.y as i64 + rect.height as i64).min(bitmap.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRect::new(
        x0 as i32,
        y0 as i32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    ))
}
