//! Owned BGRA pixel buffer shared by every pipeline stage.
//!
//! Byte order per pixel is fixed: 0 = Blue, 1 = Green, 2 = Red, 3 = Alpha.
//! Rows are stored top row first. Geometric operations are delegated to
//! `image::imageops`, which never looks at channel meaning, so the BGRA bytes
//! travel through an `Rgba<u8>` buffer unchanged.

use image::{imageops, ImageBuffer, Rgba};
use thiserror::Error;

/// Four 8-bit channels in storage order.
pub(crate) type RawBuffer = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors from bitmap construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitmapError {
    /// The pixel buffer length does not match the dimensions.
    #[error("pixel buffer for {width}x{height} needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: u64,
        actual: u64,
    },

    /// The pixel buffer for these dimensions cannot be allocated.
    #[error("bitmap of {width}x{height} is too large")]
    TooLarge { width: u32, height: u32 },
}

/// A channel of a BGRA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Blue = 0,
    Green = 1,
    Red = 2,
    Alpha = 3,
}

impl Channel {
    /// Byte offset of the channel inside a pixel.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A 2D grid of BGRA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    buf: RawBuffer,
}

impl Bitmap {
    /// Create a fully transparent bitmap.
    ///
    /// Panics when the buffer size overflows; see [`Bitmap::try_new`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Create a fully transparent bitmap, failing instead of panicking when
    /// the buffer would not fit in memory addressing.
    pub fn try_new(width: u32, height: u32) -> Result<Self, BitmapError> {
        buffer_len(width, height).ok_or(BitmapError::TooLarge { width, height })?;
        Ok(Self::new(width, height))
    }

    /// Create a bitmap where every pixel is `bgra`.
    pub fn filled(width: u32, height: u32, bgra: [u8; 4]) -> Self {
        Self {
            buf: ImageBuffer::from_pixel(width, height, Rgba(bgra)),
        }
    }

    /// Wrap an existing BGRA byte buffer.
    pub fn from_bgra(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = width as u64 * height as u64 * BYTES_PER_PIXEL as u64;
        let actual = data.len() as u64;
        let size_error = BitmapError::BufferSize {
            width,
            height,
            expected,
            actual,
        };
        if expected != actual {
            return Err(size_error);
        }
        ImageBuffer::from_raw(width, height, data)
            .map(|buf| Self { buf })
            .ok_or(size_error)
    }

    /// Build a bitmap from RGBA bytes, reordering them to BGRA.
    pub fn from_rgba(width: u32, height: u32, mut data: Vec<u8>) -> Result<Self, BitmapError> {
        swap_red_blue(&mut data);
        Self::from_bgra(width, height, data)
    }

    pub(crate) fn from_raw_buffer(buf: RawBuffer) -> Self {
        Self { buf }
    }

    pub(crate) fn raw(&self) -> &RawBuffer {
        &self.buf
    }

    pub(crate) fn raw_mut(&mut self) -> &mut RawBuffer {
        &mut self.buf
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.buf.dimensions()
    }

    /// Get the BGRA bytes of a pixel. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buf.get_pixel(x, y).0
    }

    /// Get the BGRA bytes of a pixel, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.buf.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Set the BGRA bytes of a pixel. Panics when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, bgra: [u8; 4]) {
        self.buf.put_pixel(x, y, Rgba(bgra));
    }

    /// Read one channel of a pixel.
    #[inline]
    pub fn channel(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.buf.get_pixel(x, y).0[channel.index()]
    }

    /// Write one channel of a pixel.
    #[inline]
    pub fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
        self.buf.get_pixel_mut(x, y).0[channel.index()] = value;
    }

    /// Raw BGRA bytes, row-major.
    pub fn as_bgra(&self) -> &[u8] {
        self.buf.as_raw()
    }

    /// Consume the bitmap and return its BGRA bytes.
    pub fn into_bgra(self) -> Vec<u8> {
        self.buf.into_raw()
    }

    /// Copy the pixels out as RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = self.buf.as_raw().clone();
        swap_red_blue(&mut data);
        data
    }

    /// Mirror left to right.
    pub fn flip_horizontal(&self) -> Bitmap {
        Self::from_raw_buffer(imageops::flip_horizontal(&self.buf))
    }

    /// Mirror top to bottom.
    pub fn flip_vertical(&self) -> Bitmap {
        Self::from_raw_buffer(imageops::flip_vertical(&self.buf))
    }

    /// Mirror top to bottom without allocating.
    pub fn flip_vertical_in_place(&mut self) {
        imageops::flip_vertical_in_place(&mut self.buf);
    }

    /// Rotate half a turn.
    pub fn rotate180(&self) -> Bitmap {
        Self::from_raw_buffer(imageops::rotate180(&self.buf))
    }

    /// Rotate three clockwise quarter turns. Width and height swap.
    pub fn rotate270(&self) -> Bitmap {
        Self::from_raw_buffer(imageops::rotate270(&self.buf))
    }
}

/// Byte length of a `width`×`height` buffer, if a `Vec` can hold it.
fn buffer_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(BYTES_PER_PIXEL)
        .filter(|&len| len <= isize::MAX as usize)
}

fn swap_red_blue(data: &mut [u8]) {
    for px in data.chunks_exact_mut(BYTES_PER_PIXEL) {
        px.swap(0, 2);
    }
}
