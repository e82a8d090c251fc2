//! Captured screenshots: owned RGBA bitmaps, cropping, and JPEG payloads.
//!
//! Cropping follows canvas `drawImage` semantics: the source is drawn into a
//! fresh bitmap of the requested size at offset `(-x, -y)`, so any part of
//! the region past the source's edge stays transparent.

#[cfg(test)]
#[path = "bitmap_test.rs"]
mod bitmap_test;

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage, imageops};

use crate::consts::MAX_CAPTURE_PIXELS;
use crate::geometry::PixelRect;
use crate::raster::RasterError;

/// Errors produced while encoding a screenshot for submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// JPEG quality must be within `1..=100`.
    #[error("jpeg quality {0} is outside 1..=100")]
    Quality(u8),

    /// The encoder rejected the bitmap.
    #[error("jpeg encoding failed: {0}")]
    Jpeg(String),
}

impl EncodeError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Quality(_) => "E_JPEG_QUALITY",
            Self::Jpeg(_) => "E_JPEG_ENCODE",
        }
    }
}

/// Reject regions whose bitmap would exceed [`MAX_CAPTURE_PIXELS`].
///
/// # Errors
///
/// Returns [`RasterError::TooLarge`] for an oversized region.
pub fn ensure_capturable(region: PixelRect) -> Result<(), RasterError> {
    if region.area() > MAX_CAPTURE_PIXELS {
        return Err(RasterError::TooLarge { region, limit: MAX_CAPTURE_PIXELS });
    }
    Ok(())
}

/// An immutable, non-empty screenshot bitmap.
#[derive(Clone, PartialEq)]
pub struct CapturedImage {
    pixels: RgbaImage,
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl CapturedImage {
    /// Wrap a rendered bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::EmptyRegion`] if either dimension is zero.
    pub fn new(pixels: RgbaImage) -> Result<Self, RasterError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(RasterError::EmptyRegion);
        }
        Ok(Self { pixels })
    }

    /// Cut `region` out of `source` into a fresh bitmap of the region's size.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::EmptyRegion`] for a zero-area region,
    /// [`RasterError::OutOfBounds`] when the region starts past the source, and
    /// [`RasterError::TooLarge`] when the region exceeds [`MAX_CAPTURE_PIXELS`].
    pub fn from_region(source: &RgbaImage, region: PixelRect) -> Result<Self, RasterError> {
        if region.is_empty() {
            return Err(RasterError::EmptyRegion);
        }
        ensure_capturable(region)?;
        if region.x >= source.width() || region.y >= source.height() {
            return Err(RasterError::OutOfBounds {
                region,
                width: source.width(),
                height: source.height(),
            });
        }
        let mut out = RgbaImage::new(region.width, region.height);
        imageops::replace(&mut out, source, -i64::from(region.x), -i64::from(region.y));
        Self::new(out)
    }

    /// Crop a sub-region of this image.
    ///
    /// # Errors
    ///
    /// Same as [`CapturedImage::from_region`].
    pub fn crop(&self, region: PixelRect) -> Result<Self, RasterError> {
        Self::from_region(&self.pixels, region)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Encode as baseline JPEG. Alpha is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] for an invalid quality or an encoder failure.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::Quality(quality));
        }
        let rgb = DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8();
        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| EncodeError::Jpeg(e.to_string()))?;
        Ok(bytes)
    }

    /// JPEG bytes as standard base64, without a `data:` URL prefix.
    ///
    /// # Errors
    ///
    /// Same as [`CapturedImage::encode_jpeg`].
    pub fn to_jpeg_base64(&self, quality: u8) -> Result<String, EncodeError> {
        let bytes = self.encode_jpeg(quality)?;
        Ok(BASE64.encode(bytes))
    }
}
