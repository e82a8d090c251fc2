//! Rasterization seam: turning a page region into a bitmap.
//!
//! DESIGN
//! ======
//! The page renderer is an external collaborator. Everything the capture
//! state machine needs from it is [`RegionRasterizer::rasterize`]: a region
//! in document coordinates in, a bitmap of exactly that region out. The
//! browser implementation lives in `dom`; the ones here work from an
//! already rendered page bitmap, and [`CroppingRasterizer`] adapts a
//! renderer that cannot clip to a sub-region on its own.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use std::path::Path;

use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;

use crate::bitmap::{CapturedImage, ensure_capturable};
use crate::consts::{CROP_RENDER_MARGIN_PX, DEFAULT_RASTER_SCALE};
use crate::geometry::{PixelRect, Rect};

/// Errors produced by rasterizers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RasterError {
    /// The requested region covers no pixels (e.g. a click without a drag).
    #[error("capture region is empty")]
    EmptyRegion,

    /// The requested region starts outside the rendered page.
    #[error("capture region {region:?} lies outside the {width}x{height} page")]
    OutOfBounds { region: PixelRect, width: u32, height: u32 },

    /// The region would need a bitmap larger than any browser canvas.
    #[error("capture region {region:?} exceeds {limit} pixels")]
    TooLarge { region: PixelRect, limit: u64 },

    /// The rendering backend failed.
    #[error("rasterizer failed: {0}")]
    Backend(String),
}

impl RasterError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRegion => "E_EMPTY_REGION",
            Self::OutOfBounds { .. } => "E_OUT_OF_BOUNDS",
            Self::TooLarge { .. } => "E_REGION_TOO_LARGE",
            Self::Backend(_) => "E_RASTER_BACKEND",
        }
    }
}

/// Rendering options forwarded to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per CSS pixel.
    pub scale: f64,
    /// Background fill for transparent page areas, as a CSS color.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: DEFAULT_RASTER_SCALE, background: None }
    }
}

/// Renders a region of the current page into a bitmap.
///
/// Futures are not required to be `Send`: the widget runs on a single
/// cooperative event loop, and browser promises are not `Send`.
#[async_trait(?Send)]
pub trait RegionRasterizer {
    /// Render `region` (document coordinates, CSS pixels).
    ///
    /// # Errors
    ///
    /// Returns a [`RasterError`] when the region is empty or unrenderable.
    async fn rasterize(&self, region: Rect, options: &RasterOptions) -> Result<CapturedImage, RasterError>;
}

// =============================================================================
// BITMAP RASTERIZER
// =============================================================================

/// Serves regions out of a full-page bitmap rendered ahead of time.
///
/// The bitmap is assumed to be rendered at `RasterOptions::scale`.
pub struct BitmapRasterizer {
    page: RgbaImage,
}

impl BitmapRasterizer {
    #[must_use]
    pub fn new(page: RgbaImage) -> Self {
        Self { page }
    }

    /// Load a rendered page from an image file.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Backend`] if the file cannot be read or decoded.
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        let page = image::open(path)
            .map_err(|e| RasterError::Backend(format!("{}: {e}", path.display())))?
            .to_rgba8();
        debug!(path = %path.display(), width = page.width(), height = page.height(), "loaded page bitmap");
        Ok(Self::new(page))
    }

    #[must_use]
    pub fn page_dimensions(&self) -> (u32, u32) {
        self.page.dimensions()
    }
}

#[async_trait(?Send)]
impl RegionRasterizer for BitmapRasterizer {
    async fn rasterize(&self, region: Rect, options: &RasterOptions) -> Result<CapturedImage, RasterError> {
        CapturedImage::from_region(&self.page, PixelRect::from_rect(region, options.scale))
    }
}

// =============================================================================
// CROPPING RASTERIZER
// =============================================================================

/// Post-hoc cropping for renderers that cannot clip to a sub-region.
///
/// Renders from the document origin to the region's far corner plus a
/// margin, then draws the region into a fresh bitmap offset by `(-x, -y)`.
pub struct CroppingRasterizer<R> {
    inner: R,
    margin: u32,
}

impl<R> CroppingRasterizer<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner, margin: CROP_RENDER_MARGIN_PX }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// The area handed to the inner renderer for a given region.
    #[must_use]
    pub fn render_area(&self, region: Rect) -> Rect {
        let margin = f64::from(self.margin);
        Rect {
            left: 0.0,
            top: 0.0,
            width: region.right().max(0.0) + margin,
            height: region.bottom().max(0.0) + margin,
        }
    }
}

#[async_trait(?Send)]
impl<R: RegionRasterizer> RegionRasterizer for CroppingRasterizer<R> {
    async fn rasterize(&self, region: Rect, options: &RasterOptions) -> Result<CapturedImage, RasterError> {
        let target = PixelRect::from_rect(region, options.scale);
        if target.is_empty() {
            return Err(RasterError::EmptyRegion);
        }
        ensure_capturable(target)?;
        let area = self.render_area(region);
        debug!(width = area.width, height = area.height, "rendering uncropped area");
        let rendered = self.inner.rasterize(area, options).await?;
        rendered.crop(target)
    }
}
