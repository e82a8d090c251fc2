#![allow(clippy::float_cmp)]

use std::cell::RefCell;

use image::{Rgba, RgbaImage};

use super::*;
use crate::consts::MAX_CAPTURE_PIXELS;

fn coordinate_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]))
}

fn rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
    Rect { left, top, width, height }
}

/// Renders whatever area it is asked for, from the document origin, and
/// remembers each request.
struct OriginRenderer {
    requests: RefCell<Vec<Rect>>,
}

impl OriginRenderer {
    fn new() -> Self {
        Self { requests: RefCell::new(Vec::new()) }
    }
}

#[async_trait(?Send)]
impl RegionRasterizer for OriginRenderer {
    async fn rasterize(&self, region: Rect, options: &RasterOptions) -> Result<CapturedImage, RasterError> {
        self.requests.borrow_mut().push(region);
        let px = PixelRect::from_rect(region, options.scale);
        CapturedImage::new(coordinate_page(px.width, px.height))
    }
}

struct FailingRenderer;

#[async_trait(?Send)]
impl RegionRasterizer for FailingRenderer {
    async fn rasterize(&self, _region: Rect, _options: &RasterOptions) -> Result<CapturedImage, RasterError> {
        Err(RasterError::Backend("canvas tainted".into()))
    }
}

// =============================================================
// RasterOptions / RasterError
// =============================================================

#[test]
fn default_options_render_at_unit_scale() {
    let opts = RasterOptions::default();
    assert_eq!(opts.scale, 1.0);
    assert!(opts.background.is_none());
}

#[test]
fn raster_error_codes() {
    assert_eq!(RasterError::EmptyRegion.error_code(), "E_EMPTY_REGION");
    assert_eq!(RasterError::Backend("x".into()).error_code(), "E_RASTER_BACKEND");
    let oob = RasterError::OutOfBounds { region: PixelRect::default(), width: 1, height: 1 };
    assert_eq!(oob.error_code(), "E_OUT_OF_BOUNDS");
    let large = RasterError::TooLarge { region: PixelRect::default(), limit: 1 };
    assert_eq!(large.error_code(), "E_REGION_TOO_LARGE");
}

// =============================================================
// BitmapRasterizer
// =============================================================

#[tokio::test]
async fn bitmap_rasterizer_returns_exact_region() {
    let raster = BitmapRasterizer::new(coordinate_page(100, 100));
    let img = raster
        .rasterize(rect(20.0, 30.0, 10.0, 5.0), &RasterOptions::default())
        .await
        .unwrap();
    assert_eq!(img.dimensions(), (10, 5));
    assert_eq!(img.pixels().get_pixel(0, 0), &Rgba([20, 30, 7, 255]));
}

#[tokio::test]
async fn bitmap_rasterizer_rejects_zero_area_region() {
    let raster = BitmapRasterizer::new(coordinate_page(100, 100));
    let err = raster
        .rasterize(rect(20.0, 30.0, 0.0, 0.0), &RasterOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, RasterError::EmptyRegion);
}

#[tokio::test]
async fn bitmap_rasterizer_scales_region_to_device_pixels() {
    let raster = BitmapRasterizer::new(coordinate_page(100, 100));
    let opts = RasterOptions { scale: 2.0, background: None };
    let img = raster.rasterize(rect(5.0, 5.0, 10.0, 10.0), &opts).await.unwrap();
    assert_eq!(img.dimensions(), (20, 20));
    assert_eq!(img.pixels().get_pixel(0, 0), &Rgba([10, 10, 7, 255]));
}

#[tokio::test]
async fn bitmap_rasterizer_region_below_page_is_out_of_bounds() {
    let raster = BitmapRasterizer::new(coordinate_page(50, 50));
    let err = raster
        .rasterize(rect(0.0, 80.0, 10.0, 10.0), &RasterOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RasterError::OutOfBounds { .. }));
}

#[test]
fn bitmap_rasterizer_open_missing_file_is_backend_error() {
    let result = BitmapRasterizer::open(Path::new("/definitely/not/here.png"));
    assert!(matches!(result, Err(RasterError::Backend(_))));
}

// =============================================================
// CroppingRasterizer
// =============================================================

#[test]
fn render_area_spans_origin_to_far_corner_plus_margin() {
    let cropper = CroppingRasterizer::new(OriginRenderer::new());
    let area = cropper.render_area(rect(30.0, 40.0, 50.0, 60.0));
    assert_eq!(area, rect(0.0, 0.0, 180.0, 200.0));
}

#[tokio::test]
async fn cropping_rasterizer_draws_region_offset_by_origin() {
    let cropper = CroppingRasterizer::new(OriginRenderer::new()).with_margin(10);
    let img = cropper
        .rasterize(rect(30.0, 40.0, 20.0, 15.0), &RasterOptions::default())
        .await
        .unwrap();
    assert_eq!(img.dimensions(), (20, 15));
    assert_eq!(img.pixels().get_pixel(0, 0), &Rgba([30, 40, 7, 255]));
    assert_eq!(img.pixels().get_pixel(19, 14), &Rgba([49, 54, 7, 255]));
    assert_eq!(cropper.inner.requests.borrow().as_slice(), &[rect(0.0, 0.0, 60.0, 65.0)]);
}

#[tokio::test]
async fn cropping_rasterizer_skips_render_for_empty_region() {
    let cropper = CroppingRasterizer::new(OriginRenderer::new());
    let err = cropper
        .rasterize(rect(30.0, 40.0, 0.0, 15.0), &RasterOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, RasterError::EmptyRegion);
    assert!(cropper.inner.requests.borrow().is_empty());
}

#[tokio::test]
async fn cropping_rasterizer_refuses_oversized_region_before_rendering() {
    let cropper = CroppingRasterizer::new(OriginRenderer::new());
    let err = cropper
        .rasterize(rect(0.0, 0.0, 5e9, 5e9), &RasterOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RasterError::TooLarge { .. }));
    assert!(cropper.inner.requests.borrow().is_empty());
}

#[tokio::test]
async fn bitmap_rasterizer_refuses_huge_drag_from_inside_page() {
    let rasterizer = BitmapRasterizer::new(coordinate_page(300, 300));
    let err = rasterizer
        .rasterize(rect(10.0, 10.0, 5e9, 5e9), &RasterOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RasterError::TooLarge { limit: MAX_CAPTURE_PIXELS, .. }));
}

#[tokio::test]
async fn cropping_rasterizer_propagates_backend_failure() {
    let cropper = CroppingRasterizer::new(FailingRenderer);
    let err = cropper
        .rasterize(rect(0.0, 0.0, 5.0, 5.0), &RasterOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, RasterError::Backend("canvas tainted".into()));
}
