//! Screenshot region capture for the report-a-bug widget.
//!
//! This crate owns the capture interaction: a pointer-driven state machine
//! that tracks a drag rectangle over the page, asks a rasterizer for a bitmap
//! of the selected region, and hands the finished image back through a
//! one-shot [`controller::CaptureHandle`]. Visual side effects (cursor,
//! selection overlay) go through the [`controller::CaptureSurface`] seam so
//! the state machine runs natively in tests and against the DOM in the
//! browser (`web` feature).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Pure state machine [`engine::CaptureCore`] emitting [`engine::Action`]s |
//! | [`controller`] | [`controller::CaptureController`]: applies actions, resolves capture handles |
//! | [`input`] | Capture states, mouse buttons and cursors |
//! | [`geometry`] | Points, scroll offsets, drag regions and rectangles |
//! | [`raster`] | The [`raster::RegionRasterizer`] seam and bitmap-backed rasterizers |
//! | [`bitmap`] | [`bitmap::CapturedImage`]: owned bitmap, cropping and JPEG payloads |
//! | [`consts`] | Shared constants (overlay ids, crop margin, JPEG quality) |
//! | `dom` | Browser surface, `html2canvas` rasterizer and window listeners (`web` feature) |

pub mod bitmap;
pub mod consts;
pub mod controller;
#[cfg(feature = "web")]
pub mod dom;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod raster;
