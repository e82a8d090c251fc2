//! Shared constants for the capture crate.

// ── Overlay ─────────────────────────────────────────────────────

/// DOM id of the selection rectangle drawn while dragging.
pub const OVERLAY_ELEMENT_ID: &str = "screenshot-rect";

/// Class added to the overlay once the drag is released and rasterization starts.
pub const OVERLAY_PROCESSING_CLASS: &str = "processing";

// ── Rasterization ───────────────────────────────────────────────

/// Extra pixels rendered past the region's far corner before post-hoc cropping.
pub const CROP_RENDER_MARGIN_PX: u32 = 100;

/// Largest bitmap a capture may allocate, in pixels (Safari's canvas area limit).
pub const MAX_CAPTURE_PIXELS: u64 = 4096 * 4096;

/// Default device scale passed to rasterizers.
pub const DEFAULT_RASTER_SCALE: f64 = 1.0;

// ── Encoding ────────────────────────────────────────────────────

/// JPEG quality for submission payloads (canvas `toDataURL` quality 0.7).
pub const DEFAULT_JPEG_QUALITY: u8 = 70;
