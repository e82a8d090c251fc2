//! Headless capture session: replays a drag gesture over a rendered page.
//!
//! Stands in for the browser host. The page is a bitmap rendered ahead of
//! time, the overlay is a [`HeadlessSurface`], and the gesture comes from
//! the command line instead of the mouse.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use capture::bitmap::CapturedImage;
use capture::controller::{CaptureController, CaptureError, CaptureHandle, HeadlessSurface};
use capture::geometry::{Point, ScrollOffset};
use capture::input::Button;
use capture::engine::CaptureCore;
use capture::raster::{RasterOptions, RegionRasterizer};
use tracing::debug;
use widget::state::panel::FeedbackPanel;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid drag '{0}' (expected X1,Y1:X2,Y2)")]
    InvalidDrag(String),

    #[error("invalid scroll offset '{0}' (expected X,Y)")]
    InvalidScroll(String),

    #[error("invalid scale {0} (expected a positive number)")]
    InvalidScale(f64),

    #[error("a capture is already in progress")]
    Busy,

    #[error("screenshot capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// A press at `from`, a move to `to`, and a release there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub from: Point,
    pub to: Point,
    pub scroll: ScrollOffset,
}

impl Gesture {
    /// Parse `X1,Y1:X2,Y2` plus an optional `X,Y` scroll offset.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidDrag`] or [`SessionError::InvalidScroll`]
    /// for malformed input.
    pub fn parse(drag: &str, scroll: Option<&str>) -> Result<Self, SessionError> {
        let (from, to) = parse_drag(drag)?;
        let scroll = scroll.map(parse_scroll).transpose()?.unwrap_or_default();
        Ok(Self { from, to, scroll })
    }
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_pair(raw: &str) -> Option<(f64, f64)> {
    let (x, y) = raw.split_once(',')?;
    Some((parse_coord(x)?, parse_coord(y)?))
}

/// Parse `X1,Y1:X2,Y2` into the press and release points.
///
/// # Errors
///
/// Returns [`SessionError::InvalidDrag`] for malformed input.
pub fn parse_drag(raw: &str) -> Result<(Point, Point), SessionError> {
    let invalid = || SessionError::InvalidDrag(raw.to_owned());
    let (a, b) = raw.split_once(':').ok_or_else(invalid)?;
    let (x1, y1) = parse_pair(a).ok_or_else(invalid)?;
    let (x2, y2) = parse_pair(b).ok_or_else(invalid)?;
    Ok((Point::new(x1, y1), Point::new(x2, y2)))
}

/// Parse an `X,Y` scroll offset.
///
/// # Errors
///
/// Returns [`SessionError::InvalidScroll`] for malformed input.
pub fn parse_scroll(raw: &str) -> Result<ScrollOffset, SessionError> {
    let (x, y) = parse_pair(raw).ok_or_else(|| SessionError::InvalidScroll(raw.to_owned()))?;
    Ok(ScrollOffset::new(x, y))
}

/// Raster options for a page rendered at `scale` device pixels per CSS pixel.
///
/// # Errors
///
/// Returns [`SessionError::InvalidScale`] unless `scale` is finite and positive.
pub fn raster_options(scale: Option<f64>) -> Result<RasterOptions, SessionError> {
    let mut options = RasterOptions::default();
    if let Some(scale) = scale {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SessionError::InvalidScale(scale));
        }
        options.scale = scale;
    }
    Ok(options)
}

/// A capture controller bound to a page rasterizer.
pub struct HeadlessSession<R: ?Sized> {
    controller: CaptureController<HeadlessSurface>,
    rasterizer: Box<R>,
}

impl<R: RegionRasterizer + ?Sized> HeadlessSession<R> {
    #[must_use]
    pub fn new(rasterizer: Box<R>) -> Self {
        Self::with_options(rasterizer, RasterOptions::default())
    }

    /// Issue every capture job with `options`.
    #[must_use]
    pub fn with_options(rasterizer: Box<R>, options: RasterOptions) -> Self {
        let core = CaptureCore::new().with_options(options);
        Self { controller: CaptureController::with_core(core, HeadlessSurface::new()), rasterizer }
    }

    #[must_use]
    pub fn controller(&self) -> &CaptureController<HeadlessSurface> {
        &self.controller
    }

    /// Arm the controller and replay `gesture`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Capture`] when rasterization fails, including
    /// for a zero-area gesture.
    pub async fn capture(&mut self, gesture: Gesture) -> Result<CapturedImage, SessionError> {
        let handle = self.controller.activate().ok_or(SessionError::Busy)?;
        self.replay(handle, gesture).await.map_err(SessionError::from)
    }

    /// Take a screenshot for `panel` the way a user would: the panel hides,
    /// the gesture plays, and the panel re-opens with the outcome attached.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] when the controller is already armed.
    /// Capture failures are not errors here; they land on the panel as a notice.
    pub async fn capture_for(&mut self, panel: &mut FeedbackPanel, gesture: Gesture) -> Result<(), SessionError> {
        let handle = panel
            .request_screenshot(&mut self.controller)
            .ok_or(SessionError::Busy)?;
        let result = self.replay(handle, gesture).await;
        panel.attach_screenshot(result);
        Ok(())
    }

    async fn replay(&mut self, handle: CaptureHandle, gesture: Gesture) -> Result<CapturedImage, CaptureError> {
        debug!(ticket = %handle.ticket(), ?gesture, "replaying drag");
        self.controller.pointer_down(gesture.from, Button::Primary);
        self.controller.pointer_move(gesture.to);
        match self.controller.pointer_up(gesture.to, Button::Primary, gesture.scroll) {
            Some(job) => {
                self.controller.run_capture(job, self.rasterizer.as_ref()).await;
            }
            None => self.controller.cancel(),
        }
        handle.await
    }
}
