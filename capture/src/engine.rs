use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::bitmap::CapturedImage;
use crate::geometry::{DragRegion, Point, Rect, ScrollOffset};
use crate::input::{Button, CaptureState, Cursor};
use crate::raster::{RasterError, RasterOptions, RegionRasterizer};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Identifies one activation of the capture; results for any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureTicket(Uuid);

impl CaptureTicket {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A region waiting to be rasterized.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureJob {
    /// Activation this job belongs to.
    pub ticket: CaptureTicket,
    /// Selected region in viewport coordinates (what the overlay shows).
    pub viewport: Rect,
    /// Selected region in document coordinates (what gets rendered).
    pub region: Rect,
    pub options: RasterOptions,
}

impl CaptureJob {
    /// Render this job's region.
    ///
    /// # Errors
    ///
    /// Propagates the rasterizer's [`RasterError`].
    pub async fn rasterize<R: RegionRasterizer + ?Sized>(&self, rasterizer: &R) -> Result<CapturedImage, RasterError> {
        debug!(
            ticket = %self.ticket,
            x = self.region.left,
            y = self.region.top,
            width = self.region.width,
            height = self.region.height,
            "rasterizing capture region"
        );
        rasterizer.rasterize(self.region, &self.options).await
    }
}

/// Effects returned from state transitions for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetCursor(Cursor),
    ShowOverlay(Rect),
    ResizeOverlay(Rect),
    MarkOverlayProcessing,
    RemoveOverlay,
    Rasterize(CaptureJob),
}

/// Capture state machine: all transition logic, no browser or async dependencies.
///
/// Pointer events outside `Listening`/`Dragging` are no-ops, so the host can
/// leave its window listeners attached permanently.
#[derive(Debug, Default)]
pub struct CaptureCore {
    state: CaptureState,
    ticket: Option<CaptureTicket>,
    overlay_visible: bool,
    options: RasterOptions,
}

impl CaptureCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` for every job issued from now on.
    #[must_use]
    pub fn with_options(mut self, options: RasterOptions) -> Self {
        self.options = options;
        self
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Ticket of the activation in progress, if any.
    #[must_use]
    pub fn ticket(&self) -> Option<CaptureTicket> {
        self.ticket
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    // --- Transitions ---

    /// `Idle → Listening`. Ignored in any other state.
    pub fn activate(&mut self) -> Vec<Action> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        self.state = CaptureState::Listening;
        self.ticket = Some(CaptureTicket::new());
        vec![Action::SetCursor(Cursor::Crosshair)]
    }

    /// `Listening → Dragging` on a primary press.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if self.state != CaptureState::Listening || button != Button::Primary {
            return Vec::new();
        }
        let drag = DragRegion::new(screen_pt);
        self.overlay_visible = true;
        self.state = CaptureState::Dragging { drag };
        vec![Action::ShowOverlay(drag.rect()), Action::SetCursor(Cursor::Crosshair)]
    }

    /// `Dragging → Dragging`: resize the overlay to the new region.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let CaptureState::Dragging { drag } = &mut self.state else {
            return Vec::new();
        };
        drag.update(screen_pt);
        vec![Action::ResizeOverlay(drag.rect())]
    }

    /// `Dragging → Processing` on primary release: fix the region and request rasterization.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, scroll: ScrollOffset) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let CaptureState::Dragging { mut drag } = self.state else {
            return Vec::new();
        };
        let Some(ticket) = self.ticket else {
            return Vec::new();
        };
        drag.update(screen_pt);
        let viewport = drag.rect();
        self.state = CaptureState::Processing { rect: viewport };
        let job = CaptureJob { ticket, viewport, region: viewport.translate(scroll), options: self.options.clone() };
        vec![Action::MarkOverlayProcessing, Action::Rasterize(job)]
    }

    /// `Processing → Idle` once the rasterizer for `ticket` has finished.
    ///
    /// Returns no actions when `ticket` is not the current activation.
    pub fn finish(&mut self, ticket: CaptureTicket) -> Vec<Action> {
        if !matches!(self.state, CaptureState::Processing { .. }) || self.ticket != Some(ticket) {
            return Vec::new();
        }
        self.reset()
    }

    /// Abandon the capture from any active state.
    pub fn cancel(&mut self) -> Vec<Action> {
        if self.state.is_idle() {
            return Vec::new();
        }
        self.reset()
    }

    fn reset(&mut self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if self.overlay_visible {
            actions.push(Action::RemoveOverlay);
        }
        actions.push(Action::SetCursor(Cursor::Default));
        self.overlay_visible = false;
        self.ticket = None;
        self.state = CaptureState::Idle;
        actions
    }
}
