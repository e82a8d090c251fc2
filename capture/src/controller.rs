//! Host-facing capture controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps [`CaptureCore`] with the two things the pure state machine does not
//! own: a [`CaptureSurface`] that applies visual effects, and the one-shot
//! channel that delivers the finished bitmap to whoever armed the capture.
//!
//! The rasterizer is deliberately not called from inside the controller's
//! pointer handlers. `pointer_up` hands back a [`CaptureJob`]; the host
//! renders it without holding the controller and reports back through
//! [`CaptureController::complete`]. A host sharing the controller through
//! `Rc<RefCell<_>>` therefore never keeps it borrowed across a suspension
//! point, and pointer events arriving while processing still reach it (and
//! are ignored).

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use tracing::{debug, info, warn};

use crate::bitmap::CapturedImage;
use crate::engine::{Action, CaptureCore, CaptureJob, CaptureTicket};
use crate::geometry::{Point, Rect, ScrollOffset};
use crate::input::{Button, CaptureState, Cursor};
use crate::raster::{RasterError, RegionRasterizer};

/// Why a capture did not produce an image.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    /// The capture was cancelled before the rasterizer finished.
    #[error("screenshot capture was cancelled")]
    Cancelled,

    /// The rasterizer failed to render the region.
    #[error("screenshot capture failed: {0}")]
    Raster(#[from] RasterError),
}

impl CaptureError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "E_CAPTURE_CANCELLED",
            Self::Raster(e) => e.error_code(),
        }
    }
}

/// Outcome delivered to the party that armed the capture.
pub type CaptureResult = Result<CapturedImage, CaptureError>;

/// Applies the capture state machine's visual effects.
pub trait CaptureSurface {
    fn set_cursor(&mut self, cursor: Cursor);
    fn show_overlay(&mut self, rect: Rect);
    fn resize_overlay(&mut self, rect: Rect);
    fn mark_overlay_processing(&mut self);
    fn remove_overlay(&mut self);
}

/// Resolves once the armed capture finishes, fails, or is cancelled.
#[derive(Debug)]
pub struct CaptureHandle {
    ticket: CaptureTicket,
    rx: oneshot::Receiver<CaptureResult>,
}

impl CaptureHandle {
    #[must_use]
    pub fn ticket(&self) -> CaptureTicket {
        self.ticket
    }
}

impl Future for CaptureHandle {
    type Output = CaptureResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Sender dropped without a result: the controller went away.
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(CaptureError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The capture state machine bound to a surface and a completion channel.
pub struct CaptureController<S> {
    core: CaptureCore,
    surface: S,
    completion: Option<(CaptureTicket, oneshot::Sender<CaptureResult>)>,
}

impl<S: CaptureSurface> CaptureController<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_core(CaptureCore::new(), surface)
    }

    /// Bind a pre-configured core (e.g. with custom raster options).
    #[must_use]
    pub fn with_core(core: CaptureCore, surface: S) -> Self {
        Self { core, surface, completion: None }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &CaptureState {
        self.core.state()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    // --- Arming ---

    /// Arm the capture. The returned handle resolves with the captured image.
    ///
    /// Returns `None` without side effects if a capture is already armed,
    /// dragging, or processing.
    pub fn activate(&mut self) -> Option<CaptureHandle> {
        if !self.core.state().is_idle() {
            debug!(state = self.core.state().name(), "capture already active; ignoring activate");
            return None;
        }
        let actions = self.core.activate();
        let ticket = self.core.ticket()?;
        let (tx, rx) = oneshot::channel();
        self.completion = Some((ticket, tx));
        self.apply(actions);
        info!(%ticket, "screenshot capture armed");
        Some(CaptureHandle { ticket, rx })
    }

    /// Abandon the active capture; its handle resolves with [`CaptureError::Cancelled`].
    pub fn cancel(&mut self) {
        let ticket = self.core.ticket();
        let actions = self.core.cancel();
        if actions.is_empty() {
            return;
        }
        self.apply(actions);
        if let Some(ticket) = ticket {
            info!(%ticket, "screenshot capture cancelled");
            self.resolve(ticket, Err(CaptureError::Cancelled));
        }
    }

    // --- Pointer input ---

    /// Start a drag. Returns whether the press was consumed, in which case
    /// the host should suppress the browser's default handling of it.
    pub fn pointer_down(&mut self, screen_pt: Point, button: Button) -> bool {
        let actions = self.core.on_pointer_down(screen_pt, button);
        let consumed = !actions.is_empty();
        self.apply(actions);
        consumed
    }

    pub fn pointer_move(&mut self, screen_pt: Point) {
        let actions = self.core.on_pointer_move(screen_pt);
        self.apply(actions);
    }

    /// Finish the drag. Returns the job to rasterize when a drag was in progress.
    pub fn pointer_up(&mut self, screen_pt: Point, button: Button, scroll: ScrollOffset) -> Option<CaptureJob> {
        let actions = self.core.on_pointer_up(screen_pt, button, scroll);
        self.apply(actions)
    }

    // --- Completion ---

    /// Report the rasterizer's result for `job`.
    ///
    /// Returns `false` when the job is stale (cancelled or superseded); its
    /// result is discarded.
    pub fn complete(&mut self, job: &CaptureJob, result: Result<CapturedImage, RasterError>) -> bool {
        let actions = self.core.finish(job.ticket);
        if actions.is_empty() {
            warn!(ticket = %job.ticket, "discarding stale capture result");
            return false;
        }
        self.apply(actions);
        let outcome = match result {
            Ok(image) => {
                info!(ticket = %job.ticket, width = image.width(), height = image.height(), "screenshot captured");
                Ok(image)
            }
            Err(e) => {
                warn!(ticket = %job.ticket, error = %e, "screenshot rasterization failed");
                Err(CaptureError::Raster(e))
            }
        };
        self.resolve(job.ticket, outcome);
        true
    }

    /// Rasterize `job` and complete it, for hosts that own the controller exclusively.
    pub async fn run_capture<R: RegionRasterizer + ?Sized>(&mut self, job: CaptureJob, rasterizer: &R) -> bool {
        let result = job.rasterize(rasterizer).await;
        self.complete(&job, result)
    }

    // --- Internals ---

    fn resolve(&mut self, ticket: CaptureTicket, outcome: CaptureResult) {
        match self.completion.take() {
            Some((armed, tx)) if armed == ticket => {
                if tx.send(outcome).is_err() {
                    debug!(%ticket, "capture handle dropped before completion");
                }
            }
            other => self.completion = other,
        }
    }

    fn apply(&mut self, actions: Vec<Action>) -> Option<CaptureJob> {
        let mut job = None;
        for action in actions {
            match action {
                Action::SetCursor(cursor) => self.surface.set_cursor(cursor),
                Action::ShowOverlay(rect) => self.surface.show_overlay(rect),
                Action::ResizeOverlay(rect) => self.surface.resize_overlay(rect),
                Action::MarkOverlayProcessing => self.surface.mark_overlay_processing(),
                Action::RemoveOverlay => self.surface.remove_overlay(),
                Action::Rasterize(next) => job = Some(next),
            }
        }
        job
    }
}

/// Surface for hosts without a DOM: tracks the overlay it would draw and logs each effect.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    cursor: Cursor,
    overlay: Option<Rect>,
    processing: bool,
    overlays_shown: usize,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The overlay currently on screen, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<Rect> {
        self.overlay
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// How many overlays have been created over the surface's lifetime.
    #[must_use]
    pub fn overlays_shown(&self) -> usize {
        self.overlays_shown
    }
}

impl CaptureSurface for HeadlessSurface {
    fn set_cursor(&mut self, cursor: Cursor) {
        debug!(cursor = cursor.css(), "set cursor");
        self.cursor = cursor;
    }

    fn show_overlay(&mut self, rect: Rect) {
        debug!(x = rect.left, y = rect.top, "show overlay");
        self.overlay = Some(rect);
        self.processing = false;
        self.overlays_shown += 1;
    }

    fn resize_overlay(&mut self, rect: Rect) {
        if let Some(overlay) = self.overlay.as_mut() {
            *overlay = rect;
        }
    }

    fn mark_overlay_processing(&mut self) {
        debug!("overlay processing");
        self.processing = self.overlay.is_some();
    }

    fn remove_overlay(&mut self) {
        debug!("remove overlay");
        self.overlay = None;
        self.processing = false;
    }
}
