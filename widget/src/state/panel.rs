//! Feedback panel: report form, screenshot slot and submission lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The panel never renders and never talks to the browser. Screenshots come
//! in through a [`CaptureHandle`] armed by [`FeedbackPanel::request_screenshot`]
//! and are handed back with [`FeedbackPanel::attach_screenshot`]; reports go
//! out through a [`SubmissionClient`]. Hosts that share the panel behind
//! `Rc<RefCell<_>>` use the split `begin_submit`/`finish_submit` pair so no
//! borrow is held while the request is in flight.
//!
//! LIFECYCLE
//! =========
//! `Editing → Submitting → Submitted`, with a failed submission falling back
//! to `Editing`. A submitted panel is reset to an empty form the next time
//! it is hidden or shown.

#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;

use capture::bitmap::{CapturedImage, EncodeError};
use capture::controller::{CaptureController, CaptureError, CaptureHandle, CaptureResult, CaptureSurface};
use capture::raster::RasterError;
use tracing::{debug, info, warn};

use super::view::PanelView;
use crate::config::{AfterSubmit, PanelConfig};
use crate::location::document_id_from_location;
use crate::net::api::{SubmissionClient, SubmitError};
use crate::net::types::{FeedbackRequest, SubmitResponse};

/// Errors from panel operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    /// Neither a description nor a screenshot was provided.
    #[error("Enter a description or take a screenshot.")]
    EmptySubmission,

    #[error("a report is already being submitted")]
    AlreadySubmitting,

    #[error("this report has already been submitted")]
    AlreadySubmitted,

    /// `finish_submit` was called without a submission in flight.
    #[error("no report is being submitted")]
    NotSubmitting,

    /// The page location carries no document id.
    #[error("no document id in page location '{0}'")]
    MissingDocumentId(String),

    #[error("could not encode the screenshot: {0}")]
    Encode(#[from] EncodeError),

    /// Shown to the user verbatim.
    #[error("{0}")]
    Submit(#[from] SubmitError),
}

impl FeedbackError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySubmission => "E_EMPTY_SUBMISSION",
            Self::AlreadySubmitting => "E_ALREADY_SUBMITTING",
            Self::AlreadySubmitted => "E_ALREADY_SUBMITTED",
            Self::NotSubmitting => "E_NOT_SUBMITTING",
            Self::MissingDocumentId(_) => "E_MISSING_DOCUMENT_ID",
            Self::Encode(e) => e.error_code(),
            Self::Submit(e) => e.error_code(),
        }
    }
}

/// Where the report is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Editing,
    /// A request is in flight; the submit control is disabled.
    Submitting,
    /// The report was filed; the form is locked.
    Submitted { issue_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Local validation blocked the submission.
    Validation,
    /// The screenshot could not be taken.
    Capture,
    /// The endpoint or transport failed.
    Submit,
}

/// A blocking message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

const EMPTY_REGION_MESSAGE: &str = "The selected area is empty. Drag across the part of the page you want to capture.";
const TOO_LARGE_MESSAGE: &str = "The selected area is too large to capture. Select a smaller part of the page.";

/// Form state for one document's bug report.
#[derive(Debug)]
pub struct FeedbackPanel {
    document_id: String,
    config: PanelConfig,
    visible: bool,
    description: String,
    screenshot: Option<CapturedImage>,
    phase: SubmitPhase,
    notice: Option<Notice>,
}

impl FeedbackPanel {
    /// A hidden, empty panel reporting against `document_id`.
    #[must_use]
    pub fn new(document_id: impl Into<String>, config: PanelConfig) -> Self {
        Self {
            document_id: document_id.into(),
            config,
            visible: false,
            description: String::new(),
            screenshot: None,
            phase: SubmitPhase::Editing,
            notice: None,
        }
    }

    /// A panel for the document served at `location` (URL or path).
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::MissingDocumentId`] when the location has no
    /// document segment.
    pub fn for_location(location: &str, config: PanelConfig) -> Result<Self, FeedbackError> {
        let document_id = document_id_from_location(location, config.document_segment)?;
        Ok(Self::new(document_id, config))
    }

    // --- Queries ---

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn screenshot(&self) -> Option<&CapturedImage> {
        self.screenshot.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Render model for the current state.
    #[must_use]
    pub fn view(&self) -> PanelView {
        PanelView::of(self)
    }

    // --- Visibility ---

    pub fn open(&mut self) {
        self.reset_if_submitted();
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.reset_if_submitted();
    }

    // --- Form ---

    /// Replace the description. Ignored once the report is filed.
    pub fn set_description(&mut self, text: impl Into<String>) {
        if matches!(self.phase, SubmitPhase::Submitted { .. }) {
            debug!("report already filed; ignoring description edit");
            return;
        }
        self.description = text.into();
    }

    /// Drop the attached screenshot.
    pub fn clear_screenshot(&mut self) {
        if self.phase == SubmitPhase::Editing {
            self.screenshot = None;
        }
    }

    /// Hide the panel and arm `controller` for a screenshot.
    ///
    /// The panel is hidden before the controller activates so it is not part
    /// of the captured page. Returns `None` (and re-shows the panel) when the
    /// controller is already busy or the form is not editable.
    pub fn request_screenshot<S: CaptureSurface>(&mut self, controller: &mut CaptureController<S>) -> Option<CaptureHandle> {
        if self.phase != SubmitPhase::Editing {
            debug!("form not editable; ignoring screenshot request");
            return None;
        }
        let was_visible = self.visible;
        self.visible = false;
        let handle = controller.activate();
        if handle.is_none() {
            self.visible = was_visible;
        }
        handle
    }

    /// Take the outcome of a capture armed by [`FeedbackPanel::request_screenshot`].
    ///
    /// Always re-shows the panel. A failed capture keeps any previous
    /// screenshot and raises a notice; a cancelled one changes nothing else.
    pub fn attach_screenshot(&mut self, result: CaptureResult) {
        self.visible = true;
        match result {
            Ok(image) => {
                if self.phase != SubmitPhase::Editing {
                    debug!("form not editable; discarding screenshot");
                    return;
                }
                debug!(width = image.width(), height = image.height(), "screenshot attached");
                self.screenshot = Some(image);
                self.notice = None;
            }
            Err(CaptureError::Cancelled) => debug!("screenshot cancelled"),
            Err(CaptureError::Raster(RasterError::EmptyRegion)) => {
                self.notice = Some(Notice::new(NoticeKind::Capture, EMPTY_REGION_MESSAGE));
            }
            Err(CaptureError::Raster(e @ RasterError::TooLarge { .. })) => {
                warn!(error = %e, "screenshot region too large");
                self.notice = Some(Notice::new(NoticeKind::Capture, TOO_LARGE_MESSAGE));
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "screenshot failed");
                self.notice = Some(Notice::new(NoticeKind::Capture, e.to_string()));
            }
        }
    }

    // --- Submission ---

    /// Validate the form and start a submission.
    ///
    /// # Errors
    ///
    /// - [`FeedbackError::EmptySubmission`] when there is neither text nor a
    ///   screenshot (also raised as a notice; the phase is unchanged).
    /// - [`FeedbackError::AlreadySubmitting`] / [`FeedbackError::AlreadySubmitted`]
    ///   outside `Editing`.
    /// - [`FeedbackError::Encode`] when the screenshot cannot be encoded.
    pub fn begin_submit(&mut self) -> Result<FeedbackRequest, FeedbackError> {
        match self.phase {
            SubmitPhase::Editing => {}
            SubmitPhase::Submitting => return Err(FeedbackError::AlreadySubmitting),
            SubmitPhase::Submitted { .. } => return Err(FeedbackError::AlreadySubmitted),
        }

        let text = (!self.description.trim().is_empty()).then(|| self.description.clone());
        if text.is_none() && self.screenshot.is_none() {
            let err = FeedbackError::EmptySubmission;
            self.notice = Some(Notice::new(NoticeKind::Validation, err.to_string()));
            return Err(err);
        }

        let image_data = match &self.screenshot {
            Some(image) => match image.to_jpeg_base64(self.config.jpeg_quality) {
                Ok(encoded) => Some(encoded),
                Err(e) => {
                    warn!(error = %e, "screenshot encoding failed");
                    let err = FeedbackError::Encode(e);
                    self.notice = Some(Notice::new(NoticeKind::Capture, err.to_string()));
                    return Err(err);
                }
            },
            None => None,
        };

        self.phase = SubmitPhase::Submitting;
        self.notice = None;
        Ok(FeedbackRequest { document_id: self.document_id.clone(), text, image_data })
    }

    /// Apply the endpoint's answer to the submission started by `begin_submit`.
    ///
    /// On success the form is cleared and locked behind the issue link (and
    /// hidden under [`AfterSubmit::Close`]). On failure the form returns to
    /// `Editing` with its contents intact and the error as a notice.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::Submit`] for a failed submission and
    /// [`FeedbackError::NotSubmitting`] when nothing was in flight.
    pub fn finish_submit(&mut self, result: Result<SubmitResponse, SubmitError>) -> Result<String, FeedbackError> {
        if self.phase != SubmitPhase::Submitting {
            warn!("submission result arrived with nothing in flight");
            return Err(FeedbackError::NotSubmitting);
        }
        match result {
            Ok(response) => {
                info!(document_id = %self.document_id, issue_url = %response.issue_url, "bug report filed");
                self.description.clear();
                self.screenshot = None;
                self.notice = None;
                self.phase = SubmitPhase::Submitted { issue_url: response.issue_url.clone() };
                if self.config.after_submit == AfterSubmit::Close {
                    self.visible = false;
                }
                Ok(response.issue_url)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "bug report submission failed");
                self.phase = SubmitPhase::Editing;
                self.notice = Some(Notice::new(NoticeKind::Submit, e.to_string()));
                Err(FeedbackError::Submit(e))
            }
        }
    }

    /// Validate, send through `client`, and apply the result.
    ///
    /// # Errors
    ///
    /// Any error from [`FeedbackPanel::begin_submit`] (the client is not
    /// called) or [`FeedbackPanel::finish_submit`].
    pub async fn submit<C: SubmissionClient + ?Sized>(&mut self, client: &C) -> Result<String, FeedbackError> {
        let request = self.begin_submit()?;
        let result = client.submit(&request).await;
        self.finish_submit(result)
    }

    /// Restore an empty, editable form. Visibility is unchanged.
    pub fn reset(&mut self) {
        self.description.clear();
        self.screenshot = None;
        self.notice = None;
        self.phase = SubmitPhase::Editing;
    }

    fn reset_if_submitted(&mut self) {
        if matches!(self.phase, SubmitPhase::Submitted { .. }) {
            self.reset();
        }
    }
}
