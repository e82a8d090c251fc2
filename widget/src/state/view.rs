//! Render model: what the host draws for the current panel state.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use capture::bitmap::{CapturedImage, EncodeError};

use super::panel::{FeedbackPanel, Notice, SubmitPhase};

pub const TITLE: &str = "Report a bug";
pub const SUBMIT_LABEL: &str = "Submit";
pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const REPORTED_MESSAGE: &str = "Issue has been reported!";
pub const FOLLOW_LABEL: &str = "Follow it on GitHub.";
pub const CLOSE_LABEL: &str = "Close";
pub const DESCRIBE_LABEL: &str = "Describe the issue";
pub const SCREENSHOT_LABEL: &str = "Take screenshot";
pub const SCREENSHOT_HINT: &str = "You can also attach a screenshot, if you like.";
pub const SCREENSHOT_CAVEAT: &str =
    "This feature doesn't work on some browsers. If you just see a blank square, please describe the issue in the text box above.";

/// `data:` URL for previewing a screenshot in an `<img>`.
///
/// # Errors
///
/// Returns [`EncodeError`] when the image cannot be encoded at `quality`.
pub fn screenshot_data_url(image: &CapturedImage, quality: u8) -> Result<String, EncodeError> {
    Ok(format!("data:image/jpeg;base64,{}", image.to_jpeg_base64(quality)?))
}

/// The submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: &'static str,
    pub enabled: bool,
    /// `false` once the report is filed: the button is removed, not disabled.
    pub present: bool,
}

/// Confirmation shown in place of the form after a successful report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    pub message: &'static str,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub title: &'static str,
    pub visible: bool,
    /// Whether the description box and screenshot button are shown.
    pub form_shown: bool,
    pub description: String,
    /// Pixel size of the attached screenshot, if any.
    pub screenshot: Option<(u32, u32)>,
    pub submit: SubmitControl,
    pub notice: Option<Notice>,
    pub issue: Option<IssueLink>,
}

impl PanelView {
    #[must_use]
    pub fn of(panel: &FeedbackPanel) -> Self {
        let (submit, issue) = match panel.phase() {
            SubmitPhase::Editing => (SubmitControl { label: SUBMIT_LABEL, enabled: true, present: true }, None),
            SubmitPhase::Submitting => (SubmitControl { label: SUBMITTING_LABEL, enabled: false, present: true }, None),
            SubmitPhase::Submitted { issue_url } => (
                SubmitControl { label: SUBMIT_LABEL, enabled: false, present: false },
                Some(IssueLink { message: REPORTED_MESSAGE, label: FOLLOW_LABEL, url: issue_url.clone() }),
            ),
        };
        Self {
            title: TITLE,
            visible: panel.is_visible(),
            form_shown: issue.is_none(),
            description: panel.description().to_owned(),
            screenshot: panel.screenshot().map(capture::bitmap::CapturedImage::dimensions),
            submit,
            notice: panel.notice().cloned(),
            issue,
        }
    }
}
