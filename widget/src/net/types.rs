//! Wire schema for the submission endpoint.
//!
//! The endpoint takes an urlencoded form (`arxivId`, `jpgData`, `text`)
//! and answers with JSON carrying the filed issue's URL.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// A validated report, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub document_id: String,
    /// User description; `None` when blank.
    pub text: Option<String>,
    /// Base64 JPEG without a data-URL prefix.
    pub image_data: Option<String>,
}

impl FeedbackRequest {
    /// Form body for this request.
    #[must_use]
    pub fn form(&self) -> FeedbackForm<'_> {
        FeedbackForm {
            document_id: &self.document_id,
            image_data: self.image_data.as_deref(),
            text: self.text.as_deref().unwrap_or_default(),
        }
    }
}

/// Urlencoded body posted to the endpoint.
///
/// `text` is always present (the endpoint reads it unconditionally);
/// `jpgData` is omitted when there is no screenshot.
#[derive(Debug, Serialize)]
pub struct FeedbackForm<'a> {
    #[serde(rename = "arxivId")]
    pub document_id: &'a str,
    #[serde(rename = "jpgData", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<&'a str>,
    pub text: &'a str,
}

/// Endpoint reply for a filed report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitResponse {
    pub issue_url: String,
}
