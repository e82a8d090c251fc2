//! Submission client: the seam between the panel and the feedback endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Every failure kind surfaces to the user the same way, through its
//! `Display` message, so variants only need to tell operators what broke.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::types::{FeedbackRequest, SubmitResponse};
use crate::config::EndpointConfig;

/// Errors produced while submitting a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The request never got a response.
    #[error("could not reach the feedback server: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("the feedback server rejected the report (status {status})")]
    Status { status: u16 },

    /// The endpoint answered 2xx but the body is not a submit response.
    #[error("the feedback server sent an unexpected response: {0}")]
    MalformedResponse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl SubmitError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_SUBMIT_TRANSPORT",
            Self::Status { .. } => "E_SUBMIT_STATUS",
            Self::MalformedResponse(_) => "E_SUBMIT_MALFORMED",
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// Sends a report and returns where the filed issue can be followed.
#[async_trait(?Send)]
pub trait SubmissionClient {
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the report could not be filed.
    async fn submit(&self, request: &FeedbackRequest) -> Result<SubmitResponse, SubmitError>;
}

/// [`SubmissionClient`] posting an urlencoded form over HTTP.
pub struct HttpSubmissionClient {
    http: reqwest::Client,
    url: String,
}

impl HttpSubmissionClient {
    /// # Errors
    ///
    /// Returns [`SubmitError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &EndpointConfig) -> Result<Self, SubmitError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        let http = builder
            .build()
            .map_err(|e| SubmitError::ClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url() })
    }

    /// Endpoint URL reports are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, request: &FeedbackRequest) -> Result<SubmitResponse, SubmitError> {
        debug!(
            url = %self.url,
            document_id = %request.document_id,
            has_text = request.text.is_some(),
            has_image = request.image_data.is_some(),
            "posting feedback"
        );
        let response = self
            .http
            .post(&self.url)
            .form(&request.form())
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body, "feedback endpoint rejected report");
            return Err(SubmitError::Status { status: status.as_u16() });
        }

        let parsed = parse_submit_response(&body)?;
        info!(issue_url = %parsed.issue_url, "feedback filed");
        Ok(parsed)
    }
}

/// Parse a 2xx response body.
///
/// # Errors
///
/// Returns [`SubmitError::MalformedResponse`] for non-JSON bodies, a missing
/// `issue_url`, or an empty one.
pub fn parse_submit_response(body: &str) -> Result<SubmitResponse, SubmitError> {
    let parsed: SubmitResponse =
        serde_json::from_str(body).map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
    if parsed.issue_url.trim().is_empty() {
        return Err(SubmitError::MalformedResponse("empty issue_url".to_owned()));
    }
    Ok(parsed)
}
