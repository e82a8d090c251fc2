//! Widget configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use capture::consts::DEFAULT_JPEG_QUALITY;

pub const BASE_URL_VAR: &str = "FEEDBACK_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/submit-feedback/";
pub const DEFAULT_DOCUMENT_SEGMENT: usize = 2;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
        }
    }
}

/// What the panel does after a report is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterSubmit {
    /// Stay open showing the issue link, with the form locked until dismissed.
    #[default]
    Lock,
    /// Hide immediately; the issue link stays readable through the view.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Where and how reports are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
    pub timeouts: Timeouts,
}

impl EndpointConfig {
    /// Full URL of the submission endpoint.
    #[must_use]
    pub fn url(&self) -> String {
        let path = self.path.trim_start_matches('/');
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            path: DEFAULT_ENDPOINT_PATH.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

/// Panel behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Index of the document id among the URL path's `/`-separated segments.
    pub document_segment: usize,
    /// JPEG quality (1-100) for screenshot payloads.
    pub jpeg_quality: u8,
    pub after_submit: AfterSubmit,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            document_segment: DEFAULT_DOCUMENT_SEGMENT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            after_submit: AfterSubmit::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetConfig {
    pub endpoint: EndpointConfig,
    pub panel: PanelConfig,
}

impl WidgetConfig {
    /// Build typed widget config from environment variables.
    ///
    /// All optional:
    /// - `FEEDBACK_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `FEEDBACK_ENDPOINT_PATH`: default `/submit-feedback/`
    /// - `FEEDBACK_DOCUMENT_SEGMENT`: default 2
    /// - `FEEDBACK_JPEG_QUALITY`: 1-100, default 70
    /// - `FEEDBACK_AFTER_SUBMIT`: `lock` (default) or `close`
    /// - `FEEDBACK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FEEDBACK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an out-of-range JPEG quality or an
    /// unknown after-submit policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = EndpointConfig {
            base_url: lookup(BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            path: lookup("FEEDBACK_ENDPOINT_PATH").unwrap_or_else(|| DEFAULT_ENDPOINT_PATH.to_owned()),
            timeouts: Timeouts {
                request_secs: parse_or(&lookup, "FEEDBACK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: parse_or(&lookup, "FEEDBACK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        };
        let panel = PanelConfig {
            document_segment: parse_or(&lookup, "FEEDBACK_DOCUMENT_SEGMENT", DEFAULT_DOCUMENT_SEGMENT),
            jpeg_quality: parse_quality(lookup("FEEDBACK_JPEG_QUALITY").as_deref())?,
            after_submit: parse_after_submit(lookup("FEEDBACK_AFTER_SUBMIT").as_deref())?,
        };
        Ok(Self { endpoint, panel })
    }

    /// Build config for a page served from `origin`, which stands in for an
    /// unset `FEEDBACK_BASE_URL` so reports go back to the serving site.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetConfig::from_env`].
    pub fn for_origin(origin: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| lookup(key).or_else(|| (key == BASE_URL_VAR).then(|| origin.to_owned())))
    }
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_quality(raw: Option<&str>) -> Result<u8, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_JPEG_QUALITY);
    };
    match raw.trim().parse::<u8>() {
        Ok(q @ 1..=100) => Ok(q),
        _ => Err(ConfigError::Parse(format!("FEEDBACK_JPEG_QUALITY must be 1-100, got '{raw}'"))),
    }
}

fn parse_after_submit(raw: Option<&str>) -> Result<AfterSubmit, ConfigError> {
    match raw.map(str::trim).unwrap_or("lock") {
        "lock" => Ok(AfterSubmit::Lock),
        "close" => Ok(AfterSubmit::Close),
        other => Err(ConfigError::Parse(format!(
            "unknown FEEDBACK_AFTER_SUBMIT '{other}' (expected 'lock' or 'close')"
        ))),
    }
}
