//! Document identifier extraction.
//!
//! The viewer serves documents at `/<section>/<document-id>/...`, so the id
//! is a fixed segment of the path split on `/` (index 2 counts the empty
//! segment before the leading slash).

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use reqwest::Url;

use crate::state::panel::FeedbackError;

/// Document id at `segment` of a URL path such as `/papers/1234.5678/`.
///
/// # Errors
///
/// Returns [`FeedbackError::MissingDocumentId`] when the segment is absent or empty.
pub fn document_id_from_path(path: &str, segment: usize) -> Result<String, FeedbackError> {
    path.split('/')
        .nth(segment)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| FeedbackError::MissingDocumentId(path.to_owned()))
}

/// Document id from a page location: either an absolute URL or a bare path.
///
/// # Errors
///
/// Returns [`FeedbackError::MissingDocumentId`] when the path has no id at `segment`.
pub fn document_id_from_location(location: &str, segment: usize) -> Result<String, FeedbackError> {
    match Url::parse(location) {
        Ok(url) => document_id_from_path(url.path(), segment),
        Err(_) => document_id_from_path(location, segment),
    }
}
