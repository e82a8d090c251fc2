//! Networking for feedback submission.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the request/response schema and its form encoding;
//! `api` defines the `SubmissionClient` seam and its HTTP implementation.

pub mod api;
pub mod types;
