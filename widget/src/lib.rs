//! Report-a-bug widget: feedback panel state, configuration and the
//! submission client.
//!
//! The panel drives the [`capture`] crate for screenshots and a
//! [`net::api::SubmissionClient`] for filing the report. Rendering is left
//! to the host, which draws whatever [`state::view::PanelView`] describes;
//! the `web` feature ships the browser host built with Leptos.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | [`config::WidgetConfig`] parsed from environment variables |
//! | [`location`] | Document identifier extraction from the page URL |
//! | [`net`] | Wire types and the HTTP submission client |
//! | [`state`] | [`state::panel::FeedbackPanel`] and its render model |
//! | [`translation`] | Machine-translation detection on the page root |
//! | `components` | Lip button, report modal and the stateful widget host (`web` feature) |
//! | `app` | `startFeedbackWidget()` entry point and translation observer (`web` feature) |

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod components;
pub mod config;
pub mod location;
pub mod net;
pub mod state;
pub mod translation;
