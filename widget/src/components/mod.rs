//! Browser UI for the report-a-bug widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! `feedback_widget` owns the panel signal, the capture controller and the
//! submission client; the lip and modal only render and report clicks back
//! through callbacks.

pub mod feedback_lip;
pub mod feedback_modal;
pub mod feedback_widget;
