//! Panel state and its render model.
//!
//! DESIGN
//! ======
//! `panel` owns the form and the submission lifecycle; `view` flattens it
//! into the labels and flags a host needs to draw, so no rendering code
//! lives here.

pub mod panel;
pub mod view;
