//! Input model: mouse buttons, cursors, and the capture state machine's states.
//!
//! `CaptureState` is the gesture being tracked between activation and the
//! rasterizer's result. Active variants carry the context needed to resize
//! the overlay and compute the final region on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::{DragRegion, Rect};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Pointer cursor shown over the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Shown while a capture is armed or dragging.
    Crosshair,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
        }
    }
}

/// State of the capture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaptureState {
    /// Not capturing; pointer events pass through untouched.
    #[default]
    Idle,
    /// Armed: the next primary pointer-down starts a drag.
    Listening,
    /// The user is sweeping out a region.
    Dragging {
        /// Origin and latest pointer position.
        drag: DragRegion,
    },
    /// The region is fixed and the rasterizer is working on it.
    Processing {
        /// Final region in viewport coordinates.
        rect: Rect,
    },
}

impl CaptureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Dragging { .. } => "dragging",
            Self::Processing { .. } => "processing",
        }
    }
}
