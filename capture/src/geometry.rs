#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in viewport (client) coordinates, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Page scroll at the time of an event.
///
/// Pointer coordinates are viewport-relative; adding the scroll offset maps
/// them into document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build the rectangle spanned by two corners, in any order.
    ///
    /// Each axis is sorted independently, so a drag in any of the four
    /// directions yields the same rectangle.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether the rectangle covers no area (a click without movement).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shift the rectangle, e.g. from viewport into document coordinates.
    #[must_use]
    pub fn translate(&self, offset: ScrollOffset) -> Self {
        Self { left: self.left + offset.x, top: self.top + offset.y, ..*self }
    }
}

/// The rectangle swept by a pointer-down-to-pointer-up gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRegion {
    /// Where the pointer went down.
    pub origin: Point,
    /// The most recent pointer position.
    pub current: Point,
}

impl DragRegion {
    /// Start a drag at `origin`; the region is empty until the pointer moves.
    #[must_use]
    pub fn new(origin: Point) -> Self {
        Self { origin, current: origin }
    }

    pub fn update(&mut self, current: Point) {
        self.current = current;
    }

    /// The normalized rectangle between origin and the current position.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.origin, self.current)
    }
}

/// A rectangle snapped to whole device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Snap a CSS-pixel rectangle to device pixels at the given scale.
    ///
    /// Negative origins clamp to zero. Non-finite input snaps to an empty
    /// rectangle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rect(rect: Rect, scale: f64) -> Self {
        if ![scale, rect.left, rect.top, rect.width, rect.height].iter().all(|v| v.is_finite()) {
            return Self::default();
        }
        let snap = |v: f64| (v * scale).round().max(0.0) as u32;
        let x = snap(rect.left);
        let y = snap(rect.top);
        let right = snap(rect.right());
        let bottom = snap(rect.bottom());
        Self { x, y, width: right.saturating_sub(x), height: bottom.saturating_sub(y) }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count of a bitmap covering this rectangle.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Far corner, saturating at `u32::MAX`.
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}
