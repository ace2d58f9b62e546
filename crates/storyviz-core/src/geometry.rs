//! Geometric primitives: Point, Size, Rect.

use serde::{Deserialize, Serialize};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Both coordinates are finite (no NaN or infinity).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension has no drawable extent.
    ///
    /// NaN counts as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Replace negative or non-finite dimensions with zero.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let clean = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(clean(self.width), clean(self.height))
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Move the rectangle so it lies inside `outer` where possible.
    ///
    /// A rectangle larger than `outer` is pinned to the outer origin.
    #[must_use]
    pub fn clamp_within(&self, outer: &Self) -> Self {
        let x = self.x.min(outer.right() - self.width).max(outer.x);
        let y = self.y.min(outer.bottom() - self.height).max(outer.y);
        Self::new(x, y, self.width, self.height)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f32::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(100.0, 0.0).is_empty());
        assert!(Size::new(f32::NAN, 10.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_size_sanitized() {
        assert_eq!(Size::new(-5.0, 10.0).sanitized(), Size::new(0.0, 10.0));
        assert_eq!(
            Size::new(f32::NAN, f32::INFINITY).sanitized(),
            Size::ZERO
        );
        assert_eq!(Size::new(900.0, 480.0).sanitized(), Size::new(900.0, 480.0));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 220.0);
        assert_eq!(r.size(), Size::new(100.0, 200.0));
    }

    #[test]
    fn test_rect_clamp_within() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let moved = Rect::new(90.0, -5.0, 20.0, 20.0).clamp_within(&outer);
        assert_eq!(moved, Rect::new(80.0, 0.0, 20.0, 20.0));

        let oversized = Rect::new(50.0, 50.0, 200.0, 10.0).clamp_within(&outer);
        assert_eq!(oversized.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_sanitized_is_non_negative(w in proptest::num::f32::ANY, h in proptest::num::f32::ANY) {
            let s = Size::new(w, h).sanitized();
            prop_assert!(s.width >= 0.0 && s.width.is_finite());
            prop_assert!(s.height >= 0.0 && s.height.is_finite());
        }

        #[test]
        fn prop_clamp_within_keeps_fitting_rects_inside(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, w in 1.0f32..100.0, h in 1.0f32..100.0) {
            let outer = Rect::new(0.0, 0.0, 400.0, 300.0);
            let r = Rect::new(x, y, w, h).clamp_within(&outer);
            prop_assert!(r.x >= 0.0 && r.right() <= 400.0 + 1e-3);
            prop_assert!(r.y >= 0.0 && r.bottom() <= 300.0 + 1e-3);
        }
    }
}
