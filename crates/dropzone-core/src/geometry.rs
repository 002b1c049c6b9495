#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS pixels in viewport space (origin at top-left, y grows
//! downward), stored as `f64` so hosts can pass DOM values through untouched.

use core::ops::{Add, Sub};

/// A point (or offset) in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square size.
    #[inline]
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// Check if either dimension is zero, negative, or not a number.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// An axis-aligned rectangle, as reported by `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if a point lies inside the rectangle, edges included.
    ///
    /// Non-finite points are never contained.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Translate a viewport point into this rectangle's local coordinates.
    #[inline]
    pub fn to_local(&self, point: Point) -> Point {
        point - self.origin()
    }

    /// Check whether a box of `size` placed at the local `offset` stays fully
    /// inside this rectangle.
    ///
    /// Touching the far edge counts as inside; any negative offset does not.
    #[inline]
    pub fn fits_at(&self, offset: Point, size: Size) -> bool {
        offset.x >= 0.0
            && offset.y >= 0.0
            && offset.x + size.width <= self.width
            && offset.y + size.height <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size};

    #[test]
    fn rect_contains_includes_all_edges() {
        let rect = Rect::new(10.0, 20.0, 300.0, 300.0);
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(310.0, 320.0)));
        assert!(rect.contains(Point::new(160.0, 170.0)));
        assert!(!rect.contains(Point::new(9.5, 20.0)));
        assert!(!rect.contains(Point::new(10.0, 320.5)));
    }

    #[test]
    fn rect_contains_bounds_the_far_edge() {
        // A point past the right edge must not count as inside, whatever the width.
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!rect.contains(Point::new(250.0, 50.0)));
        assert!(!rect.contains(Point::new(50.0, 250.0)));
    }

    #[test]
    fn rect_contains_rejects_nan() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rect.contains(Point::new(f64::NAN, 5.0)));
    }

    #[test]
    fn to_local_subtracts_origin() {
        let rect = Rect::new(100.0, 50.0, 300.0, 300.0);
        assert_eq!(rect.to_local(Point::new(140.0, 70.0)), Point::new(40.0, 20.0));
    }

    #[test]
    fn fits_at_accepts_exact_fit() {
        let rect = Rect::new(0.0, 0.0, 300.0, 300.0);
        assert!(rect.fits_at(Point::new(250.0, 250.0), Size::square(50.0)));
        assert!(rect.fits_at(Point::ZERO, Size::square(50.0)));
    }

    #[test]
    fn fits_at_rejects_overflow_on_either_axis() {
        let rect = Rect::new(0.0, 0.0, 300.0, 300.0);
        assert!(!rect.fits_at(Point::new(290.0, 10.0), Size::square(50.0)));
        assert!(!rect.fits_at(Point::new(10.0, 290.0), Size::square(50.0)));
        assert!(!rect.fits_at(Point::new(-1.0, 10.0), Size::square(50.0)));
        assert!(!rect.fits_at(Point::new(10.0, -0.5), Size::square(50.0)));
    }

    #[test]
    fn size_is_empty() {
        assert!(Size::new(0.0, 10.0).is_empty());
        assert!(Size::new(10.0, f64::NAN).is_empty());
        assert!(!Size::square(1.0).is_empty());
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::from((1.0, 1.5));
        assert_eq!(a - b, Point::new(2.0, 2.5));
        assert_eq!(a + b, Point::new(4.0, 5.5));
        assert!(!Point::new(f64::INFINITY, 0.0).is_finite());
    }
}
