//! Geometric primitives like points, sizes, and rectangles.
//!
//! Window geometry and region math use the integer types ([`PointInt`],
//! [`SizeInt`], [`RectInt`]). Raw pointer coordinates coming from an input
//! backend use the generic [`Point<T>`], usually as `Point<f64>`.

use num_traits::Num;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// --- Generic Point<T> ---

/// Represents a 2D point with generic coordinates.
///
/// # Type Parameters
///
/// * `T`: The numeric type for the coordinates (e.g., `i32`, `f64`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize + Num + Copy",
    deserialize = "T: Deserialize<'de> + Num + Copy"
))]
pub struct Point<T: Num + Copy> {
    /// The x-coordinate of the point.
    pub x: T,
    /// The y-coordinate of the point.
    pub y: T,
}

impl<T: Num + Copy + Eq> Eq for Point<T> {}

impl<T: Num + Copy> Point<T> {
    /// Creates a new point.
    pub const fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Num + Copy> Add for Point<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num + Copy> Sub for Point<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Point<f64> {
    /// Converts an integer point into `f64` coordinates.
    pub fn from_int(point: PointInt) -> Self {
        Point::new(f64::from(point.x), f64::from(point.y))
    }
}

// --- Integer-specific PointInt, SizeInt, RectInt ---

/// An integer point with `i32` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointInt {
    pub x: i32,
    pub y: i32,
}

impl PointInt {
    /// Creates a new `PointInt`.
    pub const fn new(x: i32, y: i32) -> Self {
        PointInt { x, y }
    }

    /// Returns the point shifted by `(dx, dy)`, saturating at the `i32` range.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        PointInt::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl Add for PointInt {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        PointInt::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for PointInt {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        PointInt::new(self.x - other.x, self.y - other.y)
    }
}

/// An integer size with `u32` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeInt {
    pub width: u32,
    pub height: u32,
}

impl SizeInt {
    /// Creates a new `SizeInt`.
    pub const fn new(width: u32, height: u32) -> Self {
        SizeInt { width, height }
    }

    /// Checks if the area is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `width * height` as `u64`, which cannot overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// An integer rectangle with `i32` origin and `u32` size.
///
/// Edges are inclusive for left/top and exclusive for right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RectInt {
    /// The origin point (top-left corner) of the rectangle.
    pub origin: PointInt,
    /// The size (width and height) of the rectangle.
    pub size: SizeInt,
}

impl RectInt {
    /// Creates a new `RectInt` from an origin point and a size.
    pub const fn new(origin: PointInt, size: SizeInt) -> Self {
        RectInt { origin, size }
    }

    /// Creates a new `RectInt` from individual coordinate and dimension values.
    pub const fn from_coords(x: i32, y: i32, width: u32, height: u32) -> Self {
        RectInt {
            origin: PointInt::new(x, y),
            size: SizeInt::new(width, height),
        }
    }

    /// Creates a rectangle from its edges. Inverted edges produce an empty rectangle.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = if right > left { right.abs_diff(left) } else { 0 };
        let height = if bottom > top { bottom.abs_diff(top) } else { 0 };
        RectInt::from_coords(left, top, width, height)
    }

    /// Returns the x-coordinate of the rectangle's origin.
    pub fn x(&self) -> i32 { self.origin.x }
    /// Returns the y-coordinate of the rectangle's origin.
    pub fn y(&self) -> i32 { self.origin.y }
    /// Returns the width of the rectangle.
    pub fn width(&self) -> u32 { self.size.width }
    /// Returns the height of the rectangle.
    pub fn height(&self) -> u32 { self.size.height }

    /// Returns the y-coordinate of the top edge.
    pub fn top(&self) -> i32 { self.origin.y }
    /// Returns the x-coordinate of the left edge.
    pub fn left(&self) -> i32 { self.origin.x }

    /// Calculates the x-coordinate of the right edge, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.origin.x.saturating_add(clamp_extent(self.size.width))
    }
    /// Calculates the y-coordinate of the bottom edge, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.origin.y.saturating_add(clamp_extent(self.size.height))
    }

    /// Checks if a point (`PointInt`) is contained within the rectangle.
    pub fn contains_point(&self, point: PointInt) -> bool {
        point.x >= self.left() && point.x < self.right() &&
        point.y >= self.top() && point.y < self.bottom()
    }

    /// Checks if this rectangle intersects with another `RectInt`.
    pub fn intersects(&self, other: &RectInt) -> bool {
        !self.is_empty() && !other.is_empty() &&
        self.left() < other.right() && self.right() > other.left() &&
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Calculates the intersection of this rectangle with another `RectInt`.
    /// Returns `None` if they do not intersect.
    pub fn intersection(&self, other: &RectInt) -> Option<RectInt> {
        if !self.intersects(other) {
            return None;
        }
        Some(RectInt::from_edges(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Calculates the smallest rectangle that contains both this and another `RectInt`.
    /// Empty rectangles do not contribute.
    pub fn union(&self, other: &RectInt) -> RectInt {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        RectInt::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Checks if the rectangle has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Translates the rectangle by a given delta (dx, dy).
    /// Uses saturating arithmetic to prevent overflow.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        RectInt::from_coords(
            self.origin.x.saturating_add(dx),
            self.origin.y.saturating_add(dy),
            self.size.width,
            self.size.height,
        )
    }
}

fn clamp_extent(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Point<i32>: std::fmt::Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Send, Sync);
    assert_impl_all!(Point<f64>: std::fmt::Debug, Clone, Copy, PartialEq, Default, Serialize, Send, Sync);
    assert_impl_all!(PointInt: std::fmt::Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Default, Serialize, Send, Sync);
    assert_impl_all!(SizeInt: std::fmt::Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Default, Serialize, Send, Sync);
    assert_impl_all!(RectInt: std::fmt::Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, Default, Serialize, Send, Sync);

    #[test]
    fn point_ops() {
        let a = Point::new(1.5, 2.0);
        let b = Point::new(0.5, 1.0);
        assert_eq!(a + b, Point::new(2.0, 3.0));
        assert_eq!(a - b, Point::new(1.0, 1.0));
        assert_eq!(PointInt::new(3, 4) - PointInt::new(1, 1), PointInt::new(2, 3));
        assert_eq!(Point::from_int(PointInt::new(-2, 7)), Point::new(-2.0, 7.0));
    }

    #[test]
    fn rect_int_edges() {
        let r = RectInt::from_coords(10, 20, 30, 40);
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (10, 20, 40, 60));
        assert_eq!(RectInt::from_edges(10, 20, 40, 60), r);
        assert!(RectInt::from_edges(5, 5, 1, 9).is_empty());
    }

    #[test]
    fn rect_int_edges_saturate() {
        let r = RectInt::from_coords(i32::MAX - 5, 0, 10, 3_000_000_000);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert_eq!(PointInt::new(i32::MAX, i32::MIN).offset(1, -1), PointInt::new(i32::MAX, i32::MIN));
        assert_eq!(RectInt::from_edges(i32::MIN, 0, i32::MAX, 1).width(), u32::MAX);
    }

    #[rstest]
    #[case(RectInt::from_coords(0, 0, 10, 10), RectInt::from_coords(5, 5, 10, 10), Some(RectInt::from_coords(5, 5, 5, 5)))]
    #[case(RectInt::from_coords(0, 0, 10, 10), RectInt::from_coords(10, 0, 10, 10), None)]
    #[case(RectInt::from_coords(0, 0, 10, 10), RectInt::from_coords(2, 2, 0, 5), None)]
    fn rect_int_intersection(#[case] a: RectInt, #[case] b: RectInt, #[case] expected: Option<RectInt>) {
        assert_eq!(a.intersection(&b), expected);
        assert_eq!(b.intersection(&a), expected);
    }

    #[test]
    fn rect_int_union_ignores_empty() {
        let r = RectInt::from_coords(10, 10, 5, 5);
        assert_eq!(r.union(&RectInt::default()), r);
        assert_eq!(
            r.union(&RectInt::from_coords(0, 0, 2, 2)),
            RectInt::from_coords(0, 0, 15, 15)
        );
    }

    #[test]
    fn rect_int_contains_point_is_half_open() {
        let r = RectInt::from_coords(0, 0, 10, 10);
        assert!(r.contains_point(PointInt::new(0, 0)));
        assert!(r.contains_point(PointInt::new(9, 9)));
        assert!(!r.contains_point(PointInt::new(10, 5)));
    }

    #[test]
    fn rect_int_translate() {
        let translated = RectInt::from_coords(10, 20, 30, 40).translate(5, -5);
        assert_eq!(translated, RectInt::from_coords(15, 15, 30, 40));

        let r_max = RectInt::from_coords(i32::MAX - 5, i32::MAX - 5, 10, 10);
        assert_eq!(r_max.translate(10, 10).x(), i32::MAX);
    }
}
