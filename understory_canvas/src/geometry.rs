// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry: points, sizes, rectangles, margins, and axis helpers.
//!
//! Canvas layout works in whole pixels. Rectangles contain their left and top
//! edges but not their right and bottom edges, so adjacent rectangles that
//! share an edge never both contain a point on it.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in integer canvas coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntPoint {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downward.
    pub y: i32,
}

impl IntPoint {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IntPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IntPoint {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for IntPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for IntPoint {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for IntPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<IntPoint> for kurbo::Point {
    fn from(p: IntPoint) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl From<kurbo::Point> for IntPoint {
    /// Rounds to the nearest pixel.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Canvas coordinates are whole pixels well inside i32 range."
    )]
    fn from(p: kurbo::Point) -> Self {
        let p = p.round();
        Self::new(p.x as i32, p.y as i32)
    }
}

/// A width and height in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntSize {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl IntSize {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from its extents.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `width / height`, or `None` when either extent is not positive.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f64> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }

    /// Returns true if either extent is zero or negative.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clamps both extents to be non-negative.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.width.max(0), self.height.max(0))
    }
}

impl From<IntSize> for kurbo::Size {
    fn from(s: IntSize) -> Self {
        Self::new(f64::from(s.width), f64::from(s.height))
    }
}

/// An axis-aligned rectangle: an origin plus a size.
///
/// The left and top edges are inside the rectangle; the right and bottom
/// edges are outside.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntRect {
    /// Top-left corner.
    pub origin: IntPoint,
    /// Extents from the origin.
    pub size: IntSize,
}

impl IntRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(IntPoint::ZERO, IntSize::ZERO);

    /// Creates a rectangle from its origin and size.
    #[must_use]
    pub const fn new(origin: IntPoint, size: IntSize) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle at the origin with the given size.
    #[must_use]
    pub const fn from_size(size: IntSize) -> Self {
        Self::new(IntPoint::ZERO, size)
    }

    /// Creates a rectangle from its top, left, bottom, and right edges.
    #[must_use]
    pub const fn from_tlbr(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self::new(
            IntPoint::new(left, top),
            IntSize::new(right - left, bottom - top),
        )
    }

    /// Left edge (inclusive).
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.origin.x
    }

    /// Top edge (inclusive).
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.origin.y
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.size.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.size.height
    }

    /// Center point, rounded toward the top-left.
    #[must_use]
    pub const fn center(&self) -> IntPoint {
        IntPoint::new(
            self.origin.x + self.size.width / 2,
            self.origin.y + self.size.height / 2,
        )
    }

    /// Returns true if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Returns true if `p` lies inside. Left/top inclusive, right/bottom exclusive.
    #[must_use]
    pub const fn contains(&self, p: IntPoint) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Returns true if the two rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns the overlap of the two rectangles, or `None` if they do not intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::from_tlbr(
            self.top().max(other.top()),
            self.left().max(other.left()),
            self.bottom().min(other.bottom()),
            self.right().min(other.right()),
        ))
    }

    /// Returns the smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_tlbr(
            self.top().min(other.top()),
            self.left().min(other.left()),
            self.bottom().max(other.bottom()),
            self.right().max(other.right()),
        )
    }

    /// Moves the rectangle by `delta`.
    #[must_use]
    pub fn translate(&self, delta: IntPoint) -> Self {
        Self::new(self.origin + delta, self.size)
    }

    /// Shrinks the rectangle by `margins`. The resulting size never goes negative.
    #[must_use]
    pub fn inset(&self, margins: Margins) -> Self {
        Self::new(
            IntPoint::new(self.origin.x + margins.left, self.origin.y + margins.top),
            IntSize::new(
                self.size.width - margins.horizontal(),
                self.size.height - margins.vertical(),
            )
            .non_negative(),
        )
    }

    /// Converts to a Kurbo rectangle.
    #[must_use]
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::from_origin_size(kurbo::Point::from(self.origin), kurbo::Size::from(self.size))
    }

    /// Converts from a Kurbo rectangle, rounding each edge to the nearest pixel.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Canvas coordinates are whole pixels well inside i32 range."
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        let r = rect.abs().round();
        Self::from_tlbr(r.y0 as i32, r.x0 as i32, r.y1 as i32, r.x1 as i32)
    }
}

/// Space reserved around the content of a layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    /// Space above the content.
    pub top: i32,
    /// Space left of the content.
    pub left: i32,
    /// Space below the content.
    pub bottom: i32,
    /// Space right of the content.
    pub right: i32,
}

impl Margins {
    /// No margins.
    pub const ZERO: Self = Self::uniform(0);

    /// Creates margins from each side.
    #[must_use]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same margin on every side.
    #[must_use]
    pub const fn uniform(m: i32) -> Self {
        Self::new(m, m, m, m)
    }

    /// Total horizontal margin (left + right).
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical margin (top + bottom).
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Leading margin along `axis`.
    #[must_use]
    pub const fn leading(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Total margin along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}

/// One of the two layout axes.
///
/// Box layouts and splitters arrange children along their axis (the main
/// axis); the other axis is the cross axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Left to right: rows.
    Horizontal,
    /// Top to bottom: columns.
    Vertical,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Component of `p` along this axis.
    #[must_use]
    pub const fn of_point(self, p: IntPoint) -> i32 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    /// Extent of `s` along this axis.
    #[must_use]
    pub const fn of_size(self, s: IntSize) -> i32 {
        match self {
            Self::Horizontal => s.width,
            Self::Vertical => s.height,
        }
    }

    /// Builds a point from its component along this axis and along the cross axis.
    #[must_use]
    pub const fn point(self, main: i32, cross: i32) -> IntPoint {
        match self {
            Self::Horizontal => IntPoint::new(main, cross),
            Self::Vertical => IntPoint::new(cross, main),
        }
    }

    /// Builds a size from its extent along this axis and along the cross axis.
    #[must_use]
    pub const fn size(self, main: i32, cross: i32) -> IntSize {
        match self {
            Self::Horizontal => IntSize::new(main, cross),
            Self::Vertical => IntSize::new(cross, main),
        }
    }
}

/// Returns the largest rectangle with the given `width / height` ratio that
/// fits inside `rect`, centered along the axis that has slack.
///
/// Returns `rect` unchanged when it is empty or the ratio is not positive.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Fitted extents never exceed the source rectangle, which is in i32 range."
)]
pub fn fit_to_aspect_ratio(rect: IntRect, aspect_ratio: f64) -> IntRect {
    let Some(current) = rect.size.aspect_ratio() else {
        return rect;
    };
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return rect;
    }
    let width = f64::from(rect.width());
    let height = f64::from(rect.height());
    if current > aspect_ratio {
        // Height fills the rectangle.
        let new_width = height * aspect_ratio;
        let x = f64::from(rect.left()) + 0.5 * (width - new_width);
        IntRect::new(
            IntPoint::new(x as i32, rect.top()),
            IntSize::new(new_width as i32, rect.height()),
        )
    } else {
        // Width fills the rectangle.
        let new_height = width / aspect_ratio;
        let y = f64::from(rect.top()) + 0.5 * (height - new_height);
        IntRect::new(
            IntPoint::new(rect.left(), y as i32),
            IntSize::new(rect.width(), new_height as i32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_left_top_exclusive_right_bottom() {
        let r = IntRect::from_tlbr(10, 20, 30, 40);
        assert!(r.contains(IntPoint::new(20, 10)));
        assert!(r.contains(IntPoint::new(39, 29)));
        assert!(!r.contains(IntPoint::new(40, 15)), "right edge is outside");
        assert!(!r.contains(IntPoint::new(25, 30)), "bottom edge is outside");
        assert!(!r.contains(IntPoint::new(19, 15)));
    }

    #[test]
    fn edge_sharing_rects_do_not_intersect() {
        let a = IntRect::from_tlbr(0, 0, 10, 10);
        let b = IntRect::from_tlbr(0, 10, 10, 20);
        let c = IntRect::from_tlbr(5, 5, 15, 15);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(a.intersection(&c), Some(IntRect::from_tlbr(5, 5, 10, 10)));
        assert_eq!(a.intersection(&b), None);
        assert_eq!(a.union(&b), IntRect::from_tlbr(0, 0, 10, 20));
    }

    #[test]
    fn inset_and_translate() {
        let r = IntRect::from_size(IntSize::new(100, 50));
        let inset = r.inset(Margins::new(3, 5, 7, 11));
        assert_eq!(inset, IntRect::from_tlbr(3, 5, 43, 89));
        let tiny = r.inset(Margins::uniform(60));
        assert_eq!(tiny.size, IntSize::ZERO, "inset never produces a negative size");
        assert_eq!(
            r.translate(IntPoint::new(-4, 6)),
            IntRect::from_tlbr(6, -4, 56, 96)
        );
    }

    #[test]
    fn axis_helpers_swap_components() {
        let p = Axis::Vertical.point(7, 3);
        assert_eq!(p, IntPoint::new(3, 7));
        assert_eq!(Axis::Vertical.of_point(p), 7);
        assert_eq!(Axis::Horizontal.size(10, 20), IntSize::new(10, 20));
        assert_eq!(Axis::Vertical.of_size(IntSize::new(10, 20)), 20);
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
    }

    #[test]
    fn fit_to_wider_ratio_centers_vertically() {
        let r = IntRect::from_size(IntSize::new(640, 480));
        assert_eq!(
            fit_to_aspect_ratio(r, 2.0),
            IntRect::new(IntPoint::new(0, 80), IntSize::new(640, 320))
        );
    }

    #[test]
    fn fit_to_narrower_ratio_centers_horizontally() {
        let r = IntRect::from_size(IntSize::new(640, 480));
        assert_eq!(
            fit_to_aspect_ratio(r, 1.0),
            IntRect::new(IntPoint::new(80, 0), IntSize::new(480, 480))
        );
    }

    #[test]
    fn kurbo_round_trip() {
        let r = IntRect::from_tlbr(1, 2, 30, 40);
        let k = r.to_kurbo();
        assert_eq!(k, kurbo::Rect::new(2.0, 1.0, 40.0, 30.0));
        assert_eq!(IntRect::from_kurbo(kurbo::Rect::new(2.4, 0.6, 39.5, 30.2)), r);
    }
}
