// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node layout constraints.
//!
//! A [`Sizing`] is an immutable value. Each `with_*` method consumes the
//! record and returns an updated copy, so sizings can be built in a chain:
//!
//! ```
//! use understory_canvas::Sizing;
//!
//! let s = Sizing::default()
//!     .with_minimum_width(40)
//!     .with_maximum_width(200)
//!     .with_preferred_height(24);
//! assert_eq!(s.minimum_width(), Some(40));
//! assert_eq!(s.maximum_height(), None);
//! ```
//!
//! Absent values mean "unconstrained". Passing `None` to a builder clears the
//! value again.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, IntSize};

/// Minimum, maximum and preferred extents plus aspect-ratio limits for one node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sizing {
    minimum_width: Option<i32>,
    maximum_width: Option<i32>,
    preferred_width: Option<i32>,
    minimum_height: Option<i32>,
    maximum_height: Option<i32>,
    preferred_height: Option<i32>,
    minimum_aspect_ratio: Option<f64>,
    maximum_aspect_ratio: Option<f64>,
    preferred_aspect_ratio: Option<f64>,
    collapsible: bool,
    spacer: bool,
}

impl Sizing {
    /// A sizing with exactly the given extents on both axes.
    #[must_use]
    pub fn fixed(size: IntSize) -> Self {
        Self::default().with_fixed_size(size)
    }

    /// A pseudo-child that absorbs leftover space along `axis`.
    ///
    /// Stretches have no extent on the cross axis and never affect the
    /// cross-axis sizing of their container.
    #[must_use]
    pub fn stretch(axis: Axis) -> Self {
        Self {
            spacer: true,
            ..Self::default()
        }
        .with_fixed(axis.cross(), Some(0))
    }

    /// A pseudo-child occupying exactly `px` along `axis`.
    #[must_use]
    pub fn spacing(axis: Axis, px: i32) -> Self {
        Self {
            spacer: true,
            ..Self::default()
        }
        .with_fixed(axis, Some(px))
        .with_fixed(axis.cross(), Some(0))
    }

    /// Minimum width, if constrained.
    #[must_use]
    pub const fn minimum_width(&self) -> Option<i32> {
        self.minimum_width
    }

    /// Maximum width, if constrained.
    #[must_use]
    pub const fn maximum_width(&self) -> Option<i32> {
        self.maximum_width
    }

    /// Preferred width, if any.
    #[must_use]
    pub const fn preferred_width(&self) -> Option<i32> {
        self.preferred_width
    }

    /// Minimum height, if constrained.
    #[must_use]
    pub const fn minimum_height(&self) -> Option<i32> {
        self.minimum_height
    }

    /// Maximum height, if constrained.
    #[must_use]
    pub const fn maximum_height(&self) -> Option<i32> {
        self.maximum_height
    }

    /// Preferred height, if any.
    #[must_use]
    pub const fn preferred_height(&self) -> Option<i32> {
        self.preferred_height
    }

    /// Smallest allowed `width / height`.
    #[must_use]
    pub const fn minimum_aspect_ratio(&self) -> Option<f64> {
        self.minimum_aspect_ratio
    }

    /// Largest allowed `width / height`.
    #[must_use]
    pub const fn maximum_aspect_ratio(&self) -> Option<f64> {
        self.maximum_aspect_ratio
    }

    /// Preferred `width / height`.
    #[must_use]
    pub const fn preferred_aspect_ratio(&self) -> Option<f64> {
        self.preferred_aspect_ratio
    }

    /// Whether the node shrinks to nothing when it has no content.
    #[must_use]
    pub const fn collapsible(&self) -> bool {
        self.collapsible
    }

    /// Whether this is a stretch or spacing pseudo-child.
    #[must_use]
    pub const fn is_spacer(&self) -> bool {
        self.spacer
    }

    /// Returns true if minimum, maximum and preferred agree on both axes.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        let axis_fixed = |min: Option<i32>, max: Option<i32>, pref: Option<i32>| {
            min.is_some() && min == max && max == pref
        };
        axis_fixed(self.minimum_width, self.maximum_width, self.preferred_width)
            && axis_fixed(
                self.minimum_height,
                self.maximum_height,
                self.preferred_height,
            )
    }

    /// Returns true for a collapsible node whose maximum is zero on both axes.
    ///
    /// Collapsed nodes take no space and no spacing is inserted next to them.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsible && self.maximum_width == Some(0) && self.maximum_height == Some(0)
    }

    /// Minimum along `axis`.
    #[must_use]
    pub const fn minimum(&self, axis: Axis) -> Option<i32> {
        match axis {
            Axis::Horizontal => self.minimum_width,
            Axis::Vertical => self.minimum_height,
        }
    }

    /// Maximum along `axis`.
    #[must_use]
    pub const fn maximum(&self, axis: Axis) -> Option<i32> {
        match axis {
            Axis::Horizontal => self.maximum_width,
            Axis::Vertical => self.maximum_height,
        }
    }

    /// Preferred extent along `axis`.
    #[must_use]
    pub const fn preferred(&self, axis: Axis) -> Option<i32> {
        match axis {
            Axis::Horizontal => self.preferred_width,
            Axis::Vertical => self.preferred_height,
        }
    }

    /// Returns a copy with the minimum width replaced.
    #[must_use]
    pub fn with_minimum_width(self, px: impl Into<Option<i32>>) -> Self {
        self.with_minimum(Axis::Horizontal, px)
    }

    /// Returns a copy with the maximum width replaced.
    #[must_use]
    pub fn with_maximum_width(self, px: impl Into<Option<i32>>) -> Self {
        self.with_maximum(Axis::Horizontal, px)
    }

    /// Returns a copy with the preferred width replaced.
    #[must_use]
    pub fn with_preferred_width(self, px: impl Into<Option<i32>>) -> Self {
        self.with_preferred(Axis::Horizontal, px)
    }

    /// Returns a copy with the minimum height replaced.
    #[must_use]
    pub fn with_minimum_height(self, px: impl Into<Option<i32>>) -> Self {
        self.with_minimum(Axis::Vertical, px)
    }

    /// Returns a copy with the maximum height replaced.
    #[must_use]
    pub fn with_maximum_height(self, px: impl Into<Option<i32>>) -> Self {
        self.with_maximum(Axis::Vertical, px)
    }

    /// Returns a copy with the preferred height replaced.
    #[must_use]
    pub fn with_preferred_height(self, px: impl Into<Option<i32>>) -> Self {
        self.with_preferred(Axis::Vertical, px)
    }

    /// Returns a copy whose width is pinned: minimum, maximum and preferred all set to `px`.
    #[must_use]
    pub fn with_fixed_width(self, px: impl Into<Option<i32>>) -> Self {
        self.with_fixed(Axis::Horizontal, px)
    }

    /// Returns a copy whose height is pinned: minimum, maximum and preferred all set to `px`.
    #[must_use]
    pub fn with_fixed_height(self, px: impl Into<Option<i32>>) -> Self {
        self.with_fixed(Axis::Vertical, px)
    }

    /// Returns a copy pinned to `size` on both axes.
    #[must_use]
    pub fn with_fixed_size(self, size: IntSize) -> Self {
        self.with_fixed_width(size.width)
            .with_fixed_height(size.height)
    }

    /// Returns a copy with the minimum `width / height` replaced.
    #[must_use]
    pub fn with_minimum_aspect_ratio(mut self, ratio: impl Into<Option<f64>>) -> Self {
        self.minimum_aspect_ratio = ratio.into();
        self
    }

    /// Returns a copy with the maximum `width / height` replaced.
    #[must_use]
    pub fn with_maximum_aspect_ratio(mut self, ratio: impl Into<Option<f64>>) -> Self {
        self.maximum_aspect_ratio = ratio.into();
        self
    }

    /// Returns a copy with the preferred `width / height` replaced.
    #[must_use]
    pub fn with_preferred_aspect_ratio(mut self, ratio: impl Into<Option<f64>>) -> Self {
        self.preferred_aspect_ratio = ratio.into();
        self
    }

    /// Returns a copy with the collapsible flag replaced.
    #[must_use]
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Returns a copy with the minimum along `axis` replaced.
    #[must_use]
    pub fn with_minimum(mut self, axis: Axis, px: impl Into<Option<i32>>) -> Self {
        match axis {
            Axis::Horizontal => self.minimum_width = px.into(),
            Axis::Vertical => self.minimum_height = px.into(),
        }
        self
    }

    /// Returns a copy with the maximum along `axis` replaced.
    #[must_use]
    pub fn with_maximum(mut self, axis: Axis, px: impl Into<Option<i32>>) -> Self {
        match axis {
            Axis::Horizontal => self.maximum_width = px.into(),
            Axis::Vertical => self.maximum_height = px.into(),
        }
        self
    }

    /// Returns a copy with the preferred extent along `axis` replaced.
    #[must_use]
    pub fn with_preferred(mut self, axis: Axis, px: impl Into<Option<i32>>) -> Self {
        match axis {
            Axis::Horizontal => self.preferred_width = px.into(),
            Axis::Vertical => self.preferred_height = px.into(),
        }
        self
    }

    /// Returns a copy with minimum, maximum and preferred along `axis` all set to `px`.
    #[must_use]
    pub fn with_fixed(self, axis: Axis, px: impl Into<Option<i32>>) -> Self {
        let px = px.into();
        self.with_minimum(axis, px)
            .with_maximum(axis, px)
            .with_preferred(axis, px)
    }

    /// Overlays the explicitly set fields of `self` on top of `base`.
    ///
    /// Used by compositions: their own constraints win over the aggregate of
    /// their children.
    pub(crate) fn or(self, base: Self) -> Self {
        Self {
            minimum_width: self.minimum_width.or(base.minimum_width),
            maximum_width: self.maximum_width.or(base.maximum_width),
            preferred_width: self.preferred_width.or(base.preferred_width),
            minimum_height: self.minimum_height.or(base.minimum_height),
            maximum_height: self.maximum_height.or(base.maximum_height),
            preferred_height: self.preferred_height.or(base.preferred_height),
            minimum_aspect_ratio: self.minimum_aspect_ratio.or(base.minimum_aspect_ratio),
            maximum_aspect_ratio: self.maximum_aspect_ratio.or(base.maximum_aspect_ratio),
            preferred_aspect_ratio: self.preferred_aspect_ratio.or(base.preferred_aspect_ratio),
            collapsible: self.collapsible || base.collapsible,
            spacer: self.spacer || base.spacer,
        }
    }

    /// The maximum along `axis`, or `None` when it is missing or below the
    /// minimum. An unreachable maximum leaves the axis unbounded above.
    #[must_use]
    pub fn effective_maximum(&self, axis: Axis) -> Option<i32> {
        let minimum = self.minimum(axis).unwrap_or(0).max(0);
        self.maximum(axis).filter(|&max| max >= minimum)
    }

    /// The solver view of this sizing along `axis`.
    ///
    /// Missing minimums become 0 and missing maximums become unbounded. A
    /// maximum below the minimum is ignored.
    #[must_use]
    pub fn constraint(&self, axis: Axis) -> Constraint {
        Constraint {
            minimum: self.minimum(axis).unwrap_or(0).max(0),
            maximum: self.effective_maximum(axis).unwrap_or(i32::MAX),
            preferred: self.preferred(axis).map(|p| p.max(0)),
        }
    }
}

/// One child's constraints along a single axis, as seen by the box solver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    /// Smallest extent, at least 0.
    pub minimum: i32,
    /// Largest extent, never below `minimum`. `i32::MAX` when unbounded.
    pub maximum: i32,
    /// Requested extent. Children without one share the free space.
    pub preferred: Option<i32>,
}

impl Constraint {
    /// A constraint with no bounds and no preference.
    pub const UNCONSTRAINED: Self = Self {
        minimum: 0,
        maximum: i32::MAX,
        preferred: None,
    };

    /// Clamps `px` into `[minimum, maximum]`.
    #[must_use]
    pub fn clamp(&self, px: i32) -> i32 {
        px.clamp(self.minimum, self.maximum)
    }
}
