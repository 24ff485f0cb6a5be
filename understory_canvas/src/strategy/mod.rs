// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout strategies: how a composition sizes itself and places its children.
//!
//! Every strategy is a pure pair of functions over the children's
//! [`Sizing`]s. [`LayoutStrategy::aggregate_sizing`] derives the container's
//! own sizing; [`LayoutStrategy::distribute`] assigns a rectangle, relative to
//! the container's origin, to each child.

use alloc::vec::Vec;

use crate::geometry::{Axis, IntRect, IntSize, fit_to_aspect_ratio};
use crate::sizing::Sizing;

mod box_layout;
mod grid;
mod overlay;
mod solver;

pub use box_layout::BoxLayout;
pub use grid::{GridCell, GridLayout};
pub use overlay::OverlayLayout;
pub use solver::solve;

/// Sizing aggregation and child placement for one kind of container.
pub trait LayoutStrategy {
    /// Derives the container's sizing from its children's, margins and spacing included.
    fn aggregate_sizing(&self, children: &[Sizing]) -> Sizing;

    /// Assigns each child a rectangle inside a container of `size`.
    ///
    /// The result has one entry per child, in order, relative to the
    /// container's origin.
    fn distribute(&self, children: &[Sizing], size: IntSize) -> Vec<IntRect>;
}

/// The strategy held by a composition.
#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Every child covers the whole content area.
    Overlay(OverlayLayout),
    /// Children in a row or column.
    Box(BoxLayout),
    /// Children in the cells of a grid.
    Grid(GridLayout),
}

impl Default for Layout {
    fn default() -> Self {
        Self::Overlay(OverlayLayout::default())
    }
}

impl Layout {
    /// A default overlay layout.
    #[must_use]
    pub fn overlay() -> Self {
        Self::default()
    }

    /// A left-to-right box layout.
    #[must_use]
    pub fn row() -> Self {
        Self::Box(BoxLayout::new(Axis::Horizontal))
    }

    /// A top-to-bottom box layout.
    #[must_use]
    pub fn column() -> Self {
        Self::Box(BoxLayout::new(Axis::Vertical))
    }

    /// A grid with `columns × rows` cells.
    #[must_use]
    pub fn grid(columns: usize, rows: usize) -> Self {
        Self::Grid(GridLayout::new(columns, rows))
    }

    /// The box layout, if this is one.
    #[must_use]
    pub fn as_box(&self) -> Option<&BoxLayout> {
        match self {
            Self::Box(b) => Some(b),
            _ => None,
        }
    }

    /// The grid layout, if this is one.
    #[must_use]
    pub fn as_grid(&self) -> Option<&GridLayout> {
        match self {
            Self::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn as_grid_mut(&mut self) -> Option<&mut GridLayout> {
        match self {
            Self::Grid(g) => Some(g),
            _ => None,
        }
    }
}

impl LayoutStrategy for Layout {
    fn aggregate_sizing(&self, children: &[Sizing]) -> Sizing {
        match self {
            Self::Overlay(l) => l.aggregate_sizing(children),
            Self::Box(l) => l.aggregate_sizing(children),
            Self::Grid(l) => l.aggregate_sizing(children),
        }
    }

    fn distribute(&self, children: &[Sizing], size: IntSize) -> Vec<IntRect> {
        match self {
            Self::Overlay(l) => l.distribute(children, size),
            Self::Box(l) => l.distribute(children, size),
            Self::Grid(l) => l.distribute(children, size),
        }
    }
}

/// Fits a child into the rectangle assigned to it, honoring its aspect-ratio limits.
///
/// A slot narrower than the minimum ratio or wider than the maximum ratio is
/// fitted to that limit. Otherwise a preferred ratio, if any, is fitted.
#[must_use]
pub fn place(slot: IntRect, sizing: &Sizing) -> IntRect {
    let Some(ratio) = slot.size.aspect_ratio() else {
        return slot;
    };
    if let Some(min) = sizing.minimum_aspect_ratio()
        && ratio < min
    {
        fit_to_aspect_ratio(slot, min)
    } else if let Some(max) = sizing.maximum_aspect_ratio()
        && ratio > max
    {
        fit_to_aspect_ratio(slot, max)
    } else if let Some(preferred) = sizing.preferred_aspect_ratio() {
        fit_to_aspect_ratio(slot, preferred)
    } else {
        slot
    }
}

/// Per-axis aggregation of a set of children.
///
/// `None` in an output field means unconstrained.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AxisSizing {
    pub(crate) minimum: Option<i32>,
    pub(crate) maximum: Option<i32>,
    pub(crate) preferred: Option<i32>,
}

impl AxisSizing {
    /// Children stacked on top of each other along `axis`.
    ///
    /// The minimum is the largest present minimum. The maximum is the
    /// smallest maximum, unconstrained if any child is unconstrained or there
    /// are no children. A maximum below its own minimum counts as unconstrained. The preferred extent is the largest, unconstrained if
    /// any child has none.
    pub(crate) fn overlap<'a>(axis: Axis, children: impl IntoIterator<Item = &'a Sizing>) -> Self {
        let mut out = Self::default();
        let mut any = false;
        let mut max_open = false;
        let mut pref_open = false;
        for s in children {
            any = true;
            if let Some(min) = s.minimum(axis) {
                out.minimum = Some(out.minimum.map_or(min, |m| m.max(min)));
            }
            match s.effective_maximum(axis) {
                Some(max) => out.maximum = Some(out.maximum.map_or(max, |m| m.min(max))),
                None => max_open = true,
            }
            match s.preferred(axis) {
                Some(p) => out.preferred = Some(out.preferred.map_or(p, |m| m.max(p))),
                None => pref_open = true,
            }
        }
        if !any || max_open {
            out.maximum = None;
        }
        if !any || pref_open {
            out.preferred = None;
        }
        out
    }

    /// Children laid end to end along `axis`.
    ///
    /// Minimums add up over the children that have one. Maximums and
    /// preferred extents add up, unconstrained if any child lacks one or
    /// there are no children. As in [`AxisSizing::overlap`], a maximum below
    /// its minimum is no maximum at all.
    pub(crate) fn sequence<'a>(axis: Axis, children: impl IntoIterator<Item = &'a Sizing>) -> Self {
        Self::sum(
            children
                .into_iter()
                .map(|s| Self {
                    minimum: s.minimum(axis),
                    maximum: s.effective_maximum(axis),
                    preferred: s.preferred(axis),
                }),
        )
    }

    /// Adds up already aggregated parts, such as the columns of a grid.
    pub(crate) fn sum(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut out = Self::default();
        let mut any = false;
        let mut max_open = false;
        let mut pref_open = false;
        for part in parts {
            any = true;
            if let Some(min) = part.minimum {
                out.minimum = Some(out.minimum.unwrap_or(0).saturating_add(min));
            }
            match part.maximum {
                Some(max) => out.maximum = Some(out.maximum.unwrap_or(0).saturating_add(max)),
                None => max_open = true,
            }
            match part.preferred {
                Some(p) => out.preferred = Some(out.preferred.unwrap_or(0).saturating_add(p)),
                None => pref_open = true,
            }
        }
        if !any || max_open {
            out.maximum = None;
        }
        if !any || pref_open {
            out.preferred = None;
        }
        out
    }

    /// Adds fixed space (margins and gaps) to every present value.
    ///
    /// The minimum becomes `extra` when no child had one, so that a container
    /// never measures smaller than its own margins.
    pub(crate) fn padded(self, extra: i32) -> Self {
        let minimum = match self.minimum {
            Some(min) => Some(min.saturating_add(extra)),
            None if extra > 0 => Some(extra),
            None => None,
        };
        Self {
            minimum,
            maximum: self.maximum.map(|m| m.saturating_add(extra)),
            preferred: self.preferred.map(|p| p.saturating_add(extra)),
        }
    }

    /// Writes this aggregate into `sizing` along `axis`.
    pub(crate) fn apply(self, sizing: Sizing, axis: Axis) -> Sizing {
        sizing
            .with_minimum(axis, self.minimum)
            .with_maximum(axis, self.maximum)
            .with_preferred(axis, self.preferred)
    }
}

/// Total gap between `count` items separated by `spacing`.
pub(crate) fn gaps(count: usize, spacing: i32) -> i32 {
    let n = i32::try_from(count.saturating_sub(1)).unwrap_or(i32::MAX);
    n.saturating_mul(spacing)
}
