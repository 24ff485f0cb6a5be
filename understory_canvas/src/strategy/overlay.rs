// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::{AxisSizing, LayoutStrategy, place};
use crate::geometry::{Axis, IntRect, IntSize, Margins};
use crate::sizing::Sizing;

/// Stacks every child over the full content area.
///
/// Spacing has no meaning here; only margins apply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayLayout {
    /// Space between the container edge and the children.
    pub margins: Margins,
}

impl OverlayLayout {
    /// Returns a copy with the margins replaced.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }
}

impl LayoutStrategy for OverlayLayout {
    fn aggregate_sizing(&self, children: &[Sizing]) -> Sizing {
        let active = || children.iter().filter(|s| !s.is_collapsed());
        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .fold(Sizing::default(), |sizing, axis| {
                AxisSizing::overlap(axis, active())
                    .padded(self.margins.along(axis))
                    .apply(sizing, axis)
            })
    }

    fn distribute(&self, children: &[Sizing], size: IntSize) -> Vec<IntRect> {
        let content = IntRect::from_size(size).inset(self.margins);
        children
            .iter()
            .map(|s| {
                if s.is_collapsed() {
                    IntRect::new(content.origin, IntSize::ZERO)
                } else {
                    place(content, s)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntPoint;

    #[test]
    fn children_cover_content_area() {
        let layout = OverlayLayout::default().with_margins(Margins::uniform(5));
        let rects = layout.distribute(
            &[Sizing::default(), Sizing::fixed(IntSize::new(10, 10))],
            IntSize::new(100, 60),
        );
        let content = IntRect::new(IntPoint::new(5, 5), IntSize::new(90, 50));
        assert_eq!(rects, [content, content], "overlay ignores child preferences");
    }

    #[test]
    fn aggregate_adds_margins_and_takes_largest_minimum() {
        let layout = OverlayLayout::default().with_margins(Margins::new(1, 2, 3, 4));
        let s = layout.aggregate_sizing(&[
            Sizing::default().with_minimum_width(10).with_maximum_height(50),
            Sizing::default().with_minimum_width(30).with_maximum_height(20),
        ]);
        assert_eq!(s.minimum_width(), Some(36));
        assert_eq!(s.minimum_height(), Some(4), "margins alone set a minimum");
        assert_eq!(s.maximum_height(), Some(24));
        assert_eq!(s.maximum_width(), None);
    }

    #[test]
    fn empty_overlay_is_unconstrained() {
        let s = OverlayLayout::default().aggregate_sizing(&[]);
        assert_eq!(s, Sizing::default());
    }
}
