// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row and column layout.
//!
//! Children are solved along the main axis with [`solve`](super::solve) and
//! sized independently on the cross axis. Collapsed children take no space
//! and no gap is inserted next to them.

use alloc::vec::Vec;

use super::{AxisSizing, LayoutStrategy, gaps, place, solve};
use crate::geometry::{Axis, IntRect, IntSize, Margins};
use crate::sizing::{Constraint, Sizing};
use crate::types::Alignment;

/// Lays children out end to end along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoxLayout {
    /// Main axis: [`Axis::Horizontal`] for a row, [`Axis::Vertical`] for a column.
    pub axis: Axis,
    /// Space between the container edge and the children.
    pub margins: Margins,
    /// Gap between adjacent children.
    pub spacing: i32,
    /// Cross-axis placement of children narrower than the container.
    pub alignment: Alignment,
    /// Main-axis routing of leftover space among stretch items.
    ///
    /// With [`Alignment::Center`] stretches share it equally. With
    /// [`Alignment::Start`] the last stretch takes all of it, pushing content
    /// toward the start; [`Alignment::End`] gives it to the first stretch.
    pub stretch_alignment: Alignment,
}

impl BoxLayout {
    /// A box layout along `axis` with no margins or spacing.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            margins: Margins::ZERO,
            spacing: 0,
            alignment: Alignment::Center,
            stretch_alignment: Alignment::Center,
        }
    }

    /// Returns a copy with the margins replaced.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Returns a copy with the spacing replaced.
    #[must_use]
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Returns a copy with the cross-axis alignment replaced.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns a copy with the stretch alignment replaced.
    #[must_use]
    pub fn with_stretch_alignment(mut self, alignment: Alignment) -> Self {
        self.stretch_alignment = alignment;
        self
    }

    /// Main-axis slots for the children that are not collapsed, in order.
    ///
    /// `extent` is the content extent, margins already removed.
    pub(crate) fn main_slots(&self, active: &[&Sizing], extent: i32) -> Vec<i32> {
        let available = (extent - gaps(active.len(), self.spacing)).max(0);
        let constraints: Vec<Constraint> =
            active.iter().map(|s| s.constraint(self.axis)).collect();
        let mut slots = solve(&constraints, available);
        self.route_stretch_space(active, &constraints, &mut slots);
        slots
    }

    fn route_stretch_space(&self, active: &[&Sizing], constraints: &[Constraint], slots: &mut [i32]) {
        let stretches: Vec<usize> = active
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_spacer() && s.maximum(self.axis).is_none())
            .map(|(i, _)| i)
            .collect();
        let target = match self.stretch_alignment {
            Alignment::Center => return,
            Alignment::Start => stretches.last(),
            Alignment::End => stretches.first(),
        };
        let Some(&target) = target else {
            return;
        };
        let mut pool = 0;
        for &i in &stretches {
            pool += slots[i] - constraints[i].minimum;
            slots[i] = constraints[i].minimum;
        }
        slots[target] += pool;
    }

    /// Cross-axis extent and offset of a child inside `available`.
    pub(crate) fn cross_placement(&self, sizing: &Sizing, available: i32) -> (i32, i32) {
        let cross = self.axis.cross();
        let c = sizing.constraint(cross);
        let extent = c
            .clamp(c.preferred.unwrap_or(available))
            .min(available)
            .max(0);
        (self.alignment.offset(available, extent), extent)
    }
}

impl LayoutStrategy for BoxLayout {
    fn aggregate_sizing(&self, children: &[Sizing]) -> Sizing {
        let active: Vec<&Sizing> = children.iter().filter(|s| !s.is_collapsed()).collect();
        let main = AxisSizing::sequence(self.axis, active.iter().copied())
            .padded(self.margins.along(self.axis) + gaps(active.len(), self.spacing));
        let cross_axis = self.axis.cross();
        let cross = AxisSizing::overlap(
            cross_axis,
            active.iter().copied().filter(|s| !s.is_spacer()),
        )
        .padded(self.margins.along(cross_axis));
        cross.apply(main.apply(Sizing::default(), self.axis), cross_axis)
    }

    fn distribute(&self, children: &[Sizing], size: IntSize) -> Vec<IntRect> {
        let axis = self.axis;
        let content = IntRect::from_size(size).inset(self.margins);
        let main_start = axis.of_point(content.origin);
        let cross_start = axis.cross().of_point(content.origin);
        let cross_available = axis.cross().of_size(content.size);

        let active: Vec<&Sizing> = children.iter().filter(|s| !s.is_collapsed()).collect();
        let slots = self.main_slots(&active, axis.of_size(content.size));

        let mut rects = Vec::with_capacity(children.len());
        let mut cursor = main_start;
        let mut slot_iter = slots.into_iter();
        for sizing in children {
            if sizing.is_collapsed() {
                rects.push(IntRect::new(axis.point(cursor, cross_start), IntSize::ZERO));
                continue;
            }
            let slot = slot_iter.next().unwrap_or(0);
            let main_extent = slot.min(sizing.constraint(axis).maximum);
            let (offset, cross_extent) = self.cross_placement(sizing, cross_available);
            let rect = IntRect::new(
                axis.point(cursor, cross_start + offset),
                axis.size(main_extent, cross_extent),
            );
            rects.push(place(rect, sizing));
            cursor += slot + self.spacing;
        }
        rects
    }
}
