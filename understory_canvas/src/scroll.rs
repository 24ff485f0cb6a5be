// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll areas and scroll bars.
//!
//! A [`ScrollArea`] shows one content node through a viewport. The content is
//! laid out at its natural size and moved by an offset that is never positive
//! and never scrolls past the end of the content.
//!
//! A [`ScrollBar`] maps that offset onto a thumb inside its track. Thumb
//! length is proportional to `viewport / content`, never shorter than
//! [`ScrollBarConfig::min_thumb_length`]. Dragging the thumb inverts the same
//! mapping, so the thumb ends up where the pointer put it.
//!
//! All arithmetic is integer; divisions round toward zero.

use crate::config::ScrollBarConfig;
use crate::geometry::{Axis, IntPoint, IntSize};
use crate::sizing::Sizing;
use crate::types::NodeId;

/// Scroll state of a viewport onto a single content node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollArea {
    offset: IntPoint,
    viewport: IntSize,
    content: IntSize,
}

impl ScrollArea {
    /// Content origin relative to the viewport. Both components are `<= 0`.
    #[must_use]
    pub const fn offset(&self) -> IntPoint {
        self.offset
    }

    /// Size of the visible region.
    #[must_use]
    pub const fn viewport_size(&self) -> IntSize {
        self.viewport
    }

    /// Natural size of the content.
    #[must_use]
    pub const fn content_size(&self) -> IntSize {
        self.content
    }

    /// How far the content can scroll on each axis, as a positive distance.
    #[must_use]
    pub fn scroll_range(&self) -> IntSize {
        IntSize::new(
            (self.content.width - self.viewport.width).max(0),
            (self.content.height - self.viewport.height).max(0),
        )
    }

    /// Moves the content to `offset`, clamped to the valid range.
    pub fn scroll_to(&mut self, offset: IntPoint) {
        let range = self.scroll_range();
        self.offset = IntPoint::new(
            offset.x.clamp(-range.width, 0),
            offset.y.clamp(-range.height, 0),
        );
    }

    /// Moves the content by `delta`, clamped to the valid range.
    pub fn scroll_by(&mut self, delta: IntPoint) {
        self.scroll_to(self.offset + delta);
    }

    /// Scroll position along `axis` in `[0, 1]`. 0 when there is nothing to scroll.
    #[must_use]
    pub fn scroll_fraction(&self, axis: Axis) -> f64 {
        let range = axis.of_size(self.scroll_range());
        if range == 0 {
            return 0.0;
        }
        -f64::from(axis.of_point(self.offset)) / f64::from(range)
    }

    /// Updates viewport and content sizes, keeping the scroll fraction.
    ///
    /// If there was nothing to scroll before, the offset is kept and clamped.
    pub fn resize(&mut self, viewport: IntSize, content: IntSize) {
        let old_range = self.scroll_range();
        self.viewport = viewport.non_negative();
        self.content = content.non_negative();
        let new_range = self.scroll_range();
        let rescale = |offset: i32, old: i32, new: i32| {
            if old == 0 {
                return offset;
            }
            let scaled = i64::from(offset) * i64::from(new) / i64::from(old);
            i32::try_from(scaled).unwrap_or(0)
        };
        let before = self.offset;
        self.scroll_to(IntPoint::new(
            rescale(before.x, old_range.width, new_range.width),
            rescale(before.y, old_range.height, new_range.height),
        ));
        if self.offset != before {
            tracing::trace!(
                from = ?before,
                to = ?self.offset,
                "scroll offset rescaled after resize"
            );
        }
    }
}

/// Natural extent of scroll content along `axis` inside a viewport of `viewport` pixels.
///
/// A preferred extent wins; otherwise the content fills the viewport. Either
/// way the result respects the content's minimum and maximum.
#[must_use]
pub fn content_extent(sizing: &Sizing, axis: Axis, viewport: i32) -> i32 {
    let c = sizing.constraint(axis);
    c.clamp(c.preferred.unwrap_or(viewport.max(0)))
}

/// Thumb `(position, length)` inside a track of `track` pixels.
///
/// Returns `(0, 0)` when the content fits in the viewport.
#[must_use]
pub fn thumb_geometry(
    track: i32,
    viewport: i32,
    content: i32,
    offset: i32,
    min_thumb_length: i32,
) -> (i32, i32) {
    if content <= viewport || track <= 0 {
        return (0, 0);
    }
    let proportional = i64::from(track) * i64::from(viewport) / i64::from(content);
    let length = i64::from(min_thumb_length)
        .max(proportional)
        .min(i64::from(track));
    let range = i64::from(content - viewport);
    let position = (i64::from(track) - length) * -i64::from(offset) / range;
    (
        i32::try_from(position).unwrap_or(0),
        i32::try_from(length).unwrap_or(track),
    )
}

/// Content offset after the thumb was dragged by `delta` pixels from `start_offset`.
///
/// Clamped to `[-(content - viewport), 0]`.
#[must_use]
pub fn offset_for_thumb_drag(
    track: i32,
    viewport: i32,
    content: i32,
    start_offset: i32,
    delta: i32,
    min_thumb_length: i32,
) -> i32 {
    let range = (content - viewport).max(0);
    let (_, length) = thumb_geometry(track, viewport, content, start_offset, min_thumb_length);
    let travel = i64::from(track - length);
    if range == 0 || travel <= 0 {
        return start_offset.clamp(-range, 0);
    }
    let relative = i64::from(range) * i64::from(delta) / travel;
    let relative = i32::try_from(relative).unwrap_or(if delta < 0 { i32::MIN } else { i32::MAX });
    start_offset.saturating_sub(relative).clamp(-range, 0)
}

/// What a press on a scroll bar landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollBarHit {
    /// The thumb; a drag has started.
    Thumb,
    /// The track before the thumb; the content scrolled back one page.
    PageBackward,
    /// The track after the thumb; the content scrolled forward one page.
    PageForward,
    /// Nothing to scroll, or the press was outside the track.
    None,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ThumbDrag {
    start_pointer: i32,
    start_offset: i32,
}

/// A scroll bar bound to a scroll area along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScrollBar {
    area: NodeId,
    axis: Axis,
    drag: Option<ThumbDrag>,
}

impl ScrollBar {
    pub(crate) const fn new(area: NodeId, axis: Axis) -> Self {
        Self {
            area,
            axis,
            drag: None,
        }
    }

    /// The scroll area this bar controls.
    #[must_use]
    pub const fn area(&self) -> NodeId {
        self.area
    }

    /// The axis the thumb moves along.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Returns true while the thumb is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Thumb `(position, length)` for `area` in a track of `track` pixels.
    #[must_use]
    pub fn thumb(&self, area: &ScrollArea, track: i32, config: &ScrollBarConfig) -> (i32, i32) {
        thumb_geometry(
            track,
            self.axis.of_size(area.viewport_size()),
            self.axis.of_size(area.content_size()),
            self.axis.of_point(area.offset()),
            config.min_thumb_length,
        )
    }

    /// Handles a press at `pointer` (along the axis, in track coordinates).
    ///
    /// A press on the thumb starts a drag. A press on the track pages the
    /// content one viewport toward the pointer.
    pub fn begin_drag(
        &mut self,
        area: &mut ScrollArea,
        track: i32,
        pointer: i32,
        config: &ScrollBarConfig,
    ) -> ScrollBarHit {
        self.drag = None;
        let (position, length) = self.thumb(area, track, config);
        if length == 0 || pointer < 0 || pointer >= track {
            return ScrollBarHit::None;
        }
        let page = self.axis.of_size(area.viewport_size());
        let offset = self.axis.of_point(area.offset());
        if pointer < position {
            area.scroll_to(self.axis.point(offset + page, self.axis.cross().of_point(area.offset())));
            tracing::debug!(axis = ?self.axis, "scroll bar paged backward");
            ScrollBarHit::PageBackward
        } else if pointer >= position + length {
            area.scroll_to(self.axis.point(offset - page, self.axis.cross().of_point(area.offset())));
            tracing::debug!(axis = ?self.axis, "scroll bar paged forward");
            ScrollBarHit::PageForward
        } else {
            tracing::debug!(axis = ?self.axis, pointer, "scroll bar drag started");
            self.drag = Some(ThumbDrag {
                start_pointer: pointer,
                start_offset: offset,
            });
            ScrollBarHit::Thumb
        }
    }

    /// Scrolls `area` so the thumb follows `pointer`.
    ///
    /// # Panics
    ///
    /// Panics if no thumb drag is in progress.
    pub fn drag_to(
        &self,
        area: &mut ScrollArea,
        track: i32,
        pointer: i32,
        config: &ScrollBarConfig,
    ) {
        let Some(drag) = self.drag else {
            panic!("ScrollBar::drag_to called while no drag is in progress");
        };
        let offset = offset_for_thumb_drag(
            track,
            self.axis.of_size(area.viewport_size()),
            self.axis.of_size(area.content_size()),
            drag.start_offset,
            pointer - drag.start_pointer,
            config.min_thumb_length,
        );
        let cross = self.axis.cross().of_point(area.offset());
        area.scroll_to(self.axis.point(offset, cross));
    }

    /// Finishes a thumb drag. Does nothing when idle.
    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            tracing::debug!(axis = ?self.axis, "scroll bar drag ended");
        }
    }
}
