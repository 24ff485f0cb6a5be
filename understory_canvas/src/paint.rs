// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting contract: the canvas supplies rectangles, the host draws.

use crate::geometry::IntRect;
use crate::snapshot::GeometrySnapshot;
use crate::types::NodeId;

/// Draws leaf items on behalf of a compositor.
///
/// `Context` is whatever drawing surface the host uses. The canvas never
/// looks inside it.
pub trait PaintDelegate {
    /// Host drawing surface.
    type Context;

    /// Paint `item` into `rect` (root space).
    fn paint_item(&mut self, ctx: &mut Self::Context, item: NodeId, rect: IntRect, is_selected: bool);

    /// Restrict drawing to `clip` until the matching [`PaintDelegate::pop_clip`].
    ///
    /// The default does nothing; leaves outside every clip are skipped anyway.
    fn push_clip(&mut self, ctx: &mut Self::Context, clip: IntRect) {
        let _ = (ctx, clip);
    }

    /// Undo the latest [`PaintDelegate::push_clip`].
    fn pop_clip(&mut self, ctx: &mut Self::Context) {
        let _ = ctx;
    }
}

impl GeometrySnapshot {
    /// Call `delegate` once per visible leaf, in paint order.
    ///
    /// Leaves clipped away entirely are skipped. Consecutive leaves sharing a
    /// clip are painted under one `push_clip`/`pop_clip` pair.
    pub fn paint<D: PaintDelegate>(
        &self,
        ctx: &mut D::Context,
        delegate: &mut D,
        is_selected: impl Fn(NodeId) -> bool,
    ) {
        let mut active: Option<IntRect> = None;
        for entry in self.leaves() {
            if entry.visible_rect().is_none() {
                continue;
            }
            if entry.clip != active {
                if active.is_some() {
                    delegate.pop_clip(ctx);
                }
                if let Some(clip) = entry.clip {
                    delegate.push_clip(ctx, clip);
                }
                active = entry.clip;
            }
            delegate.paint_item(ctx, entry.id, entry.rect, is_selected(entry.id));
        }
        if active.is_some() {
            delegate.pop_clip(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::geometry::{Axis, IntPoint, IntSize};
    use crate::sizing::Sizing;
    use crate::strategy::Layout;
    use crate::tree::Canvas;

    #[derive(Debug, PartialEq)]
    enum Op {
        Item(NodeId, IntRect, bool),
        Push(IntRect),
        Pop,
    }

    struct Recorder;

    impl PaintDelegate for Recorder {
        type Context = Vec<Op>;

        fn paint_item(&mut self, ctx: &mut Vec<Op>, item: NodeId, rect: IntRect, is_selected: bool) {
            ctx.push(Op::Item(item, rect, is_selected));
        }

        fn push_clip(&mut self, ctx: &mut Vec<Op>, clip: IntRect) {
            ctx.push(Op::Push(clip));
        }

        fn pop_clip(&mut self, ctx: &mut Vec<Op>) {
            ctx.push(Op::Pop);
        }
    }

    #[test]
    fn leaves_are_painted_in_order_under_their_clip() {
        let mut canvas = Canvas::new();
        let column = canvas.create_composition(Layout::column());
        let header = canvas.create_item(Sizing::default().with_fixed_height(10));
        let area = canvas.create_scroll_area();
        let body = canvas.create_item(Sizing::default().with_preferred_height(200));
        canvas.add_canvas_item(area, body).unwrap();
        canvas.add_canvas_item(column, header).unwrap();
        canvas.add_canvas_item(column, area).unwrap();
        canvas.update_layout(column, IntPoint::ZERO, IntSize::new(50, 60), true);

        let mut ops = Vec::new();
        canvas
            .snapshot(column)
            .paint(&mut ops, &mut Recorder, |id| id == body);
        let r = |x, y, w, h| IntRect::new(IntPoint::new(x, y), IntSize::new(w, h));
        assert_eq!(
            ops,
            [
                Op::Item(header, r(0, 0, 50, 10), false),
                Op::Push(r(0, 10, 50, 50)),
                Op::Item(body, r(0, 10, 50, 200), true),
                Op::Pop,
            ]
        );
    }

    #[test]
    fn fully_clipped_leaves_are_skipped() {
        let mut canvas = Canvas::new();
        let area = canvas.create_scroll_area();
        let bar = canvas.create_scroll_bar(area, Axis::Vertical).unwrap();
        let row = canvas.create_composition(Layout::row());
        let content = canvas.create_composition(Layout::column());
        let near = canvas.create_item(Sizing::default().with_fixed_height(40));
        let far = canvas.create_item(Sizing::default().with_fixed_height(40));
        canvas.add_canvas_item(content, near).unwrap();
        canvas.add_canvas_item(content, far).unwrap();
        canvas
            .update_sizing(content, Sizing::default().with_preferred_height(80))
            .unwrap();
        canvas.add_canvas_item(area, content).unwrap();
        canvas.add_canvas_item(row, area).unwrap();
        canvas.add_canvas_item(row, bar).unwrap();
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(36, 40), true);

        let mut ops = Vec::new();
        canvas
            .snapshot(row)
            .paint(&mut ops, &mut Recorder, |_| false);
        let painted: Vec<NodeId> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Item(id, ..) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(painted, [near, bar], "the far item is scrolled out of view");
    }
}
