// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable geometry snapshots for painting and off-thread readers.
//!
//! A [`GeometrySnapshot`] freezes the root-space rectangle of every laid-out
//! node under a root, together with the visible leaves in paint order. The
//! layout thread builds one after [`Canvas::commit`] and hands it to readers;
//! readers never see a half-finished layout pass.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::geometry::{IntPoint, IntRect};
use crate::tree::Canvas;
use crate::types::NodeId;

/// A visible leaf in paint order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaintEntry {
    /// The item or scroll bar.
    pub id: NodeId,
    /// Root-space rectangle.
    pub rect: IntRect,
    /// Intersection of the enclosing scroll area viewports, if any.
    pub clip: Option<IntRect>,
}

impl PaintEntry {
    /// The part of the rectangle that survives clipping, if any.
    pub fn visible_rect(&self) -> Option<IntRect> {
        match self.clip {
            Some(clip) => self.rect.intersection(&clip),
            None => (!self.rect.is_empty()).then_some(self.rect),
        }
    }
}

/// Root-space geometry of a canvas subtree at one commit.
#[derive(Clone, Debug, Default)]
pub struct GeometrySnapshot {
    epoch: u64,
    rects: HashMap<NodeId, IntRect>,
    leaves: Vec<PaintEntry>,
}

impl GeometrySnapshot {
    /// The [`Canvas::epoch`] the snapshot was taken at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Root-space rectangle of a visible, laid-out node.
    pub fn rect(&self, id: NodeId) -> Option<IntRect> {
        self.rects.get(&id).copied()
    }

    /// Number of nodes with a rectangle.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns true if nothing was laid out.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Visible leaves in paint order (earlier entries are painted first).
    pub fn leaves(&self) -> &[PaintEntry] {
        &self.leaves
    }

    /// The topmost leaf whose visible part contains `point`.
    pub fn leaf_at(&self, point: IntPoint) -> Option<NodeId> {
        self.leaves
            .iter()
            .rev()
            .find(|entry| entry.visible_rect().is_some_and(|r| r.contains(point)))
            .map(|entry| entry.id)
    }
}

impl Canvas {
    /// Capture the geometry under `root`.
    ///
    /// Invisible subtrees and nodes that have not been laid out are left out.
    pub fn snapshot(&self, root: NodeId) -> GeometrySnapshot {
        let mut rects = HashMap::new();
        let mut leaves = Vec::new();
        self.visit_laid_out(root, |id, rect, clip, is_leaf| {
            rects.insert(id, rect);
            if is_leaf {
                leaves.push(PaintEntry { id, rect, clip });
            }
        });
        GeometrySnapshot {
            epoch: self.epoch(),
            rects,
            leaves,
        }
    }
}

#[cfg(feature = "std")]
pub use cell::SnapshotCell;

#[cfg(feature = "std")]
mod cell {
    use std::sync::{Arc, PoisonError, RwLock};

    use super::GeometrySnapshot;

    /// Single-writer, multi-reader publication point for snapshots.
    ///
    /// The layout thread calls [`SnapshotCell::publish`]; renderers call
    /// [`SnapshotCell::load`] and keep the returned `Arc` for as long as they
    /// paint. The lock is only held to swap or clone the pointer.
    #[derive(Debug, Default)]
    pub struct SnapshotCell {
        current: RwLock<Arc<GeometrySnapshot>>,
    }

    impl SnapshotCell {
        /// A cell holding `snapshot`.
        pub fn new(snapshot: GeometrySnapshot) -> Self {
            Self {
                current: RwLock::new(Arc::new(snapshot)),
            }
        }

        /// Replace the published snapshot.
        pub fn publish(&self, snapshot: GeometrySnapshot) {
            let next = Arc::new(snapshot);
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = next;
        }

        /// The most recently published snapshot.
        pub fn load(&self) -> Arc<GeometrySnapshot> {
            self.current
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, IntSize};
    use crate::sizing::Sizing;
    use crate::strategy::Layout;
    use crate::types::NodeFlags;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> IntRect {
        IntRect::new(IntPoint::new(x, y), IntSize::new(w, h))
    }

    #[test]
    fn leaves_in_paint_order_with_scroll_clip() {
        let mut canvas = Canvas::new();
        let row = canvas.create_composition(Layout::row());
        let label = canvas.create_item(Sizing::default().with_fixed_width(40));
        let area = canvas.create_scroll_area();
        let content = canvas.create_item(Sizing::default().with_preferred_height(300));
        let bar = canvas.create_scroll_bar(area, Axis::Vertical).unwrap();
        canvas.add_canvas_item(area, content).unwrap();
        canvas.add_canvas_item(row, label).unwrap();
        canvas.add_canvas_item(row, area).unwrap();
        canvas.add_canvas_item(row, bar).unwrap();
        canvas.update_layout(row, IntPoint::new(5, 5), IntSize::new(156, 100), true);
        canvas.scroll_by(area, IntPoint::new(0, -50)).unwrap();
        let _ = canvas.commit();

        let snapshot = canvas.snapshot(row);
        assert_eq!(snapshot.epoch(), 1);
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.rect(row), Some(rect(5, 5, 156, 100)));
        let ids: Vec<NodeId> = snapshot.leaves().iter().map(|e| e.id).collect();
        assert_eq!(ids, [label, content, bar]);

        let content_entry = snapshot.leaves()[1];
        assert_eq!(content_entry.rect, rect(45, -45, 100, 300));
        assert_eq!(content_entry.clip, Some(rect(45, 5, 100, 100)));
        assert_eq!(content_entry.visible_rect(), Some(rect(45, 5, 100, 100)));
        assert_eq!(snapshot.leaves()[0].clip, None);
        assert_eq!(snapshot.leaf_at(IntPoint::new(50, 10)), Some(content));
        assert_eq!(snapshot.leaf_at(IntPoint::new(150, 10)), Some(bar));
    }

    #[test]
    fn invisible_subtrees_are_left_out() {
        let mut canvas = Canvas::new();
        let row = canvas.create_composition(Layout::row());
        let a = canvas.create_item(Sizing::default());
        let b = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(row, a).unwrap();
        canvas.add_canvas_item(row, b).unwrap();
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(10, 10), true);
        canvas.set_flags(a, NodeFlags::PICKABLE);
        let snapshot = canvas.snapshot(row);
        assert_eq!(snapshot.rect(a), None);
        assert_eq!(snapshot.leaves().len(), 1);
        let unplaced = canvas.create_item(Sizing::default());
        assert!(canvas.snapshot(unplaced).is_empty());
    }

    #[cfg(feature = "std")]
    #[test]
    fn cell_swaps_whole_snapshots() {
        let mut canvas = Canvas::new();
        let root = canvas.create_item(Sizing::default());
        canvas.update_layout(root, IntPoint::ZERO, IntSize::new(4, 4), false);
        let cell = SnapshotCell::default();
        let before = cell.load();
        let _ = canvas.commit();
        cell.publish(canvas.snapshot(root));
        assert!(before.is_empty(), "readers keep the snapshot they loaded");
        assert_eq!(cell.load().rect(root), Some(rect(0, 0, 4, 4)));
        assert_eq!(cell.load().epoch(), 1);
    }
}
