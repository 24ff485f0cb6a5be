// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from commit.

use alloc::vec::Vec;

use crate::geometry::IntRect;

/// A batched set of changes derived from [`crate::Canvas::commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// Root-space rectangles that should be repainted: the old and new
    /// bounds of every node whose geometry changed.
    pub dirty_rects: Vec<IntRect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<IntRect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(&r)))
    }

    /// Returns true if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    pub(crate) fn push(&mut self, rect: IntRect) {
        if !rect.is_empty() && !self.dirty_rects.contains(&rect) {
            self.dirty_rects.push(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_pushed_rects() {
        let mut d = Damage::default();
        assert_eq!(d.union_rect(), None);
        d.push(IntRect::from_tlbr(0, 0, 10, 10));
        d.push(IntRect::from_tlbr(0, 0, 10, 10));
        d.push(IntRect::from_tlbr(20, 20, 30, 40));
        d.push(IntRect::ZERO);
        assert_eq!(d.dirty_rects.len(), 2, "duplicates and empty rects are dropped");
        assert_eq!(d.union_rect(), Some(IntRect::from_tlbr(0, 0, 30, 40)));
    }
}
