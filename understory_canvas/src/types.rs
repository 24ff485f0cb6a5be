// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the canvas: node identifiers, flags, and alignment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier for a node in a [`crate::Canvas`] (generational).
///
/// A handle stays valid until its node is removed. Reusing the slot bumps the
/// generation, so stale handles are detected rather than aliasing a new node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling painting and picking.
    ///
    /// Invisible nodes are still laid out; they are only skipped by snapshots
    /// and hit testing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (painted and hit tested).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (returned from hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Placement of a child inside leftover space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Alignment {
    /// Leading edge: left or top.
    Start,
    /// Centered.
    #[default]
    Center,
    /// Trailing edge: right or bottom.
    End,
}

impl Alignment {
    /// Offset of an item of length `extent` inside `available`.
    ///
    /// Returns 0 when the item does not fit.
    #[must_use]
    pub const fn offset(self, available: i32, extent: i32) -> i32 {
        let slack = available - extent;
        if slack <= 0 {
            return 0;
        }
        match self {
            Self::Start => 0,
            Self::Center => slack / 2,
            Self::End => slack,
        }
    }
}
