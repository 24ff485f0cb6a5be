// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by structural edits of a [`crate::Canvas`].

use crate::strategy::GridCell;
use crate::types::NodeId;

/// Reasons a structural edit was rejected.
///
/// Layout, dragging and scrolling never fail; only edits that would leave the
/// tree inconsistent are refused.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The handle refers to a node that has been removed.
    #[error("node {0:?} is no longer alive")]
    StaleNode(NodeId),
    /// The node is not a composition and cannot hold children.
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    /// The child already has a parent.
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),
    /// Attaching the child would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    /// Insertion or lookup index beyond the child list.
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },
    /// The node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Node that was not found.
        child: NodeId,
    },
    /// The grid has no such cell.
    #[error("cell {0:?} is outside the grid")]
    CellOutOfRange(GridCell),
    /// Another child already occupies the cell.
    #[error("cell {0:?} is already occupied")]
    CellOccupied(GridCell),
    /// Every cell of the grid is occupied.
    #[error("grid has no free cell")]
    GridFull,
    /// A scroll area holds exactly one content node.
    #[error("scroll area {0:?} already has content")]
    ScrollAreaOccupied(NodeId),
    /// The node is not a splitter.
    #[error("node {0:?} is not a splitter")]
    NotASplitter(NodeId),
    /// The node is not a scroll area.
    #[error("node {0:?} is not a scroll area")]
    NotAScrollArea(NodeId),
    /// The node is not a scroll bar.
    #[error("node {0:?} is not a scroll bar")]
    NotAScrollBar(NodeId),
    /// Spacing and stretch items only make sense in a box layout.
    #[error("node {0:?} does not use a box layout")]
    SpacingUnsupported(NodeId),
    /// The number of splits must be one fewer than the number of panes.
    #[error("expected {expected} splits, got {actual}")]
    SplitCount {
        /// One fewer than the pane count.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// Split fractions must lie strictly between 0 and 1 and not decrease.
    #[error("split value {0} is outside (0, 1) or out of order")]
    SplitOutOfRange(f64),
    /// Unwrapping requires a container holding exactly one item.
    #[error("node {0:?} does not hold exactly one item")]
    NotSoleChild(NodeId),
}
