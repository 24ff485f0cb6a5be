// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_canvas --heading-base-level=0

//! Understory Canvas: a retained-mode canvas layout engine.
//!
//! Understory Canvas resolves a tree of rectangular nodes, each carrying declarative sizing
//! constraints, into integer pixel rectangles whenever the tree or the size of its root changes.
//!
//! - Leaves state minimum, maximum and preferred extents per axis plus optional aspect-ratio
//!   constraints with [`Sizing`].
//! - Compositions aggregate their children's sizing bottom-up and distribute their own
//!   rectangle top-down through a [`Layout`] strategy: overlay, row/column box, or grid.
//! - Splitters divide their extent into proportional panes that the user can drag apart,
//!   with snapping and a minimum pane extent enforced by cascading neighbours.
//! - Scroll areas show a viewport onto a single content node and map scroll offsets to and
//!   from scroll bar thumbs.
//!
//! ## Not a renderer
//!
//! This crate computes geometry only. Drawing is delegated: a [`GeometrySnapshot`] lists the
//! visible leaves in paint order and drives a host-supplied [`PaintDelegate`]. Pointer events
//! reach splitters and scroll bars through the `begin_drag`/`drag_to`/`end_drag` entry points
//! on [`Canvas`]; event routing is up to the host.
//!
//! ## API overview
//!
//! - [`Canvas`]: arena of nodes, structural edits, layout, hit testing and interaction.
//! - [`Sizing`]: per-node constraints, built with `with_*` methods.
//! - [`Layout`]: the strategy of a composition; see [`OverlayLayout`], [`BoxLayout`] and
//!   [`GridLayout`]. Custom code can call [`LayoutStrategy`] directly.
//! - [`solve`]: the box distribution algorithm over per-child [`Constraint`]s.
//! - [`Splitter`] and [`ScrollArea`]/[`ScrollBar`]: the interaction state machines, usable on
//!   their own as well as through [`Canvas`].
//! - [`CanvasConfig`]: minimum pane extent, snapping, hit tolerance, and scroll bar metrics.
//! - [`NodeId`]: generational handle of a node. [`NodeFlags`]: visibility and picking.
//!
//! Key operations:
//! - [`Canvas::create_item`] / [`Canvas::create_composition`] / [`Canvas::create_splitter`] /
//!   [`Canvas::create_scroll_area`] / [`Canvas::create_scroll_bar`] → [`NodeId`]
//! - [`Canvas::add_canvas_item`] / [`Canvas::insert_canvas_item`] /
//!   [`Canvas::add_canvas_item_at_cell`] / [`Canvas::remove_canvas_item`] /
//!   [`Canvas::replace_canvas_item`] / [`Canvas::wrap_canvas_item`] /
//!   [`Canvas::unwrap_canvas_item`]: structural edits, each followed by an automatic relayout.
//! - [`Canvas::add_spacing`] / [`Canvas::add_stretch`]: gaps and flexible space in a box.
//! - [`Canvas::update_sizing`] and [`Canvas::set_layout`].
//! - [`Canvas::update_layout`] places a root; [`Canvas::commit`] flushes deferred layout and
//!   returns [`Damage`].
//! - [`Canvas::canvas_rect`] / [`Canvas::root_rect`] read results;
//!   [`Canvas::canvas_items_at_point`] hit tests, innermost first.
//! - [`Canvas::splitter_begin_drag`] / [`Canvas::splitter_drag_to`] /
//!   [`Canvas::splitter_end_drag`] and the matching `scroll_bar_*` methods.
//! - [`Canvas::snapshot`] → [`GeometrySnapshot`], published across threads with
//!   `SnapshotCell` when the `std` feature is enabled.
//!
//! ## Example
//!
//! ```rust
//! use understory_canvas::{Axis, Canvas, IntPoint, IntSize, Sizing};
//!
//! let mut canvas = Canvas::new();
//! let splitter = canvas.create_splitter(Axis::Horizontal);
//! let sidebar = canvas.create_item(Sizing::default());
//! let editor = canvas.create_item(Sizing::default());
//! canvas.add_canvas_item(splitter, sidebar).unwrap();
//! canvas.add_canvas_item(splitter, editor).unwrap();
//! canvas.update_layout(splitter, IntPoint::ZERO, IntSize::new(640, 480), true);
//!
//! // Drag the boundary from the middle to three quarters.
//! assert!(canvas.splitter_begin_drag(splitter, IntPoint::new(320, 10)).unwrap());
//! canvas.splitter_drag_to(splitter, IntPoint::new(480, 10)).unwrap();
//! canvas.splitter_end_drag(splitter).unwrap();
//! assert_eq!(canvas.canvas_size(sidebar), Some(IntSize::new(480, 480)));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies and provides `SnapshotCell`.
//! - `libm`: `no_std` float support for [`kurbo`] conversions.
//! - `serde`: `Serialize`/`Deserialize` for geometry, sizing and configuration.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod config;
mod damage;
mod error;
mod geometry;
mod paint;
mod scroll;
mod sizing;
mod snapshot;
mod splitter;
mod strategy;
mod tree;
mod types;

pub use config::{CanvasConfig, ScrollBarConfig, SplitterConfig};
pub use damage::Damage;
pub use error::TreeError;
pub use geometry::{Axis, IntPoint, IntRect, IntSize, Margins, fit_to_aspect_ratio};
pub use paint::PaintDelegate;
pub use scroll::{
    ScrollArea, ScrollBar, ScrollBarHit, content_extent, offset_for_thumb_drag, thumb_geometry,
};
pub use sizing::{Constraint, Sizing};
#[cfg(feature = "std")]
pub use snapshot::SnapshotCell;
pub use snapshot::{GeometrySnapshot, PaintEntry};
pub use splitter::{Boundaries, Splits, Splitter};
pub use strategy::{
    BoxLayout, GridCell, GridLayout, Layout, LayoutStrategy, OverlayLayout, place, solve,
};
pub use tree::Canvas;
pub use types::{Alignment, NodeFlags, NodeId};
