// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core canvas implementation: structure, sizing, layout, queries, and interaction.

use alloc::{vec, vec::Vec};

use crate::config::CanvasConfig;
use crate::damage::Damage;
use crate::error::TreeError;
use crate::geometry::{Axis, IntPoint, IntRect, IntSize};
use crate::scroll::{ScrollArea, ScrollBar, ScrollBarHit, content_extent};
use crate::sizing::Sizing;
use crate::splitter::Splitter;
use crate::strategy::{BoxLayout, GridCell, Layout, LayoutStrategy};
use crate::types::{NodeFlags, NodeId};

/// An arena of canvas nodes and the layout engine that sizes them.
///
/// Nodes are created detached and attached to compositions with
/// [`Canvas::add_canvas_item`] and friends. Any node without a parent is a
/// root; give it a rectangle with [`Canvas::update_layout`] and every node
/// beneath it is laid out.
///
/// Structural edits (adding, removing, or replacing children, changing a
/// sizing) lay the affected part of the tree out again right away. The
/// refresh walks up from the edited node until it reaches an ancestor whose
/// measured sizing did not change, then lays out that ancestor's subtree.
///
/// Deferred layout requests made with `immediate = false` are flushed by
/// [`Canvas::commit`], which also returns the damage accumulated since the
/// previous commit.
///
/// ## Example
///
/// ```rust
/// use understory_canvas::{Canvas, IntPoint, IntRect, IntSize, Layout, Sizing};
///
/// let mut canvas = Canvas::new();
/// let row = canvas.create_composition(Layout::row());
/// let a = canvas.create_item(Sizing::default());
/// let b = canvas.create_item(Sizing::default().with_fixed_width(40));
/// canvas.add_canvas_item(row, a).unwrap();
/// canvas.add_canvas_item(row, b).unwrap();
///
/// canvas.update_layout(row, IntPoint::ZERO, IntSize::new(200, 30), true);
/// assert_eq!(canvas.canvas_rect(a), Some(IntRect::from_tlbr(0, 0, 30, 160)));
/// assert_eq!(canvas.canvas_rect(b), Some(IntRect::from_tlbr(0, 160, 30, 200)));
/// ```
pub struct Canvas {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
    config: CanvasConfig,
    damage: Damage,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Canvas")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
enum Interaction {
    Splitter(Splitter),
    ScrollArea(ScrollArea),
}

#[derive(Clone, Debug)]
struct Composition {
    layout: Layout,
    interaction: Option<Interaction>,
}

#[derive(Clone, Debug)]
enum NodeKind {
    Item,
    Composition(Composition),
    ScrollBar(ScrollBar),
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Explicit sizing. For compositions it overrides the aggregate.
    sizing: Sizing,
    /// Last measured sizing, used to stop refresh propagation.
    measured: Option<Sizing>,
    origin: Option<IntPoint>,
    size: Option<IntSize>,
    flags: NodeFlags,
    dirty: bool,
    kind: NodeKind,
}

impl Node {
    fn new(generation: u32, sizing: Sizing, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            sizing,
            measured: None,
            origin: None,
            size: None,
            flags: NodeFlags::default(),
            dirty: false,
            kind,
        }
    }

    fn composition(&self) -> Option<&Composition> {
        match &self.kind {
            NodeKind::Composition(c) => Some(c),
            _ => None,
        }
    }

    fn composition_mut(&mut self) -> Option<&mut Composition> {
        match &mut self.kind {
            NodeKind::Composition(c) => Some(c),
            _ => None,
        }
    }

    fn splitter_mut(&mut self) -> Option<&mut Splitter> {
        match self.composition_mut()?.interaction.as_mut()? {
            Interaction::Splitter(s) => Some(s),
            Interaction::ScrollArea(_) => None,
        }
    }

    fn scroll_area(&self) -> Option<&ScrollArea> {
        match self.composition()?.interaction.as_ref()? {
            Interaction::ScrollArea(a) => Some(a),
            Interaction::Splitter(_) => None,
        }
    }

    fn scroll_area_mut(&mut self) -> Option<&mut ScrollArea> {
        match self.composition_mut()?.interaction.as_mut()? {
            Interaction::ScrollArea(a) => Some(a),
            Interaction::Splitter(_) => None,
        }
    }

    fn local_rect(&self) -> Option<IntRect> {
        Some(IntRect::new(self.origin?, self.size?))
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create an empty canvas with the given configuration.
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            config,
            damage: Damage::default(),
        }
    }

    /// The configuration shared by every node.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Number of completed [`Canvas::commit`] calls.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // --- creation ---

    fn insert_node(&mut self, sizing: Sizing, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, sizing, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, sizing, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a detached leaf item with the given sizing.
    pub fn create_item(&mut self, sizing: Sizing) -> NodeId {
        self.insert_node(sizing, NodeKind::Item)
    }

    /// Create a detached, empty composition using `layout`.
    pub fn create_composition(&mut self, layout: Layout) -> NodeId {
        self.insert_node(
            Sizing::default(),
            NodeKind::Composition(Composition {
                layout,
                interaction: None,
            }),
        )
    }

    /// Create a detached splitter along `axis`. Each child becomes a pane.
    pub fn create_splitter(&mut self, axis: Axis) -> NodeId {
        self.insert_node(
            Sizing::default(),
            NodeKind::Composition(Composition {
                layout: Layout::Box(BoxLayout::new(axis)),
                interaction: Some(Interaction::Splitter(Splitter::new(axis))),
            }),
        )
    }

    /// Create a detached scroll area. It accepts a single content child.
    pub fn create_scroll_area(&mut self) -> NodeId {
        self.insert_node(
            Sizing::default(),
            NodeKind::Composition(Composition {
                layout: Layout::default(),
                interaction: Some(Interaction::ScrollArea(ScrollArea::default())),
            }),
        )
    }

    /// Create a detached scroll bar controlling `area` along `axis`.
    ///
    /// The bar is fixed to [`ScrollBarConfig::thickness`](crate::ScrollBarConfig::thickness)
    /// across its axis and free along it.
    pub fn create_scroll_bar(&mut self, area: NodeId, axis: Axis) -> Result<NodeId, TreeError> {
        self.alive(area)?;
        if self.node(area).scroll_area().is_none() {
            return Err(TreeError::NotAScrollArea(area));
        }
        let sizing = Sizing::default().with_fixed(axis.cross(), self.config.scroll_bar.thickness);
        Ok(self.insert_node(sizing, NodeKind::ScrollBar(ScrollBar::new(area, axis))))
    }

    // --- structure ---

    /// Remove a node and its whole subtree.
    ///
    /// If the node had a parent, the parent is laid out again immediately.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(rect) = self.root_rect(id) {
            self.damage.push(rect);
        }
        let parent = self.node(id).parent;
        if let Some(parent) = parent {
            self.detach(parent, id);
        }
        self.destroy(id);
        tracing::debug!(?id, ?parent, "removed canvas node");
        if let Some(parent) = parent {
            self.refresh(parent);
        }
    }

    /// Append `child` to `parent`.
    ///
    /// Grid parents place the child in their first free cell.
    pub fn add_canvas_item(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.children_of(parent).len();
        self.insert_canvas_item(parent, index, child)
    }

    /// Insert `child` into `parent` before position `index`.
    pub fn insert_canvas_item(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.attach(parent, index, child, None)
    }

    /// Append `child` to a grid `parent` at `cell`.
    pub fn add_canvas_item_at_cell(
        &mut self,
        parent: NodeId,
        child: NodeId,
        cell: GridCell,
    ) -> Result<(), TreeError> {
        let index = self.children_of(parent).len();
        self.attach(parent, index, child, Some(cell))
    }

    /// Detach `child` from `parent` and destroy it.
    pub fn remove_canvas_item(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.child_index(parent, child)?;
        self.remove(child);
        Ok(())
    }

    /// Put `new` where `old` is and destroy `old`.
    ///
    /// The new child inherits the old one's grid cell or splitter pane.
    pub fn replace_canvas_item(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let index = self.child_index(parent, old)?;
        self.check_attachable(parent, new)?;
        if let Some(rect) = self.root_rect(old) {
            self.damage.push(rect);
        }
        self.node_mut(parent).children[index] = new;
        self.node_mut(new).parent = Some(parent);
        self.node_mut(old).parent = None;
        self.destroy(old);
        self.refresh(parent);
        Ok(())
    }

    /// Put the detached composition `wrapper` where `child` is, then add `child` to it.
    pub fn wrap_canvas_item(
        &mut self,
        parent: NodeId,
        child: NodeId,
        wrapper: NodeId,
    ) -> Result<(), TreeError> {
        let index = self.child_index(parent, child)?;
        self.check_attachable(parent, wrapper)?;
        let cell = self.plan_insert(wrapper, self.children_of(wrapper).len(), None)?;
        self.node_mut(parent).children[index] = wrapper;
        self.node_mut(wrapper).parent = Some(parent);
        self.node_mut(child).parent = None;
        let at = self.children_of(wrapper).len();
        self.link(wrapper, at, child, cell);
        self.refresh(parent);
        Ok(())
    }

    /// Replace `wrapper`, which must hold exactly one item, with that item.
    ///
    /// The wrapper is destroyed. Returns the item that took its place.
    pub fn unwrap_canvas_item(
        &mut self,
        parent: NodeId,
        wrapper: NodeId,
    ) -> Result<NodeId, TreeError> {
        let index = self.child_index(parent, wrapper)?;
        let &[child] = self.children_of(wrapper) else {
            return Err(TreeError::NotSoleChild(wrapper));
        };
        self.detach(wrapper, child);
        self.node_mut(parent).children[index] = child;
        self.node_mut(child).parent = Some(parent);
        self.node_mut(wrapper).parent = None;
        self.destroy(wrapper);
        self.refresh(parent);
        Ok(child)
    }

    /// Append a fixed gap of `px` pixels to a box composition.
    pub fn add_spacing(&mut self, parent: NodeId, px: i32) -> Result<NodeId, TreeError> {
        let index = self.children_of(parent).len();
        self.insert_spacing(parent, index, px)
    }

    /// Insert a fixed gap of `px` pixels into a box composition.
    pub fn insert_spacing(
        &mut self,
        parent: NodeId,
        index: usize,
        px: i32,
    ) -> Result<NodeId, TreeError> {
        let axis = self.box_axis(parent)?;
        self.insert_spacer(parent, index, Sizing::spacing(axis, px))
    }

    /// Append a stretch, which absorbs leftover space, to a box composition.
    pub fn add_stretch(&mut self, parent: NodeId) -> Result<NodeId, TreeError> {
        let index = self.children_of(parent).len();
        self.insert_stretch(parent, index)
    }

    /// Insert a stretch into a box composition.
    pub fn insert_stretch(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let axis = self.box_axis(parent)?;
        self.insert_spacer(parent, index, Sizing::stretch(axis))
    }

    fn insert_spacer(
        &mut self,
        parent: NodeId,
        index: usize,
        sizing: Sizing,
    ) -> Result<NodeId, TreeError> {
        let spacer = self.create_item(sizing);
        if let Err(e) = self.insert_canvas_item(parent, index, spacer) {
            self.destroy(spacer);
            return Err(e);
        }
        Ok(spacer)
    }

    fn box_axis(&self, parent: NodeId) -> Result<Axis, TreeError> {
        self.alive(parent)?;
        let node = self.node(parent);
        let Some(composition) = node.composition() else {
            return Err(TreeError::NotAContainer(parent));
        };
        match (&composition.layout, &composition.interaction) {
            (Layout::Box(b), None) => Ok(b.axis),
            _ => Err(TreeError::SpacingUnsupported(parent)),
        }
    }

    /// Replace a node's explicit sizing and lay out whatever it affects.
    pub fn update_sizing(&mut self, id: NodeId, sizing: Sizing) -> Result<(), TreeError> {
        self.alive(id)?;
        if self.node(id).sizing == sizing {
            return Ok(());
        }
        self.node_mut(id).sizing = sizing;
        self.refresh(id);
        Ok(())
    }

    /// Replace the layout strategy of a plain composition.
    ///
    /// Switching to a grid assigns existing children to cells in row-major order.
    pub fn set_layout(&mut self, id: NodeId, mut layout: Layout) -> Result<(), TreeError> {
        self.alive(id)?;
        let count = self.children_of(id).len();
        match self.node(id).composition() {
            Some(c) if c.interaction.is_none() => {}
            _ => return Err(TreeError::NotAContainer(id)),
        }
        if let Some(grid) = layout.as_grid_mut() {
            grid.clear_cells();
            for index in 0..count {
                let cell = grid.first_free_cell().ok_or(TreeError::GridFull)?;
                grid.insert_cell(index, cell);
            }
        }
        if let Some(c) = self.node_mut(id).composition_mut() {
            c.layout = layout;
        }
        self.refresh(id);
        Ok(())
    }

    fn attach(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
        cell: Option<GridCell>,
    ) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        let cell = self.plan_insert(parent, index, cell)?;
        self.link(parent, index, child, cell);
        self.refresh(parent);
        Ok(())
    }

    /// Validates that `child` may become a child of `parent`.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.alive(parent)?;
        self.alive(child)?;
        if self.node(child).parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(TreeError::Cycle { parent, child });
            }
            current = self.node(id).parent;
        }
        Ok(())
    }

    /// Validates an insertion at `index` and picks the grid cell, if any.
    fn plan_insert(
        &self,
        parent: NodeId,
        index: usize,
        cell: Option<GridCell>,
    ) -> Result<Option<GridCell>, TreeError> {
        self.alive(parent)?;
        let node = self.node(parent);
        let Some(composition) = node.composition() else {
            return Err(TreeError::NotAContainer(parent));
        };
        let len = node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        if let Some(Interaction::ScrollArea(_)) = composition.interaction
            && len > 0
        {
            return Err(TreeError::ScrollAreaOccupied(parent));
        }
        match (&composition.layout, cell) {
            (Layout::Grid(grid), Some(cell)) => {
                if !grid.contains(cell) {
                    Err(TreeError::CellOutOfRange(cell))
                } else if grid.is_occupied(cell) {
                    Err(TreeError::CellOccupied(cell))
                } else {
                    Ok(Some(cell))
                }
            }
            (Layout::Grid(grid), None) => grid.first_free_cell().map(Some).ok_or(TreeError::GridFull),
            (_, Some(cell)) => Err(TreeError::CellOutOfRange(cell)),
            (_, None) => Ok(None),
        }
    }

    fn link(&mut self, parent: NodeId, index: usize, child: NodeId, cell: Option<GridCell>) {
        let parent_node = self.node_mut(parent);
        parent_node.children.insert(index, child);
        if let Some(c) = parent_node.composition_mut() {
            if let (Some(cell), Some(grid)) = (cell, c.layout.as_grid_mut()) {
                grid.insert_cell(index, cell);
            }
            if let Some(Interaction::Splitter(s)) = &mut c.interaction {
                s.insert_pane(index);
            }
        }
        self.node_mut(child).parent = Some(parent);
    }

    /// Unlinks `child` from `parent`, dropping its grid cell or splitter pane.
    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let parent_node = self.node_mut(parent);
        let Some(index) = parent_node.children.iter().position(|c| *c == child) else {
            return;
        };
        parent_node.children.remove(index);
        if let Some(c) = parent_node.composition_mut() {
            if let Some(grid) = c.layout.as_grid_mut() {
                grid.remove_cell(index);
            }
            if let Some(Interaction::Splitter(s)) = &mut c.interaction {
                s.remove_pane(index);
            }
        }
        self.node_mut(child).parent = None;
    }

    /// Frees `id` and its subtree without touching its parent.
    fn destroy(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            stack.extend_from_slice(&self.node(id).children);
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        self.alive(parent)?;
        self.alive(child)?;
        self.node(parent)
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    // --- sizing ---

    /// The explicit sizing of a node, as last set.
    pub fn sizing(&self, id: NodeId) -> Option<Sizing> {
        self.is_alive(id).then(|| self.node(id).sizing)
    }

    /// The effective sizing of a node.
    ///
    /// Leaves report their own sizing. Compositions aggregate their children
    /// through their layout strategy, then apply their own explicit fields on
    /// top. A collapsible composition without visible content measures as zero.
    pub fn measure_sizing(&self, id: NodeId) -> Option<Sizing> {
        self.is_alive(id).then(|| self.measure(id))
    }

    fn measure(&self, id: NodeId) -> Sizing {
        let node = self.node(id);
        let Some(composition) = node.composition() else {
            return node.sizing;
        };
        let children: Vec<Sizing> = node.children.iter().map(|&c| self.measure(c)).collect();
        if node.sizing.collapsible() && children.iter().all(Sizing::is_collapsed) {
            return Sizing::fixed(IntSize::ZERO).with_collapsible(true);
        }
        let aggregate = match &composition.interaction {
            Some(Interaction::ScrollArea(_)) => Sizing::default(),
            Some(Interaction::Splitter(s)) => s.aggregate_sizing(&children, &self.config.splitter),
            None => composition.layout.aggregate_sizing(&children),
        };
        node.sizing.or(aggregate)
    }

    /// Re-measures from `start` upward and lays out the first ancestor that
    /// absorbs the change.
    fn refresh(&mut self, start: NodeId) {
        let mut id = start;
        loop {
            let sizing = self.measure(id);
            let node = self.node_mut(id);
            let changed = node.measured != Some(sizing);
            node.measured = Some(sizing);
            match node.parent {
                Some(parent) if changed => id = parent,
                _ => break,
            }
        }
        tracing::debug!(?start, absorbed_by = ?id, "canvas refresh");
        self.layout_subtree(id);
    }

    // --- layout ---

    /// Assign `origin` (relative to the parent) and `size` to a node.
    ///
    /// With `immediate`, the node's subtree is laid out before returning.
    /// Otherwise the node is marked dirty and laid out on the next
    /// [`Canvas::commit`].
    pub fn update_layout(&mut self, id: NodeId, origin: IntPoint, size: IntSize, immediate: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.origin = Some(origin);
        node.size = Some(size.non_negative());
        if immediate {
            tracing::debug!(?id, ?origin, ?size, "immediate layout");
            self.layout_subtree(id);
        } else {
            node.dirty = true;
        }
    }

    /// Lay out every dirty node and return the damage since the last commit.
    pub fn commit(&mut self) -> Damage {
        let dirty: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.dirty =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId stores 32-bit slot indices."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();
        tracing::debug!(dirty = dirty.len(), epoch = self.epoch, "canvas commit");
        for id in dirty {
            if self.node(id).dirty {
                self.layout_subtree(id);
            }
        }
        self.epoch += 1;
        core::mem::take(&mut self.damage)
    }

    fn layout_subtree(&mut self, root: NodeId) {
        let base = self
            .node(root)
            .parent
            .and_then(|p| self.root_rect(p))
            .map_or(IntPoint::ZERO, |r| r.origin);
        let before = self.subtree_rects(root, base);

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id);
            node.dirty = false;
            let Some(size) = node.size else {
                continue;
            };
            if node.composition().is_none() {
                continue;
            }
            let children = node.children.clone();
            let sizings: Vec<Sizing> = children.iter().map(|&c| self.measure(c)).collect();
            let rects = self.distribute(id, &sizings, size);
            for ((&child, rect), sizing) in children.iter().zip(rects).zip(sizings) {
                let c = self.node_mut(child);
                c.origin = Some(rect.origin);
                c.size = Some(rect.size.non_negative());
                c.measured = Some(sizing);
                stack.push(child);
            }
        }

        let after = self.subtree_rects(root, base);
        for (old, new) in before.into_iter().zip(after) {
            if old != new {
                if let Some(r) = old {
                    self.damage.push(r);
                }
                if let Some(r) = new {
                    self.damage.push(r);
                }
            }
        }
    }

    fn distribute(&mut self, id: NodeId, sizings: &[Sizing], size: IntSize) -> Vec<IntRect> {
        let Some(composition) = self.node_mut(id).composition_mut() else {
            return Vec::new();
        };
        match &mut composition.interaction {
            Some(Interaction::Splitter(s)) => s.distribute(sizings, size),
            Some(Interaction::ScrollArea(area)) => sizings
                .first()
                .map(|content| {
                    let natural = IntSize::new(
                        content_extent(content, Axis::Horizontal, size.width),
                        content_extent(content, Axis::Vertical, size.height),
                    );
                    area.resize(size, natural);
                    vec![IntRect::new(area.offset(), natural)]
                })
                .unwrap_or_default(),
            None => composition.layout.distribute(sizings, size),
        }
    }

    /// Root-space rectangles of a subtree in depth-first order. `base` is the
    /// root-space origin of the subtree root's parent.
    fn subtree_rects(&self, root: NodeId, base: IntPoint) -> Vec<Option<IntRect>> {
        let mut out = Vec::new();
        let mut stack = vec![(root, base)];
        while let Some((id, base)) = stack.pop() {
            let node = self.node(id);
            let rect = node.local_rect().map(|r| r.translate(base));
            out.push(rect);
            let child_base = rect.map_or(base, |r| r.origin);
            for &child in node.children.iter().rev() {
                stack.push((child, child_base));
            }
        }
        out
    }

    // --- geometry queries ---

    /// Origin relative to the parent, once laid out.
    pub fn canvas_origin(&self, id: NodeId) -> Option<IntPoint> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).origin
    }

    /// Assigned size, once laid out.
    pub fn canvas_size(&self, id: NodeId) -> Option<IntSize> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).size
    }

    /// Rectangle relative to the parent, once laid out.
    pub fn canvas_rect(&self, id: NodeId) -> Option<IntRect> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).local_rect()
    }

    /// Rectangle in the node's own coordinates: the origin is always zero.
    pub fn canvas_bounds(&self, id: NodeId) -> Option<IntRect> {
        self.canvas_size(id).map(IntRect::from_size)
    }

    /// Rectangle in the coordinates of the node's root.
    pub fn root_rect(&self, id: NodeId) -> Option<IntRect> {
        if !self.is_alive(id) {
            return None;
        }
        let mut rect = self.node(id).local_rect()?;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            let node = self.node(parent);
            rect = rect.translate(node.origin?);
            current = node.parent;
        }
        Some(rect)
    }

    // --- hit testing ---

    /// All nodes under `point`, innermost first, ending with `id` itself.
    ///
    /// `point` is in `id`'s own coordinates. Later children are checked
    /// before earlier ones. Invisible subtrees are skipped and nodes without
    /// [`NodeFlags::PICKABLE`] are left out of the result. Near a splitter
    /// boundary only the splitter is reported.
    pub fn canvas_items_at_point(&self, id: NodeId, point: IntPoint) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.is_alive(id) {
            self.collect_items_at(id, point, &mut out);
        }
        out
    }

    /// The innermost node under `point`, if any.
    pub fn canvas_item_at_point(&self, id: NodeId, point: IntPoint) -> Option<NodeId> {
        self.canvas_items_at_point(id, point).first().copied()
    }

    fn collect_items_at(&self, id: NodeId, point: IntPoint, out: &mut Vec<NodeId>) {
        let node = self.node(id);
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        let Some(size) = node.size else {
            return;
        };
        if !IntRect::from_size(size).contains(point) {
            return;
        }
        let pickable = node.flags.contains(NodeFlags::PICKABLE);
        if let Some(Composition {
            interaction: Some(Interaction::Splitter(s)),
            ..
        }) = node.composition()
            && s
                .boundary_at(s.axis().of_point(point), self.config.splitter.hit_tolerance)
                .is_some()
        {
            if pickable {
                out.push(id);
            }
            return;
        }
        for &child in node.children.iter().rev() {
            if let Some(origin) = self.node(child).origin {
                self.collect_items_at(child, point - origin, out);
            }
        }
        if pickable {
            out.push(id);
        }
    }

    // --- accessors ---

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    /// The layout strategy of a composition.
    pub fn layout_of(&self, id: NodeId) -> Option<&Layout> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).composition().map(|c| &c.layout)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.node(id).flags)
    }

    /// Update node flags. Visibility changes damage the node's rectangle.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.flags == flags {
            return;
        }
        let visibility_changed =
            node.flags.contains(NodeFlags::VISIBLE) != flags.contains(NodeFlags::VISIBLE);
        node.flags = flags;
        if visibility_changed && let Some(rect) = self.root_rect(id) {
            self.damage.push(rect);
        }
    }

    // --- splitters ---

    fn splitter_mut(&mut self, id: NodeId) -> Result<&mut Splitter, TreeError> {
        self.alive(id)?;
        self.node_mut(id)
            .splitter_mut()
            .ok_or(TreeError::NotASplitter(id))
    }

    /// The cumulative boundary fractions of a splitter.
    pub fn splits(&self, id: NodeId) -> Option<&[f64]> {
        if !self.is_alive(id) {
            return None;
        }
        match &self.node(id).composition()?.interaction {
            Some(Interaction::Splitter(s)) => Some(s.splits()),
            _ => None,
        }
    }

    /// Replace a splitter's boundary fractions and lay its panes out again.
    pub fn set_splits(&mut self, id: NodeId, splits: &[f64]) -> Result<(), TreeError> {
        self.splitter_mut(id)?.set_splits(splits)?;
        self.layout_subtree(id);
        Ok(())
    }

    /// Replace a splitter's per-pane fractions and lay its panes out again.
    pub fn set_pane_fractions(&mut self, id: NodeId, fractions: &[f64]) -> Result<(), TreeError> {
        self.splitter_mut(id)?.set_pane_fractions(fractions)?;
        self.layout_subtree(id);
        Ok(())
    }

    /// Press at `point` (splitter coordinates). Starts a drag and returns
    /// true if the point is on a boundary.
    pub fn splitter_begin_drag(&mut self, id: NodeId, point: IntPoint) -> Result<bool, TreeError> {
        let tolerance = self.config.splitter.hit_tolerance;
        let splitter = self.splitter_mut(id)?;
        let position = splitter.axis().of_point(point);
        match splitter.boundary_at(position, tolerance) {
            Some(boundary) => {
                splitter.begin_drag(boundary, position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move the dragged boundary to follow `point` and lay the panes out.
    ///
    /// # Panics
    ///
    /// Panics if the splitter is not being dragged.
    pub fn splitter_drag_to(&mut self, id: NodeId, point: IntPoint) -> Result<(), TreeError> {
        self.alive(id)?;
        let Some(splitter) = self.nodes[id.idx()]
            .as_mut()
            .and_then(Node::splitter_mut)
        else {
            return Err(TreeError::NotASplitter(id));
        };
        let position = splitter.axis().of_point(point);
        splitter.drag_to(position, &self.config.splitter);
        self.layout_subtree(id);
        Ok(())
    }

    /// Finish a splitter drag. Does nothing when idle.
    pub fn splitter_end_drag(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.splitter_mut(id)?.end_drag();
        Ok(())
    }

    // --- scrolling ---

    /// Current content offset of a scroll area. Both components are `<= 0`.
    pub fn scroll_offset(&self, id: NodeId) -> Option<IntPoint> {
        if !self.is_alive(id) {
            return None;
        }
        self.node(id).scroll_area().map(ScrollArea::offset)
    }

    /// Scroll the content of `id` to `offset`, clamped to the valid range.
    pub fn scroll_to(&mut self, id: NodeId, offset: IntPoint) -> Result<(), TreeError> {
        let mut area = self.scroll_area_state(id)?;
        area.scroll_to(offset);
        self.store_scroll_area(id, area);
        Ok(())
    }

    /// Scroll the content of `id` by `delta`, clamped to the valid range.
    pub fn scroll_by(&mut self, id: NodeId, delta: IntPoint) -> Result<(), TreeError> {
        let mut area = self.scroll_area_state(id)?;
        area.scroll_by(delta);
        self.store_scroll_area(id, area);
        Ok(())
    }

    fn scroll_area_state(&self, id: NodeId) -> Result<ScrollArea, TreeError> {
        self.alive(id)?;
        self.node(id)
            .scroll_area()
            .copied()
            .ok_or(TreeError::NotAScrollArea(id))
    }

    /// Writes back scroll state and moves the content to match.
    fn store_scroll_area(&mut self, id: NodeId, area: ScrollArea) {
        let node = self.node_mut(id);
        let Some(state) = node.scroll_area_mut() else {
            return;
        };
        if *state == area {
            return;
        }
        *state = area;
        if let Some(&content) = node.children.first() {
            self.node_mut(content).origin = Some(area.offset());
        }
        if let Some(rect) = self.root_rect(id) {
            self.damage.push(rect);
        }
        let bars: Vec<NodeId> = self.scroll_bars_of(id).collect();
        for bar in bars {
            if let Some(rect) = self.root_rect(bar) {
                self.damage.push(rect);
            }
        }
    }

    fn scroll_bars_of(&self, area: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(move |(i, n)| match n {
            Some(Node {
                generation,
                kind: NodeKind::ScrollBar(bar),
                ..
            }) if bar.area() == area =>
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId stores 32-bit slot indices."
                )]
                Some(NodeId::new(i as u32, *generation))
            }
            _ => None,
        })
    }

    /// Scroll bar state plus its track length and the state of its area.
    fn scroll_bar_parts(&self, id: NodeId) -> Result<(ScrollBar, i32, ScrollArea), TreeError> {
        self.alive(id)?;
        let node = self.node(id);
        let NodeKind::ScrollBar(bar) = node.kind else {
            return Err(TreeError::NotAScrollBar(id));
        };
        let track = bar.axis().of_size(node.size.unwrap_or_default());
        let area = self.scroll_area_state(bar.area())?;
        Ok((bar, track, area))
    }

    /// Thumb rectangle in the scroll bar's own coordinates.
    ///
    /// The thumb has zero length when the content fits in the viewport.
    /// Returns `None` for stale ids, non-bars, and bars whose area is gone.
    pub fn scroll_bar_thumb_rect(&self, id: NodeId) -> Option<IntRect> {
        let (bar, track, area) = self.scroll_bar_parts(id).ok()?;
        let (position, length) = bar.thumb(&area, track, &self.config.scroll_bar);
        let cross = bar.axis().cross().of_size(self.node(id).size.unwrap_or_default());
        Some(IntRect::new(
            bar.axis().point(position, 0),
            bar.axis().size(length, cross),
        ))
    }

    /// Press on a scroll bar at `point` (bar coordinates).
    pub fn scroll_bar_begin_drag(
        &mut self,
        id: NodeId,
        point: IntPoint,
    ) -> Result<ScrollBarHit, TreeError> {
        let (mut bar, track, mut area) = self.scroll_bar_parts(id)?;
        let hit = bar.begin_drag(
            &mut area,
            track,
            bar.axis().of_point(point),
            &self.config.scroll_bar,
        );
        self.node_mut(id).kind = NodeKind::ScrollBar(bar);
        self.store_scroll_area(bar.area(), area);
        Ok(hit)
    }

    /// Drag the thumb to follow `point` (bar coordinates).
    ///
    /// # Panics
    ///
    /// Panics if the thumb is not being dragged.
    pub fn scroll_bar_drag_to(&mut self, id: NodeId, point: IntPoint) -> Result<(), TreeError> {
        let (bar, track, mut area) = self.scroll_bar_parts(id)?;
        bar.drag_to(
            &mut area,
            track,
            bar.axis().of_point(point),
            &self.config.scroll_bar,
        );
        self.store_scroll_area(bar.area(), area);
        Ok(())
    }

    /// Finish a thumb drag. Does nothing when idle.
    pub fn scroll_bar_end_drag(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.alive(id)?;
        match &mut self.node_mut(id).kind {
            NodeKind::ScrollBar(bar) => {
                bar.end_drag();
                Ok(())
            }
            _ => Err(TreeError::NotAScrollBar(id)),
        }
    }

    // --- internals ---

    /// Calls `f(id, root_rect, clip, is_leaf)` for every visible, laid-out
    /// node under `root` in paint order. `clip` is the intersection of the
    /// enclosing scroll area viewports.
    pub(crate) fn visit_laid_out(
        &self,
        root: NodeId,
        mut f: impl FnMut(NodeId, IntRect, Option<IntRect>, bool),
    ) {
        if !self.is_alive(root) {
            return;
        }
        let base = self
            .node(root)
            .parent
            .and_then(|p| self.root_rect(p))
            .map_or(IntPoint::ZERO, |r| r.origin);
        let mut stack = vec![(root, base, None::<IntRect>)];
        while let Some((id, base, clip)) = stack.pop() {
            let node = self.node(id);
            if !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            let Some(rect) = node.local_rect().map(|r| r.translate(base)) else {
                continue;
            };
            let is_leaf = !matches!(node.kind, NodeKind::Composition(_));
            f(id, rect, clip, is_leaf);
            let child_clip = match (node.scroll_area(), clip) {
                (None, clip) => clip,
                (Some(_), None) => Some(rect),
                (Some(_), Some(outer)) => Some(
                    outer
                        .intersection(&rect)
                        .unwrap_or(IntRect::new(rect.origin, IntSize::ZERO)),
                ),
            };
            for &child in node.children.iter().rev() {
                stack.push((child, rect.origin, child_clip));
            }
        }
    }

    fn alive(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Margins;
    use crate::strategy::GridLayout;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> IntRect {
        IntRect::new(IntPoint::new(x, y), IntSize::new(w, h))
    }

    fn row_of(canvas: &mut Canvas, n: usize) -> (NodeId, Vec<NodeId>) {
        let row = canvas.create_composition(Layout::row());
        let items = (0..n)
            .map(|_| {
                let item = canvas.create_item(Sizing::default());
                canvas.add_canvas_item(row, item).unwrap();
                item
            })
            .collect();
        (row, items)
    }

    #[test]
    fn removing_a_child_lets_siblings_fill_the_space() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 2);
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(640, 480), true);
        assert_eq!(canvas.canvas_rect(items[0]), Some(rect(0, 0, 320, 480)));
        assert_eq!(canvas.canvas_rect(items[1]), Some(rect(320, 0, 320, 480)));

        canvas.remove_canvas_item(row, items[0]).unwrap();
        assert!(!canvas.is_alive(items[0]));
        assert_eq!(canvas.children_of(row), &[items[1]]);
        assert_eq!(
            canvas.canvas_rect(items[1]),
            Some(rect(0, 0, 640, 480)),
            "no explicit relayout needed"
        );
    }

    #[test]
    fn stale_ids_are_rejected_after_slot_reuse() {
        let mut canvas = Canvas::new();
        let a = canvas.create_item(Sizing::default());
        canvas.remove(a);
        let b = canvas.create_item(Sizing::default());
        assert_eq!(a.idx(), b.idx(), "slot reused");
        assert!(!canvas.is_alive(a));
        assert!(canvas.is_alive(b));
        assert!(canvas.children_of(a).is_empty());
        assert_eq!(canvas.sizing(a), None);
        let row = canvas.create_composition(Layout::row());
        assert_eq!(canvas.add_canvas_item(row, a), Err(TreeError::StaleNode(a)));
    }

    #[test]
    fn grid_hit_testing_reports_innermost_first() {
        let mut canvas = Canvas::new();
        let grid = canvas.create_composition(Layout::Grid(
            GridLayout::new(2, 2)
                .with_margins(Margins::uniform(10))
                .with_spacing(20),
        ));
        let items: Vec<NodeId> = (0..4)
            .map(|_| {
                let item = canvas.create_item(Sizing::default());
                canvas.add_canvas_item(grid, item).unwrap();
                item
            })
            .collect();
        canvas.update_layout(grid, IntPoint::ZERO, IntSize::new(640, 480), true);

        let at = |x, y| canvas.canvas_items_at_point(grid, IntPoint::new(x, y));
        assert_eq!(at(5, 5), [grid], "margin");
        assert_eq!(at(20, 20), [items[0], grid]);
        assert_eq!(at(320, 20), [grid], "gap between columns");
        assert_eq!(at(340, 20), [items[1], grid]);
        assert_eq!(at(300, 260), [items[2], grid]);
        assert_eq!(at(340, 260), [items[3], grid]);
        assert!(at(700, 20).is_empty(), "outside the root");
        assert_eq!(
            canvas.canvas_item_at_point(grid, IntPoint::new(340, 260)),
            Some(items[3])
        );
    }

    #[test]
    fn hidden_and_unpickable_nodes_are_skipped() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 2);
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), true);
        canvas.set_flags(items[0], NodeFlags::PICKABLE);
        assert_eq!(
            canvas.canvas_items_at_point(row, IntPoint::new(5, 5)),
            [row]
        );
        canvas.set_flags(items[1], NodeFlags::VISIBLE);
        assert_eq!(
            canvas.canvas_items_at_point(row, IntPoint::new(60, 5)),
            [row],
            "visible but not pickable"
        );
        assert_eq!(
            canvas.canvas_rect(items[0]),
            Some(rect(0, 0, 50, 10)),
            "invisible nodes are still laid out"
        );
    }

    #[test]
    fn grid_of_scroll_area_and_bars() {
        let mut canvas = Canvas::new();
        let grid = canvas.create_composition(Layout::grid(2, 2));
        let area = canvas.create_scroll_area();
        let vbar = canvas.create_scroll_bar(area, Axis::Vertical).unwrap();
        let hbar = canvas.create_scroll_bar(area, Axis::Horizontal).unwrap();
        canvas
            .add_canvas_item_at_cell(grid, area, GridCell::new(0, 0))
            .unwrap();
        canvas
            .add_canvas_item_at_cell(grid, vbar, GridCell::new(1, 0))
            .unwrap();
        canvas
            .add_canvas_item_at_cell(grid, hbar, GridCell::new(0, 1))
            .unwrap();
        canvas
            .update_sizing(hbar, Sizing::default().with_fixed_height(20))
            .unwrap();
        canvas.update_layout(grid, IntPoint::ZERO, IntSize::new(200, 100), true);

        assert_eq!(canvas.canvas_rect(area), Some(IntRect::from_tlbr(0, 0, 80, 184)));
        assert_eq!(canvas.canvas_rect(vbar), Some(IntRect::from_tlbr(0, 184, 80, 200)));
        assert_eq!(canvas.canvas_rect(hbar), Some(IntRect::from_tlbr(80, 0, 100, 184)));
    }

    fn scrolled_column() -> (Canvas, NodeId, NodeId, NodeId) {
        let mut canvas = Canvas::new();
        let row = canvas.create_composition(Layout::row());
        let area = canvas.create_scroll_area();
        let bar = canvas.create_scroll_bar(area, Axis::Vertical).unwrap();
        let content = canvas.create_item(Sizing::default().with_preferred_height(1000));
        canvas.add_canvas_item(area, content).unwrap();
        canvas.add_canvas_item(row, area).unwrap();
        canvas.add_canvas_item(row, bar).unwrap();
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(216, 500), true);
        (canvas, area, bar, content)
    }

    #[test]
    fn scroll_bar_thumb_follows_the_pointer() {
        let (mut canvas, area, bar, content) = scrolled_column();
        assert_eq!(canvas.canvas_rect(area), Some(rect(0, 0, 200, 500)));
        assert_eq!(canvas.canvas_rect(bar), Some(rect(200, 0, 16, 500)));
        assert_eq!(canvas.canvas_rect(content), Some(rect(0, 0, 200, 1000)));
        assert_eq!(canvas.scroll_bar_thumb_rect(bar), Some(rect(0, 0, 16, 250)));

        let hit = canvas
            .scroll_bar_begin_drag(bar, IntPoint::new(8, 10))
            .unwrap();
        assert_eq!(hit, ScrollBarHit::Thumb);
        canvas
            .scroll_bar_drag_to(bar, IntPoint::new(8, 260))
            .unwrap();
        canvas.scroll_bar_end_drag(bar).unwrap();
        assert_eq!(canvas.scroll_offset(area), Some(IntPoint::new(0, -500)));
        assert_eq!(canvas.canvas_origin(content), Some(IntPoint::new(0, -500)));
        assert_eq!(canvas.scroll_bar_thumb_rect(bar), Some(rect(0, 250, 16, 250)));

        let hit = canvas
            .scroll_bar_begin_drag(bar, IntPoint::new(8, 100))
            .unwrap();
        assert_eq!(hit, ScrollBarHit::PageBackward);
        assert_eq!(canvas.scroll_offset(area), Some(IntPoint::ZERO));
    }

    #[test]
    #[should_panic(expected = "no drag is in progress")]
    fn scroll_bar_drag_without_press_panics() {
        let (mut canvas, _, bar, _) = scrolled_column();
        let _ = canvas.scroll_bar_drag_to(bar, IntPoint::new(8, 200));
    }

    #[test]
    fn scrolling_moves_content_and_reports_damage() {
        let (mut canvas, area, bar, content) = scrolled_column();
        let _ = canvas.commit();
        canvas.scroll_by(area, IntPoint::new(0, -100)).unwrap();
        assert_eq!(canvas.canvas_origin(content), Some(IntPoint::new(0, -100)));
        let damage = canvas.commit();
        assert!(damage.dirty_rects.contains(&rect(0, 0, 200, 500)));
        assert!(damage.dirty_rects.contains(&rect(200, 0, 16, 500)));

        canvas.scroll_to(area, IntPoint::new(0, -5000)).unwrap();
        assert_eq!(
            canvas.scroll_offset(area),
            Some(IntPoint::new(0, -500)),
            "clamped to the scroll range"
        );
        assert_eq!(
            canvas.scroll_to(bar, IntPoint::ZERO),
            Err(TreeError::NotAScrollArea(bar))
        );
    }

    #[test]
    fn short_content_hides_the_thumb() {
        let (mut canvas, _, bar, content) = scrolled_column();
        canvas
            .update_sizing(content, Sizing::default().with_preferred_height(400))
            .unwrap();
        assert_eq!(canvas.scroll_bar_thumb_rect(bar), Some(rect(0, 0, 16, 0)));
        assert_eq!(
            canvas
                .scroll_bar_begin_drag(bar, IntPoint::new(8, 10))
                .unwrap(),
            ScrollBarHit::None
        );
    }

    #[test]
    fn splitter_drag_through_the_canvas() {
        let mut canvas = Canvas::new();
        let splitter = canvas.create_splitter(Axis::Horizontal);
        let a = canvas.create_item(Sizing::default());
        let b = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(splitter, a).unwrap();
        canvas.add_canvas_item(splitter, b).unwrap();
        canvas.update_layout(splitter, IntPoint::ZERO, IntSize::new(640, 480), true);
        assert_eq!(canvas.splits(splitter), Some(&[0.5][..]));
        assert_eq!(canvas.canvas_rect(a), Some(rect(0, 0, 320, 480)));

        assert_eq!(
            canvas.canvas_items_at_point(splitter, IntPoint::new(322, 100)),
            [splitter],
            "boundary hits report the splitter alone"
        );
        assert!(
            !canvas
                .splitter_begin_drag(splitter, IntPoint::new(100, 100))
                .unwrap()
        );
        assert!(
            canvas
                .splitter_begin_drag(splitter, IntPoint::new(320, 100))
                .unwrap()
        );
        canvas
            .splitter_drag_to(splitter, IntPoint::new(480, 100))
            .unwrap();
        canvas.splitter_end_drag(splitter).unwrap();
        assert_eq!(canvas.splits(splitter), Some(&[0.75][..]));
        assert_eq!(canvas.canvas_rect(a), Some(rect(0, 0, 480, 480)));
        assert_eq!(canvas.canvas_rect(b), Some(rect(480, 0, 160, 480)));

        canvas.set_pane_fractions(splitter, &[1.0, 3.0]).unwrap();
        assert_eq!(canvas.canvas_rect(a), Some(rect(0, 0, 160, 480)));
        assert_eq!(
            canvas.set_splits(splitter, &[0.2, 0.4]),
            Err(TreeError::SplitCount {
                expected: 1,
                actual: 2
            })
        );
        let row = canvas.create_composition(Layout::row());
        assert_eq!(
            canvas.set_splits(row, &[0.5]),
            Err(TreeError::NotASplitter(row))
        );
    }

    #[test]
    fn splitter_pane_keeps_its_own_minimum() {
        let mut canvas = Canvas::new();
        let splitter = canvas.create_splitter(Axis::Horizontal);
        let wide = canvas.create_item(Sizing::default().with_minimum_width(400));
        let rest = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(splitter, wide).unwrap();
        canvas.add_canvas_item(splitter, rest).unwrap();
        canvas.update_layout(splitter, IntPoint::ZERO, IntSize::new(640, 480), true);
        assert_eq!(canvas.canvas_rect(wide), Some(rect(0, 0, 400, 480)));
        assert_eq!(canvas.canvas_rect(rest), Some(rect(400, 0, 240, 480)));

        assert!(
            canvas
                .splitter_begin_drag(splitter, IntPoint::new(400, 10))
                .unwrap()
        );
        canvas
            .splitter_drag_to(splitter, IntPoint::new(150, 10))
            .unwrap();
        canvas.splitter_end_drag(splitter).unwrap();
        assert_eq!(canvas.canvas_rect(wide), Some(rect(0, 0, 400, 480)));
    }

    #[test]
    fn nested_splitters() {
        let mut canvas = Canvas::new();
        let outer = canvas.create_splitter(Axis::Horizontal);
        let inner = canvas.create_splitter(Axis::Vertical);
        let left = canvas.create_item(Sizing::default());
        let top = canvas.create_item(Sizing::default());
        let bottom = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(inner, top).unwrap();
        canvas.add_canvas_item(inner, bottom).unwrap();
        canvas.add_canvas_item(outer, left).unwrap();
        canvas.add_canvas_item(outer, inner).unwrap();
        canvas.update_layout(outer, IntPoint::ZERO, IntSize::new(640, 480), true);

        assert_eq!(canvas.canvas_rect(left), Some(rect(0, 0, 320, 480)));
        assert_eq!(canvas.canvas_rect(inner), Some(rect(320, 0, 320, 480)));
        assert_eq!(canvas.canvas_rect(top), Some(rect(0, 0, 320, 240)));
        assert_eq!(canvas.root_rect(bottom), Some(rect(320, 240, 320, 240)));
        assert_eq!(canvas.canvas_bounds(bottom), Some(rect(0, 0, 320, 240)));
    }

    #[test]
    fn deferred_layout_waits_for_commit() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 2);
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), false);
        assert_eq!(canvas.canvas_rect(items[0]), None);

        let damage = canvas.commit();
        assert_eq!(canvas.epoch(), 1);
        assert_eq!(canvas.canvas_rect(items[0]), Some(rect(0, 0, 50, 10)));
        assert_eq!(damage.union_rect(), Some(rect(0, 0, 100, 10)));

        assert!(canvas.commit().is_empty(), "nothing changed since");
        canvas.remove(items[1]);
        let damage = canvas.commit();
        assert!(damage.dirty_rects.contains(&rect(50, 0, 50, 10)));
        assert!(damage.dirty_rects.contains(&rect(0, 0, 100, 10)));
    }

    #[test]
    fn structural_errors() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 1);
        let col = canvas.create_composition(Layout::column());
        let item = items[0];

        let stray = canvas.create_item(Sizing::default());
        assert_eq!(
            canvas.add_canvas_item(item, stray),
            Err(TreeError::NotAContainer(item))
        );
        assert_eq!(
            canvas.add_canvas_item(col, item),
            Err(TreeError::AlreadyAttached(item))
        );
        canvas.add_canvas_item(row, col).unwrap();
        assert_eq!(
            canvas.add_canvas_item(col, row),
            Err(TreeError::Cycle {
                parent: col,
                child: row
            })
        );
        assert_eq!(
            canvas.insert_canvas_item(col, 5, stray),
            Err(TreeError::IndexOutOfRange { index: 5, len: 0 })
        );
        assert_eq!(
            canvas.remove_canvas_item(col, item),
            Err(TreeError::NotAChild {
                parent: col,
                child: item
            })
        );
        assert_eq!(
            canvas.add_canvas_item_at_cell(col, stray, GridCell::new(0, 0)),
            Err(TreeError::CellOutOfRange(GridCell::new(0, 0)))
        );
        assert_eq!(
            canvas.create_scroll_bar(row, Axis::Vertical),
            Err(TreeError::NotAScrollArea(row))
        );

        let area = canvas.create_scroll_area();
        canvas.add_canvas_item(area, stray).unwrap();
        let other = canvas.create_item(Sizing::default());
        assert_eq!(
            canvas.add_canvas_item(area, other),
            Err(TreeError::ScrollAreaOccupied(area))
        );
        assert_eq!(
            canvas.add_stretch(area),
            Err(TreeError::SpacingUnsupported(area))
        );
        assert_eq!(
            canvas.add_spacing(other, 4),
            Err(TreeError::NotAContainer(other))
        );
    }

    #[test]
    fn grid_cells_are_validated() {
        let mut canvas = Canvas::new();
        let grid = canvas.create_composition(Layout::grid(2, 1));
        let a = canvas.create_item(Sizing::default());
        let b = canvas.create_item(Sizing::default());
        let c = canvas.create_item(Sizing::default());
        assert_eq!(
            canvas.add_canvas_item_at_cell(grid, a, GridCell::new(2, 0)),
            Err(TreeError::CellOutOfRange(GridCell::new(2, 0)))
        );
        canvas
            .add_canvas_item_at_cell(grid, a, GridCell::new(1, 0))
            .unwrap();
        assert_eq!(
            canvas.add_canvas_item_at_cell(grid, b, GridCell::new(1, 0)),
            Err(TreeError::CellOccupied(GridCell::new(1, 0)))
        );
        canvas.add_canvas_item(grid, b).unwrap();
        assert_eq!(canvas.add_canvas_item(grid, c), Err(TreeError::GridFull));
        let cells = canvas.layout_of(grid).and_then(Layout::as_grid).map(GridLayout::cells);
        assert_eq!(cells, Some(&[GridCell::new(1, 0), GridCell::new(0, 0)][..]));
    }

    #[test]
    fn replace_keeps_the_grid_cell() {
        let mut canvas = Canvas::new();
        let grid = canvas.create_composition(Layout::grid(2, 1));
        let a = canvas.create_item(Sizing::default());
        let b = canvas.create_item(Sizing::default());
        let c = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(grid, a).unwrap();
        canvas.add_canvas_item(grid, b).unwrap();
        canvas.update_layout(grid, IntPoint::ZERO, IntSize::new(100, 10), true);

        canvas.replace_canvas_item(grid, b, c).unwrap();
        assert!(!canvas.is_alive(b));
        assert_eq!(canvas.children_of(grid), &[a, c]);
        assert_eq!(canvas.parent_of(c), Some(grid));
        assert_eq!(canvas.canvas_rect(c), Some(rect(50, 0, 50, 10)));
    }

    #[test]
    fn wrap_and_unwrap() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 2);
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), true);
        let wrapper = canvas.create_composition(Layout::overlay());

        canvas.wrap_canvas_item(row, items[0], wrapper).unwrap();
        assert_eq!(canvas.children_of(row), &[wrapper, items[1]]);
        assert_eq!(canvas.parent_of(items[0]), Some(wrapper));
        assert_eq!(canvas.canvas_rect(wrapper), Some(rect(0, 0, 50, 10)));
        assert_eq!(canvas.canvas_rect(items[0]), Some(rect(0, 0, 50, 10)));

        assert_eq!(canvas.unwrap_canvas_item(row, wrapper), Ok(items[0]));
        assert!(!canvas.is_alive(wrapper));
        assert_eq!(canvas.children_of(row), &[items[0], items[1]]);
        assert_eq!(canvas.parent_of(items[0]), Some(row));

        assert_eq!(
            canvas.unwrap_canvas_item(row, items[1]),
            Err(TreeError::NotSoleChild(items[1]))
        );
    }

    #[test]
    fn stretches_center_fixed_content() {
        let mut canvas = Canvas::new();
        let row = canvas.create_composition(Layout::row());
        let item = canvas.create_item(Sizing::fixed(IntSize::new(20, 10)));
        canvas.add_stretch(row).unwrap();
        canvas.add_canvas_item(row, item).unwrap();
        let trailing = canvas.add_stretch(row).unwrap();
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), true);
        assert_eq!(canvas.canvas_rect(item), Some(rect(40, 0, 20, 10)));
        assert_eq!(canvas.canvas_size(trailing), Some(IntSize::new(40, 0)));

        let gap = canvas.insert_spacing(row, 0, 10).unwrap();
        assert_eq!(canvas.canvas_size(gap), Some(IntSize::new(10, 0)));
        assert_eq!(canvas.canvas_rect(item), Some(rect(45, 0, 20, 10)));
    }

    #[test]
    fn row_with_unreachable_child_maximum_fills_its_parent() {
        let mut canvas = Canvas::new();
        let (outer, _) = row_of(&mut canvas, 0);
        let inner = canvas.create_composition(Layout::row());
        let malformed = canvas.create_item(
            Sizing::default()
                .with_minimum_width(100)
                .with_maximum_width(50),
        );
        let capped = canvas.create_item(Sizing::default().with_maximum_width(200));
        canvas.add_canvas_item(inner, malformed).unwrap();
        canvas.add_canvas_item(inner, capped).unwrap();
        canvas.add_canvas_item(outer, inner).unwrap();
        canvas.update_layout(outer, IntPoint::ZERO, IntSize::new(1000, 40), true);
        assert_eq!(canvas.canvas_rect(inner), Some(rect(0, 0, 1000, 40)));
        assert_eq!(canvas.canvas_size(capped).map(|s| s.width), Some(200));
    }

    #[test]
    fn collapsible_composition_takes_no_space_until_filled() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 1);
        let col = canvas.create_composition(Layout::column());
        canvas
            .update_sizing(col, Sizing::default().with_collapsible(true))
            .unwrap();
        canvas.add_canvas_item(row, col).unwrap();
        let last = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(row, last).unwrap();
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), true);
        assert_eq!(canvas.canvas_rect(items[0]), Some(rect(0, 0, 50, 10)));
        assert_eq!(canvas.canvas_size(col), Some(IntSize::ZERO));
        assert_eq!(canvas.canvas_rect(last), Some(rect(50, 0, 50, 10)));

        let inside = canvas.create_item(Sizing::default());
        canvas.add_canvas_item(col, inside).unwrap();
        assert_eq!(canvas.canvas_rect(col), Some(rect(33, 0, 33, 10)));
        assert_eq!(canvas.canvas_rect(last), Some(rect(66, 0, 34, 10)));
    }

    #[test]
    fn sizing_updates_relayout_the_parent() {
        let mut canvas = Canvas::new();
        let (row, items) = row_of(&mut canvas, 2);
        canvas.update_layout(row, IntPoint::ZERO, IntSize::new(100, 10), true);
        canvas
            .update_sizing(items[0], Sizing::default().with_fixed_width(20))
            .unwrap();
        assert_eq!(canvas.canvas_rect(items[0]), Some(rect(0, 0, 20, 10)));
        assert_eq!(canvas.canvas_rect(items[1]), Some(rect(20, 0, 80, 10)));
        let measured = canvas.measure_sizing(row).unwrap();
        assert_eq!(measured.minimum_width(), Some(20));
        assert_eq!(measured.maximum_width(), None);
    }

    #[test]
    fn explicit_composition_sizing_overrides_the_aggregate() {
        let mut canvas = Canvas::new();
        let (row, _) = row_of(&mut canvas, 2);
        canvas
            .update_sizing(row, Sizing::default().with_maximum_width(300))
            .unwrap();
        let measured = canvas.measure_sizing(row).unwrap();
        assert_eq!(measured.maximum_width(), Some(300));
    }

    #[test]
    fn set_layout_assigns_cells() {
        let mut canvas = Canvas::new();
        let overlay = canvas.create_composition(Layout::overlay());
        for _ in 0..3 {
            let item = canvas.create_item(Sizing::default());
            canvas.add_canvas_item(overlay, item).unwrap();
        }
        canvas.set_layout(overlay, Layout::grid(2, 2)).unwrap();
        let cells = canvas
            .layout_of(overlay)
            .and_then(Layout::as_grid)
            .map(|g| g.cells().to_vec());
        assert_eq!(
            cells,
            Some(vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(0, 1)
            ])
        );
        assert_eq!(
            canvas.set_layout(overlay, Layout::grid(1, 1)),
            Err(TreeError::GridFull)
        );
        let splitter = canvas.create_splitter(Axis::Vertical);
        assert_eq!(
            canvas.set_layout(splitter, Layout::row()),
            Err(TreeError::NotAContainer(splitter))
        );
    }
}
