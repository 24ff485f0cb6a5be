// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid layout: two independent box passes, one for columns and one for rows.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{AxisSizing, LayoutStrategy, gaps, place, solve};
use crate::geometry::{Axis, IntPoint, IntRect, IntSize, Margins};
use crate::sizing::{Constraint, Sizing};

/// A cell position in a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCell {
    /// Zero-based column, counted from the left.
    pub column: usize,
    /// Zero-based row, counted from the top.
    pub row: usize,
}

impl GridCell {
    /// Creates a cell position.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Places each child in one cell of a fixed `columns × rows` grid.
///
/// Column widths are solved from the overlapped sizings of each column's
/// occupants, row heights likewise. Cells are separated by the spacing and
/// surrounded by the margins. A child smaller than its cell keeps its maximum
/// and sits at the cell's top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    columns: usize,
    rows: usize,
    /// Space between the container edge and the outer cells.
    pub margins: Margins,
    /// Gap between adjacent cells.
    pub spacing: i32,
    /// Cell of each child, parallel to the composition's child list.
    cells: Vec<GridCell>,
}

impl GridLayout {
    /// A grid of `columns × rows` cells. Both counts are raised to at least 1.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            margins: Margins::ZERO,
            spacing: 0,
            cells: Vec::new(),
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

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Cells of the current children, in child order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Returns true if `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.column < self.columns && cell.row < self.rows
    }

    /// Returns true if a child already occupies `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// The first unoccupied cell in row-major order.
    #[must_use]
    pub fn first_free_cell(&self) -> Option<GridCell> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| GridCell::new(column, row)))
            .find(|cell| !self.is_occupied(*cell))
    }

    pub(crate) fn insert_cell(&mut self, index: usize, cell: GridCell) {
        self.cells.insert(index, cell);
    }

    pub(crate) fn clear_cells(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn remove_cell(&mut self, index: usize) -> Option<GridCell> {
        (index < self.cells.len()).then(|| self.cells.remove(index))
    }

    /// Overlapped sizing of the occupants of each track along `axis`.
    fn tracks(&self, axis: Axis, children: &[Sizing]) -> Vec<AxisSizing> {
        let count = match axis {
            Axis::Horizontal => self.columns,
            Axis::Vertical => self.rows,
        };
        (0..count)
            .map(|track| {
                let members = self
                    .cells
                    .iter()
                    .zip(children)
                    .filter(|(cell, sizing)| {
                        let index = match axis {
                            Axis::Horizontal => cell.column,
                            Axis::Vertical => cell.row,
                        };
                        index == track && !sizing.is_collapsed()
                    })
                    .map(|(_, sizing)| sizing);
                AxisSizing::overlap(axis, members)
            })
            .collect()
    }

    /// Start offset and extent of every track along `axis`.
    fn solve_tracks(&self, axis: Axis, children: &[Sizing], content: IntRect) -> Vec<(i32, i32)> {
        let tracks = self.tracks(axis, children);
        let constraints: Vec<Constraint> = tracks
            .iter()
            .map(|t| t.apply(Sizing::default(), axis).constraint(axis))
            .collect();
        let available = (axis.of_size(content.size) - gaps(tracks.len(), self.spacing)).max(0);
        let mut cursor = axis.of_point(content.origin);
        solve(&constraints, available)
            .into_iter()
            .map(|extent| {
                let start = cursor;
                cursor += extent + self.spacing;
                (start, extent)
            })
            .collect()
    }
}

impl LayoutStrategy for GridLayout {
    fn aggregate_sizing(&self, children: &[Sizing]) -> Sizing {
        let width = AxisSizing::sum(self.tracks(Axis::Horizontal, children))
            .padded(self.margins.horizontal() + gaps(self.columns, self.spacing));
        let height = AxisSizing::sum(self.tracks(Axis::Vertical, children))
            .padded(self.margins.vertical() + gaps(self.rows, self.spacing));
        height.apply(
            width.apply(Sizing::default(), Axis::Horizontal),
            Axis::Vertical,
        )
    }

    fn distribute(&self, children: &[Sizing], size: IntSize) -> Vec<IntRect> {
        let content = IntRect::from_size(size).inset(self.margins);
        let columns = self.solve_tracks(Axis::Horizontal, children, content);
        let rows = self.solve_tracks(Axis::Vertical, children, content);
        children
            .iter()
            .enumerate()
            .map(|(i, sizing)| {
                let Some(cell) = self.cells.get(i) else {
                    return IntRect::new(content.origin, IntSize::ZERO);
                };
                let (x, w) = columns.get(cell.column).copied().unwrap_or_default();
                let (y, h) = rows.get(cell.row).copied().unwrap_or_default();
                let w = w.min(sizing.constraint(Axis::Horizontal).maximum);
                let h = h.min(sizing.constraint(Axis::Vertical).maximum);
                place(IntRect::new(IntPoint::new(x, y), IntSize::new(w, h)), sizing)
            })
            .collect()
    }
}
