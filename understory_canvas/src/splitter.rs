// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitter state: fractional pane boundaries and the drag-resize state machine.
//!
//! A splitter with `n` panes keeps `n - 1` cumulative boundary fractions in
//! `(0, 1)`. Pixel positions are derived from the fractions and the current
//! extent, so resizing the splitter keeps pane proportions.
//!
//! Layout feeds the fraction-derived extents to [`solve`] as preferred
//! values, so each pane's own [`Sizing`] minimum and maximum still hold. When
//! the solved extents differ from the fractions, the fractions are rewritten
//! to match.
//!
//! Dragging moves one boundary. The boundary is clamped so that every pane
//! keeps at least its minimum, the larger of
//! [`SplitterConfig::min_pane_extent`] and the pane's own minimum; if a
//! neighbouring pane is already at its minimum, the boundaries beyond it are
//! pushed along. Boundaries that did not move keep their exact fractions.
//!
//! ```
//! use understory_canvas::{Axis, SplitterConfig, Splitter};
//!
//! let config = SplitterConfig::default();
//! let mut s = Splitter::with_panes(Axis::Horizontal, 3);
//! s.set_extent(640);
//! assert_eq!(s.pane_extents().as_slice(), &[213, 213, 214]);
//!
//! s.begin_drag(1, 426);
//! s.drag_to(500, &config);
//! s.end_drag();
//! assert_eq!(s.pane_extents().as_slice(), &[213, 287, 140]);
//! ```

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::config::SplitterConfig;
use crate::error::TreeError;
use crate::geometry::{Axis, IntRect, IntSize};
use crate::sizing::{Constraint, Sizing};
use crate::strategy::{BoxLayout, LayoutStrategy, place, solve};

/// Inline storage for boundaries; most splitters have few panes.
pub type Splits = SmallVec<[f64; 4]>;

/// Pixel positions of boundaries.
pub type Boundaries = SmallVec<[i32; 4]>;

#[derive(Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        boundary: usize,
        start_pointer: i32,
        start_splits: Splits,
    },
}

/// Pane boundaries and drag state of a splitter.
#[derive(Clone, Debug, PartialEq)]
pub struct Splitter {
    axis: Axis,
    panes: usize,
    splits: Splits,
    extent: i32,
    /// Minimum extent of each pane's child, recorded at the last layout.
    minimums: Boundaries,
    state: DragState,
}

fn fraction_to_px(fraction: f64, extent: i32) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The product lies between 0 and the extent, which is an i32."
    )]
    let px = (fraction * f64::from(extent) + 1e-9) as i32;
    px.clamp(0, extent.max(0))
}

fn cumulative(fractions: &[f64]) -> Splits {
    let mut acc = 0.0;
    let n = fractions.len().saturating_sub(1);
    fractions[..n]
        .iter()
        .map(|f| {
            acc += f;
            acc
        })
        .collect()
}

impl Splitter {
    /// An empty splitter along `axis`. Panes are added as children are.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self::with_panes(axis, 0)
    }

    /// A splitter with `panes` equal panes.
    #[must_use]
    pub fn with_panes(axis: Axis, panes: usize) -> Self {
        let splits = (1..panes)
            .map(|k| k as f64 / panes as f64)
            .collect();
        Self {
            axis,
            panes,
            splits,
            extent: 0,
            minimums: Boundaries::new(),
            state: DragState::Idle,
        }
    }

    /// The axis panes are laid out along.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of panes.
    #[must_use]
    pub const fn pane_count(&self) -> usize {
        self.panes
    }

    /// Cumulative boundary fractions, one fewer than the pane count.
    #[must_use]
    pub fn splits(&self) -> &[f64] {
        &self.splits
    }

    /// Replaces the boundary fractions.
    ///
    /// Each value must lie in `(0, 1)` and values must not decrease.
    pub fn set_splits(&mut self, splits: &[f64]) -> Result<(), TreeError> {
        let expected = self.panes.saturating_sub(1);
        if splits.len() != expected {
            return Err(TreeError::SplitCount {
                expected,
                actual: splits.len(),
            });
        }
        let mut previous = 0.0;
        for &s in splits {
            if s.is_nan() || s <= 0.0 || s >= 1.0 || s < previous {
                return Err(TreeError::SplitOutOfRange(s));
            }
            previous = s;
        }
        self.splits = splits.iter().copied().collect();
        Ok(())
    }

    /// Fraction of the extent taken by each pane. Sums to 1 when there are panes.
    #[must_use]
    pub fn pane_fractions(&self) -> Vec<f64> {
        if self.panes == 0 {
            return Vec::new();
        }
        let mut previous = 0.0;
        let mut out: Vec<f64> = self
            .splits
            .iter()
            .map(|&s| {
                let f = s - previous;
                previous = s;
                f
            })
            .collect();
        out.push(1.0 - previous);
        out
    }

    /// Replaces the pane fractions. Values are normalized to sum to 1.
    pub fn set_pane_fractions(&mut self, fractions: &[f64]) -> Result<(), TreeError> {
        if fractions.len() != self.panes {
            return Err(TreeError::SplitCount {
                expected: self.panes,
                actual: fractions.len(),
            });
        }
        if let Some(&bad) = fractions.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(TreeError::SplitOutOfRange(bad));
        }
        let total: f64 = fractions.iter().sum();
        let normalized: Vec<f64> = fractions.iter().map(|f| f / total).collect();
        self.splits = cumulative(&normalized);
        Ok(())
    }

    /// Current extent along the axis, in pixels.
    #[must_use]
    pub const fn extent(&self) -> i32 {
        self.extent
    }

    /// Sets the extent along the axis. Fractions are kept as they are.
    pub fn set_extent(&mut self, extent: i32) {
        self.extent = extent.max(0);
    }

    /// Records the minimum extent of each pane's content along the axis.
    ///
    /// Drags never shrink a pane below this or below
    /// [`SplitterConfig::min_pane_extent`]. [`Splitter::distribute`] records
    /// the minimums of the children it lays out.
    pub fn set_pane_minimums(&mut self, minimums: &[i32]) {
        self.minimums = minimums.iter().map(|m| (*m).max(0)).collect();
    }

    /// The smallest extent each pane may be dragged to.
    fn drag_minimums(&self, floor: i32) -> Boundaries {
        (0..self.panes)
            .map(|i| self.minimums.get(i).copied().unwrap_or(0).max(floor))
            .collect()
    }

    /// Pixel position of each boundary at the current extent.
    #[must_use]
    pub fn boundaries(&self) -> Boundaries {
        Self::boundaries_for(&self.splits, self.extent)
    }

    fn boundaries_for(splits: &[f64], extent: i32) -> Boundaries {
        let mut previous = 0;
        splits
            .iter()
            .map(|&s| {
                previous = fraction_to_px(s, extent).max(previous);
                previous
            })
            .collect()
    }

    /// Pixel extent of each pane at the current extent. Sums to the extent.
    #[must_use]
    pub fn pane_extents(&self) -> Boundaries {
        if self.panes == 0 {
            return Boundaries::new();
        }
        let mut previous = 0;
        let mut out: Boundaries = self
            .boundaries()
            .into_iter()
            .map(|b| {
                let e = b - previous;
                previous = b;
                e
            })
            .collect();
        out.push(self.extent - previous);
        out
    }

    /// The boundary within `tolerance` pixels of `position`, nearest first.
    #[must_use]
    pub fn boundary_at(&self, position: i32, tolerance: i32) -> Option<usize> {
        self.boundaries()
            .iter()
            .enumerate()
            .map(|(i, &b)| (i, (position - b).abs()))
            .filter(|&(_, d)| d < tolerance)
            .min_by_key(|&(_, d)| d)
            .map(|(i, _)| i)
    }

    /// Returns true while a boundary is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The boundary being dragged, if any.
    #[must_use]
    pub fn dragged_boundary(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { boundary, .. } => Some(boundary),
            DragState::Idle => None,
        }
    }

    /// Starts dragging `boundary` from pointer position `pointer` (along the axis).
    ///
    /// An unfinished drag is discarded. Out-of-range boundaries are ignored.
    pub fn begin_drag(&mut self, boundary: usize, pointer: i32) {
        if boundary >= self.splits.len() {
            return;
        }
        tracing::debug!(boundary, pointer, "splitter drag started");
        self.state = DragState::Dragging {
            boundary,
            start_pointer: pointer,
            start_splits: self.splits.clone(),
        };
    }

    /// Moves the dragged boundary so that it follows `pointer`.
    ///
    /// # Panics
    ///
    /// Panics if no drag is in progress.
    pub fn drag_to(&mut self, pointer: i32, config: &SplitterConfig) {
        let DragState::Dragging {
            boundary: k,
            start_pointer,
            start_splits,
        } = &self.state
        else {
            panic!("Splitter::drag_to called while no drag is in progress");
        };
        let k = *k;
        let extent = self.extent;
        let mins = self.drag_minimums(config.min_pane_extent.max(0));
        let required = mins.iter().fold(0_i32, |sum, m| sum.saturating_add(*m));
        if extent < required {
            tracing::debug!(extent, required, "splitter too small for its panes; drag ignored");
            return;
        }

        let start_px = Self::boundaries_for(start_splits, extent);
        let mut target = start_px[k] + (pointer - start_pointer);

        let mut snapped = None;
        for &f in &config.snap_fractions {
            let snap_px = fraction_to_px(f, extent);
            if (target - snap_px).abs() <= config.snap_threshold {
                tracing::trace!(boundary = k, fraction = f, "splitter boundary snapped");
                target = snap_px;
                snapped = Some(f);
                break;
            }
        }

        let lo: i32 = mins[..=k].iter().sum();
        let hi = extent - mins[k + 1..].iter().sum::<i32>();
        let clamped = target.clamp(lo, hi.max(lo));
        if clamped != target {
            snapped = None;
        }

        let mut px = start_px.clone();
        px[k] = clamped;
        for j in k + 1..px.len() {
            let floor = px[j - 1] + mins[j];
            if px[j] >= floor {
                break;
            }
            px[j] = floor;
        }
        for j in (0..k).rev() {
            let ceiling = px[j + 1] - mins[j + 1];
            if px[j] <= ceiling {
                break;
            }
            px[j] = ceiling;
        }

        let splits: Splits = px
            .iter()
            .zip(&start_px)
            .zip(start_splits)
            .enumerate()
            .map(|(j, ((&now, &before), &fraction))| match snapped {
                Some(f) if j == k => f,
                _ if now == before => fraction,
                _ => f64::from(now) / f64::from(extent),
            })
            .collect();
        self.splits = splits;
    }

    /// Finishes a drag. Does nothing when idle.
    pub fn end_drag(&mut self) {
        if self.is_dragging() {
            tracing::debug!(splits = ?self.splits.as_slice(), "splitter drag ended");
        }
        self.state = DragState::Idle;
    }

    /// Inserts a pane at `index`, giving it an equal share and scaling the others.
    pub fn insert_pane(&mut self, index: usize) {
        let mut fractions = self.pane_fractions();
        let n = fractions.len() as f64;
        let share = 1.0 / (n + 1.0);
        for f in &mut fractions {
            *f *= n / (n + 1.0);
        }
        let index = index.min(fractions.len());
        fractions.insert(index, share);
        if index <= self.minimums.len() {
            self.minimums.insert(index, 0);
        }
        self.panes += 1;
        self.splits = cumulative(&fractions);
        self.state = DragState::Idle;
    }

    /// Removes the pane at `index` and renormalizes the remaining panes.
    pub fn remove_pane(&mut self, index: usize) {
        if index >= self.panes {
            return;
        }
        let mut fractions = self.pane_fractions();
        fractions.remove(index);
        if index < self.minimums.len() {
            self.minimums.remove(index);
        }
        let total: f64 = fractions.iter().sum();
        if total > 0.0 {
            for f in &mut fractions {
                *f /= total;
            }
        }
        self.panes -= 1;
        self.splits = cumulative(&fractions);
        self.state = DragState::Idle;
    }

    /// Box aggregation with room for every pane at its minimum.
    ///
    /// Each pane needs the larger of [`SplitterConfig::min_pane_extent`] and
    /// its child's own minimum. Along the axis the splitter can grow without
    /// bound and has no preference.
    #[must_use]
    pub fn aggregate_sizing(&self, children: &[Sizing], config: &SplitterConfig) -> Sizing {
        let sizing = BoxLayout::new(self.axis).aggregate_sizing(children);
        let pane_floor = config.min_pane_extent.max(0);
        let floor = children.iter().fold(0_i32, |sum, child| {
            sum.saturating_add(child.constraint(self.axis).minimum.max(pane_floor))
        });
        let minimum = sizing.minimum(self.axis).unwrap_or(0).max(floor);
        sizing
            .with_minimum(self.axis, (minimum > 0).then_some(minimum))
            .with_maximum(self.axis, None)
            .with_preferred(self.axis, None)
    }

    /// One rectangle per pane, spanning the full cross extent of `size`.
    ///
    /// Sets the extent from `size` and records the children's minimums. Pane
    /// extents are solved with the fraction-derived extents as preferred
    /// values, so a child's own minimum or maximum overrides its fraction.
    pub fn distribute(&mut self, children: &[Sizing], size: IntSize) -> Vec<IntRect> {
        self.set_extent(self.axis.of_size(size));
        self.minimums = children
            .iter()
            .map(|child| child.constraint(self.axis).minimum)
            .collect();
        let constraints: Vec<Constraint> = self
            .pane_extents()
            .into_iter()
            .zip(children)
            .map(|(px, child)| Constraint {
                preferred: Some(px),
                ..child.constraint(self.axis)
            })
            .collect();
        let extents = solve(&constraints, self.extent);
        self.settle(&extents);

        let cross = self.axis.cross().of_size(size);
        let mut cursor = 0;
        extents
            .into_iter()
            .zip(children)
            .map(|(extent, sizing)| {
                let rect = IntRect::new(
                    self.axis.point(cursor, 0),
                    self.axis.size(extent, cross),
                );
                cursor += extent;
                place(rect, sizing)
            })
            .collect()
    }

    /// Rewrites the fractions to match solved pane extents.
    ///
    /// Skipped while the extent cannot hold every child's minimum.
    fn settle(&mut self, extents: &[i32]) {
        let required = self.minimums.iter().fold(0_i32, |sum, m| sum.saturating_add(*m));
        if self.extent == 0
            || extents.len() != self.panes
            || required > self.extent
            || extents == self.pane_extents().as_slice()
        {
            return;
        }
        let extent = f64::from(self.extent);
        let mut edge = 0;
        self.splits = extents[..extents.len() - 1]
            .iter()
            .map(|&e| {
                edge += e;
                f64::from(edge) / extent
            })
            .collect();
        tracing::trace!(
            splits = ?self.splits.as_slice(),
            "splitter fractions follow pane constraints"
        );
    }
}
