// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable thresholds for interactive containers.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by every node in a [`crate::Canvas`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Splitter drag behavior.
    pub splitter: SplitterConfig,
    /// Scroll bar geometry.
    pub scroll_bar: ScrollBarConfig,
}

/// Splitter drag behavior.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitterConfig {
    /// Smallest extent a pane may be dragged to, in pixels.
    pub min_pane_extent: i32,
    /// Distance in pixels within which a dragged boundary snaps to one of
    /// [`Self::snap_fractions`].
    pub snap_threshold: i32,
    /// Distance in pixels from a boundary within which a pointer grabs it.
    pub hit_tolerance: i32,
    /// Fractions of the splitter extent that attract a dragged boundary.
    pub snap_fractions: Vec<f64>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            min_pane_extent: 64,
            snap_threshold: 6,
            hit_tolerance: 6,
            snap_fractions: vec![1.0 / 3.0, 0.5, 2.0 / 3.0],
        }
    }
}

/// Scroll bar geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollBarConfig {
    /// Shortest thumb, in pixels, however large the content.
    pub min_thumb_length: i32,
    /// Cross-axis extent of a scroll bar.
    pub thickness: i32,
}

impl Default for ScrollBarConfig {
    fn default() -> Self {
        Self {
            min_thumb_length: 32,
            thickness: 16,
        }
    }
}
