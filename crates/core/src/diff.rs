//! Incremental redraw of a selection rectangle.
//!
//! When the endpoint of a selection moves, only the cells in the symmetric
//! difference between the old and new rectangle change appearance. Diffing
//! costs O(area(prev) + area(curr)), which keeps per-move work proportional
//! to the selection instead of the grid.
//!
//! Output sets are ordered (`BTreeSet`) so callers apply visual changes in a
//! deterministic row-major order.

use std::collections::BTreeSet;

use crate::address::GridAddress;
use crate::selection::{GridBounds, SelectionRect};

/// Cells to un-highlight and cells to newly highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectDiff {
    pub to_clear: BTreeSet<GridAddress>,
    pub to_mark: BTreeSet<GridAddress>,
}

impl RectDiff {
    pub fn is_empty(&self) -> bool {
        self.to_clear.is_empty() && self.to_mark.is_empty()
    }
}

/// All cells covered by `rect` within `bounds`.
pub fn covered(rect: &SelectionRect, bounds: GridBounds) -> BTreeSet<GridAddress> {
    rect.effective().cells(bounds).collect()
}

/// Compute the cells that change when the selection goes from `prev` to
/// `curr`. With no previous rectangle everything in `curr` is marked.
pub fn diff(prev: Option<&SelectionRect>, curr: &SelectionRect, bounds: GridBounds) -> RectDiff {
    let curr_set = covered(curr, bounds);
    let Some(prev) = prev else {
        return RectDiff {
            to_clear: BTreeSet::new(),
            to_mark: curr_set,
        };
    };
    let prev_set = covered(prev, bounds);

    RectDiff {
        to_clear: prev_set.difference(&curr_set).copied().collect(),
        to_mark: curr_set.difference(&prev_set).copied().collect(),
    }
}
