use serde::{Deserialize, Serialize};

use crate::address::{classify, is_compatible, AddressKind, GridAddress};

/// Dimensions of the rendered grid (cells only, headers excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub rows: usize,
    pub cols: usize,
}

impl GridBounds {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Check if an element exists for `addr` in a grid of this size.
    pub fn contains(&self, addr: GridAddress) -> bool {
        let row_ok = addr.row >= 0 && (addr.row as u64) < self.rows as u64;
        let col_ok = addr.col >= 0 && (addr.col as u64) < self.cols as u64;
        match classify(addr) {
            AddressKind::RowHeader => row_ok,
            AddressKind::ColHeader => col_ok,
            AddressKind::Cell => row_ok && col_ok,
        }
    }

    /// Iterate over every cell in the grid (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = GridAddress> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| GridAddress::cell(r, c)))
    }
}

/// A selection as the user drew it: a fixed anchor (`start_*`) and a moving
/// endpoint (`end_*`). Not normalized; see [`SelectionRect::effective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRect {
    pub start_row: i64,
    pub start_col: i64,
    pub end_row: i64,
    pub end_col: i64,
}

impl SelectionRect {
    pub fn new(anchor: GridAddress, end: GridAddress) -> Self {
        Self {
            start_row: anchor.row,
            start_col: anchor.col,
            end_row: end.row,
            end_col: end.col,
        }
    }

    /// Create a selection covering only its anchor.
    pub fn single(anchor: GridAddress) -> Self {
        Self::new(anchor, anchor)
    }

    pub fn anchor(&self) -> GridAddress {
        GridAddress { row: self.start_row, col: self.start_col }
    }

    pub fn end(&self) -> GridAddress {
        GridAddress { row: self.end_row, col: self.end_col }
    }

    /// Same anchor, new endpoint.
    pub fn with_end(&self, end: GridAddress) -> Self {
        Self::new(self.anchor(), end)
    }

    /// Anchor and endpoint are of the same address kind.
    pub fn is_well_shaped(&self) -> bool {
        is_compatible(self.anchor(), self.end())
    }

    /// Order-independent form of this selection.
    pub fn effective(&self) -> EffectiveRect {
        EffectiveRect {
            kind: classify(self.anchor()),
            min_row: self.start_row.min(self.end_row),
            max_row: self.start_row.max(self.end_row),
            min_col: self.start_col.min(self.end_col),
            max_col: self.start_col.max(self.end_col),
        }
    }

    /// The effective rectangle expressed as a selection whose anchor is the
    /// top-left corner. This is the form sent to the backend.
    pub fn normalized(&self) -> SelectionRect {
        let eff = self.effective();
        SelectionRect {
            start_row: eff.min_row,
            start_col: eff.min_col,
            end_row: eff.max_row,
            end_col: eff.max_col,
        }
    }
}

/// A normalized selection, inclusive on both ends.
///
/// For header-anchored selections the header axis is `-1..=-1` and the
/// selection spans the whole grid along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRect {
    pub kind: AddressKind,
    pub min_row: i64,
    pub max_row: i64,
    pub min_col: i64,
    pub max_col: i64,
}

impl EffectiveRect {
    /// Row span of covered cells within `bounds`, as a half-open range.
    fn row_span(&self, bounds: GridBounds) -> (i64, i64) {
        match self.kind {
            AddressKind::ColHeader => (0, bounds.rows as i64),
            _ => (self.min_row.max(0), (self.max_row + 1).min(bounds.rows as i64)),
        }
    }

    /// Column span of covered cells within `bounds`, as a half-open range.
    fn col_span(&self, bounds: GridBounds) -> (i64, i64) {
        match self.kind {
            AddressKind::RowHeader => (0, bounds.cols as i64),
            _ => (self.min_col.max(0), (self.max_col + 1).min(bounds.cols as i64)),
        }
    }

    /// Check if a cell is covered. Header addresses are never covered.
    pub fn contains(&self, addr: GridAddress, bounds: GridBounds) -> bool {
        if !addr.is_cell() {
            return false;
        }
        let (r0, r1) = self.row_span(bounds);
        let (c0, c1) = self.col_span(bounds);
        addr.row >= r0 && addr.row < r1 && addr.col >= c0 && addr.col < c1
    }

    /// Number of cells covered within `bounds`.
    pub fn cell_count(&self, bounds: GridBounds) -> usize {
        let (r0, r1) = self.row_span(bounds);
        let (c0, c1) = self.col_span(bounds);
        ((r1 - r0).max(0) * (c1 - c0).max(0)) as usize
    }

    /// Iterate over all covered cells (row-major order). Row-header
    /// selections expand to full rows, column-header selections to full
    /// columns; the header elements themselves are not included.
    pub fn cells(&self, bounds: GridBounds) -> impl Iterator<Item = GridAddress> {
        let (r0, r1) = self.row_span(bounds);
        let (c0, c1) = self.col_span(bounds);
        (r0..r1).flat_map(move |r| (c0..c1).map(move |c| GridAddress { row: r, col: c }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GridBounds {
        GridBounds::new(10, 6)
    }

    #[test]
    fn test_effective_normalizes() {
        let sel = SelectionRect::new(GridAddress::cell(5, 5), GridAddress::cell(1, 2));
        let eff = sel.effective();
        assert_eq!((eff.min_row, eff.max_row), (1, 5));
        assert_eq!((eff.min_col, eff.max_col), (2, 5));
        assert_eq!(eff.kind, AddressKind::Cell);
        assert_eq!(eff.cell_count(bounds()), 5 * 4);
    }

    #[test]
    fn test_normalized_form() {
        let sel = SelectionRect::new(GridAddress::cell(4, 5), GridAddress::cell(2, 3));
        let n = sel.normalized();
        assert_eq!(n.anchor(), GridAddress::cell(2, 3));
        assert_eq!(n.end(), GridAddress::cell(4, 5));
    }

    #[test]
    fn test_row_header_spans_full_rows() {
        let sel = SelectionRect::new(GridAddress::row_header(3), GridAddress::row_header(2));
        let eff = sel.effective();
        let cells: Vec<_> = eff.cells(bounds()).collect();
        assert_eq!(cells.len(), 2 * 6);
        assert!(eff.contains(GridAddress::cell(2, 0), bounds()));
        assert!(eff.contains(GridAddress::cell(3, 5), bounds()));
        assert!(!eff.contains(GridAddress::cell(4, 0), bounds()));
        assert!(!eff.contains(GridAddress::row_header(3), bounds()));
    }

    #[test]
    fn test_col_header_spans_full_columns() {
        let sel = SelectionRect::single(GridAddress::col_header(1));
        let eff = sel.effective();
        assert_eq!(eff.cell_count(bounds()), 10);
        assert!(eff.cells(bounds()).all(|a| a.col == 1));
    }

    #[test]
    fn test_cells_clipped_to_bounds() {
        let sel = SelectionRect::new(GridAddress::cell(8, 4), GridAddress::cell(20, 20));
        assert_eq!(sel.effective().cell_count(bounds()), 2 * 2);
    }

    #[test]
    fn test_well_shaped() {
        assert!(SelectionRect::new(GridAddress::cell(0, 0), GridAddress::cell(3, 3)).is_well_shaped());
        assert!(!SelectionRect::new(GridAddress::cell(0, 0), GridAddress::row_header(3)).is_well_shaped());
    }

    #[test]
    fn test_bounds_contains() {
        let b = bounds();
        assert!(b.contains(GridAddress::cell(9, 5)));
        assert!(!b.contains(GridAddress::cell(10, 0)));
        assert!(b.contains(GridAddress::row_header(9)));
        assert!(!b.contains(GridAddress::col_header(6)));
        assert_eq!(b.cells().count(), 60);
    }
}
