//! Grid addresses and the address space rules.
//!
//! A grid has three kinds of addressable element: plain cells, row headers
//! (left gutter) and column headers (top gutter). All three share one
//! coordinate type; the header axis is marked with `-1`.
//!
//! - `col == -1` → row header at `row`
//! - `row == -1` → column header at `col`
//! - otherwise   → cell
//!
//! `(-1, -1)` is not an address. The checked constructors refuse it.

use serde::{Deserialize, Serialize};

/// Coordinate value marking the header axis of an address.
pub const HEADER: i64 = -1;

/// A position in the grid: a cell, a row header or a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridAddress {
    pub row: i64,
    pub col: i64,
}

/// Logical kind of a grid address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    RowHeader,
    ColHeader,
    Cell,
}

impl GridAddress {
    /// Checked constructor. Returns `None` for `(-1, -1)` and for any
    /// coordinate below `-1`.
    pub fn new(row: i64, col: i64) -> Option<Self> {
        if row < HEADER || col < HEADER || (row == HEADER && col == HEADER) {
            return None;
        }
        Some(Self { row, col })
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self { row: row as i64, col: col as i64 }
    }

    pub fn row_header(row: usize) -> Self {
        Self { row: row as i64, col: HEADER }
    }

    pub fn col_header(col: usize) -> Self {
        Self { row: HEADER, col: col as i64 }
    }

    pub fn kind(&self) -> AddressKind {
        classify(*self)
    }

    pub fn is_cell(&self) -> bool {
        self.kind() == AddressKind::Cell
    }

    /// The same column, `delta` rows away. `None` if that would leave the
    /// cell area (negative row) or if this is not a cell.
    pub fn offset_row(&self, delta: i64) -> Option<Self> {
        if !self.is_cell() {
            return None;
        }
        let row = self.row.checked_add(delta)?;
        if row < 0 {
            return None;
        }
        Some(Self { row, col: self.col })
    }
}

impl std::fmt::Display for GridAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Classify an address. Row headers win over column headers, so the
/// (invalid) `(-1, -1)` classifies as a row header instead of panicking.
pub fn classify(addr: GridAddress) -> AddressKind {
    if addr.col == HEADER {
        AddressKind::RowHeader
    } else if addr.row == HEADER {
        AddressKind::ColHeader
    } else {
        AddressKind::Cell
    }
}

/// Two addresses may bound one selection only if they are of the same kind.
pub fn is_compatible(a: GridAddress, b: GridAddress) -> bool {
    classify(a) == classify(b)
}

// ============================================================================
// Element ids
// ============================================================================

/// Markup id of the element rendering `addr`
/// (`header-row-{r}`, `header-col-{c}`, `cell-{r}-{c}`).
pub fn element_id(addr: GridAddress) -> String {
    match classify(addr) {
        AddressKind::RowHeader => format!("header-row-{}", addr.row),
        AddressKind::ColHeader => format!("header-col-{}", addr.col),
        AddressKind::Cell => format!("cell-{}-{}", addr.row, addr.col),
    }
}

/// Markup id of the text input inside a cell.
pub fn input_element_id(addr: GridAddress) -> String {
    format!("input-cell-{}-{}", addr.row, addr.col)
}

/// Inverse of [`element_id`] / [`input_element_id`].
pub fn parse_element_id(id: &str) -> Option<GridAddress> {
    if let Some(rest) = id.strip_prefix("header-row-") {
        let row: usize = rest.parse().ok()?;
        return Some(GridAddress::row_header(row));
    }
    if let Some(rest) = id.strip_prefix("header-col-") {
        let col: usize = rest.parse().ok()?;
        return Some(GridAddress::col_header(col));
    }
    let rest = id
        .strip_prefix("input-cell-")
        .or_else(|| id.strip_prefix("cell-"))?;
    let (row, col) = rest.split_once('-')?;
    Some(GridAddress::cell(row.parse().ok()?, col.parse().ok()?))
}
