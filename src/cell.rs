//! Grid coordinates.
//!
//! A [`Cell`] is a plain `(row, col)` value. It is copied freely into every
//! set and sentence that mentions it; nothing owns a cell.

use serde::{Deserialize, Serialize};

/// A `(row, col)` position on the grid.
///
/// Ordering is row-major, which keeps sentence rendering and move selection
/// reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether this cell lies inside a `height` x `width` grid.
    pub fn in_bounds(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// The up-to-8 in-bounds cells adjacent to this one.
    ///
    /// Cells on an edge or corner have fewer neighbors. The cell itself is
    /// never included.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        let rows = self.row.saturating_sub(1)..=(self.row + 1).min(height.saturating_sub(1));
        let cols = self.col.saturating_sub(1)..=(self.col + 1).min(width.saturating_sub(1));
        rows.flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
            .filter(move |&c| c != self && c.in_bounds(height, width))
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
