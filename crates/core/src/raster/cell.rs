//! Integer grid cell addresses

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (row, col) grid address.
///
/// Signed so that cells just outside a raster (endpoints on the far edge,
/// the sentinel ring of a padded grid) can still be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: isize,
    pub col: isize,
}

impl Cell {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Cell shifted by (dr, dc)
    pub const fn offset(self, dr: isize, dc: isize) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }

    /// Euclidean distance in cell units
    pub fn distance(self, other: Cell) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.col - other.col) as f64;
        dr.hypot(dc)
    }

    /// Unsigned (row, col) if the cell lies inside a `rows` x `cols` grid
    pub fn index(self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        (row < rows && col < cols).then_some((row, col))
    }
}

impl From<(isize, isize)> for Cell {
    fn from((row, col): (isize, isize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cumulative Euclidean length of a cell sequence, in cell units
pub fn path_length(cells: &[Cell]) -> f64 {
    cells.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_index_bounds() {
        assert_eq!(Cell::new(2, 3).index(5, 5), Some((2, 3)));
        assert_eq!(Cell::new(-1, 3).index(5, 5), None);
        assert_eq!(Cell::new(2, 5).index(5, 5), None);
    }

    #[test]
    fn test_path_length() {
        let cells = [Cell::new(0, 0), Cell::new(1, 1), Cell::new(1, 2)];
        assert_relative_eq!(path_length(&cells), std::f64::consts::SQRT_2 + 1.0);
        assert_relative_eq!(path_length(&cells[..1]), 0.0);
        assert_relative_eq!(path_length(&[]), 0.0);
    }
}
