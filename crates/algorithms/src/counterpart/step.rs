//! Local step selection
//!
//! Chooses the next cell of a trace from the 3x3 window around the current
//! cell. Differences are weighted by 1 for orthogonal and 1/sqrt(2) for
//! diagonal neighbors:
//! ```text
//!   0.71  1  0.71
//!   1     .  1
//!   0.71  1  0.71
//! ```
//! Neighbors are scanned row-major from the top-left; only a strictly better
//! value replaces the current choice, so ties go to the first neighbor seen.

use counterpart_core::raster::{d8, AccumulationGrid, Cell};
use counterpart_core::Result;

/// Which way a trace moves over the accumulation surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward higher accumulation (downstream)
    #[default]
    Descend,
    /// Toward lower accumulation (upstream)
    Ascend,
}

/// Next cell from `cell`, or `cell` itself when no neighbor qualifies.
///
/// - `Descend` picks the largest positive `(acc[n] - acc[c]) * w`
/// - `Ascend` picks the smallest positive `(acc[c] - acc[n]) * w`
///
/// Returning the input cell marks a pit (ascend) or channel head of
/// maximal accumulation (descend).
pub fn step(grid: &AccumulationGrid, cell: Cell, direction: Direction) -> Result<Cell> {
    let center = grid.value(cell)?;
    let mut next = cell;

    match direction {
        Direction::Descend => {
            let mut best_gain = 0.0;
            for (&(dr, dc), &w) in d8::OFFSETS.iter().zip(d8::WEIGHTS.iter()) {
                let neighbor = cell.offset(dr, dc);
                let gain = (grid.value(neighbor)? - center) * w;
                if gain > best_gain {
                    best_gain = gain;
                    next = neighbor;
                }
            }
        }
        Direction::Ascend => {
            let mut best_drop = f64::INFINITY;
            for (&(dr, dc), &w) in d8::OFFSETS.iter().zip(d8::WEIGHTS.iter()) {
                let neighbor = cell.offset(dr, dc);
                let drop = (center - grid.value(neighbor)?) * w;
                if drop > 0.0 && drop < best_drop {
                    best_drop = drop;
                    next = neighbor;
                }
            }
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterpart_core::{Error, GeoTransform};
    use ndarray::{array, Array2};

    fn grid(values: Array2<f64>) -> AccumulationGrid {
        let rows = values.nrows();
        AccumulationGrid::from_array(values, GeoTransform::from_lower_left(0.0, 0.0, 10.0, rows)).unwrap()
    }

    #[test]
    fn test_descend_local_maximum_stalls() {
        let g = grid(array![[1.0, 2.0, 1.0], [2.0, 9.0, 2.0], [1.0, 2.0, 1.0]]);
        let c = Cell::new(1, 1);
        assert_eq!(step(&g, c, Direction::Descend).unwrap(), c);
    }

    #[test]
    fn test_descend_prefers_weighted_gain() {
        // diagonal gain 4 * 0.707 = 2.83 beats orthogonal gain 2.5
        let g = grid(array![[0.0, 0.0, 0.0], [0.0, 1.0, 3.5], [0.0, 0.0, 5.0]]);
        assert_eq!(step(&g, Cell::new(1, 1), Direction::Descend).unwrap(), Cell::new(2, 2));

        // diagonal gain 3 * 0.707 = 2.12 loses to orthogonal gain 2.5
        let g = grid(array![[0.0, 0.0, 0.0], [0.0, 1.0, 3.5], [0.0, 0.0, 4.0]]);
        assert_eq!(step(&g, Cell::new(1, 1), Direction::Descend).unwrap(), Cell::new(1, 2));
    }

    #[test]
    fn test_descend_tie_keeps_first_in_scan_order() {
        let g = grid(array![[0.0, 5.0, 0.0], [5.0, 1.0, 5.0], [0.0, 5.0, 0.0]]);
        // N, W, E, S all gain 4; N is scanned first
        assert_eq!(step(&g, Cell::new(1, 1), Direction::Descend).unwrap(), Cell::new(0, 1));
    }

    #[test]
    fn test_ascend_takes_smallest_positive_drop() {
        let g = grid(array![[9.0, 7.0, 9.0], [2.0, 8.0, 9.0], [9.0, 9.0, 9.0]]);
        // drops: N 1.0, W 6.0 -> N
        assert_eq!(step(&g, Cell::new(1, 1), Direction::Ascend).unwrap(), Cell::new(0, 1));
    }

    #[test]
    fn test_ascend_pit_stalls() {
        let g = grid(array![[5.0, 5.0, 5.0], [5.0, 1.0, 5.0], [5.0, 5.0, 5.0]]);
        let c = Cell::new(1, 1);
        assert_eq!(step(&g, c, Direction::Ascend).unwrap(), c);
    }

    #[test]
    fn test_descend_never_enters_padding() {
        let g = grid(array![[3.0, 2.0], [2.0, 1.0]]);
        assert_eq!(step(&g, Cell::new(0, 0), Direction::Descend).unwrap(), Cell::new(0, 0));
        assert_eq!(step(&g, Cell::new(1, 1), Direction::Descend).unwrap(), Cell::new(0, 0));
    }

    #[test]
    fn test_ascend_can_reach_padding() {
        // the zero ring is a positive drop from any positive edge cell
        let g = grid(array![[3.0]]);
        let next = step(&g, Cell::new(0, 0), Direction::Ascend).unwrap();
        assert!(!g.contains(next));
        assert!(matches!(
            step(&g, next, Direction::Ascend),
            Err(Error::GridAccessFault { .. })
        ));
    }
}
