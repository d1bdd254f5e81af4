//! Distance-ordered search neighborhoods and the 3x3 stepping kernel

use std::collections::HashSet;

use super::Cell;

/// 3x3 kernel used by local stepping.
pub mod d8 {
    use std::f64::consts::FRAC_1_SQRT_2;

    /// Neighbor offsets (row, col) in row-major order, top-left first.
    /// Scan order matters: ties keep the first neighbor encountered.
    pub const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    /// Weight applied to each accumulation difference: 1 for orthogonal
    /// neighbors, 1/sqrt(2) for diagonal ones.
    pub const WEIGHTS: [f64; 8] = [
        FRAC_1_SQRT_2,
        1.0,
        FRAC_1_SQRT_2,
        1.0,
        1.0,
        FRAC_1_SQRT_2,
        1.0,
        FRAC_1_SQRT_2,
    ];
}

/// Cells within a radius of a seed, nearest first.
///
/// Ties in distance keep enumeration order (column offset outer, row offset
/// inner). Cells are clipped to the grid, so the seed itself may be absent
/// when it lies outside the grid.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    seed: Cell,
    cells: Vec<Cell>,
    members: HashSet<Cell>,
}

impl Neighborhood {
    /// Kernel radius in cells for a world-unit radius: `ceil(radius / cell_size)`
    pub fn kernel_radius(radius: f64, cell_size: f64) -> isize {
        (radius / cell_size).ceil().max(0.0) as isize
    }

    /// Build the neighborhood of `seed` inside a `rows` x `cols` grid.
    ///
    /// Only the part of the kernel overlapping the grid is enumerated, so
    /// the cost is bounded by the grid size whatever the radius.
    pub fn around(seed: Cell, radius: f64, cell_size: f64, rows: usize, cols: usize) -> Self {
        let w = Self::kernel_radius(radius, cell_size);
        let last_row = isize::try_from(rows).unwrap_or(isize::MAX) - 1;
        let last_col = isize::try_from(cols).unwrap_or(isize::MAX) - 1;

        let row_lo = seed.row.saturating_sub(w).max(0);
        let row_hi = seed.row.saturating_add(w).min(last_row);
        let col_lo = seed.col.saturating_sub(w).max(0);
        let col_hi = seed.col.saturating_add(w).min(last_col);
        if row_lo > row_hi || col_lo > col_hi {
            return Self {
                seed,
                cells: Vec::new(),
                members: HashSet::new(),
            };
        }

        // widen before squaring: w may be close to isize::MAX
        let w2 = (w as i128) * (w as i128);
        let extent = ((row_hi - row_lo + 1) as usize).saturating_mul((col_hi - col_lo + 1) as usize);
        let mut scored: Vec<(f64, Cell)> = Vec::with_capacity(extent);
        for col in col_lo..=col_hi {
            for row in row_lo..=row_hi {
                let dr = (row - seed.row) as i128;
                let dc = (col - seed.col) as i128;
                if dr * dr + dc * dc > w2 {
                    continue;
                }
                let cell = Cell::new(row, col);
                scored.push((cell.distance(seed), cell));
            }
        }
        // stable: equal distances keep enumeration order
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        let cells: Vec<Cell> = scored.into_iter().map(|(_, c)| c).collect();
        let members = cells.iter().copied().collect();
        Self { seed, cells, members }
    }

    /// Cell the neighborhood was built around
    pub fn seed(&self) -> Cell {
        self.seed
    }

    /// Nearest in-grid cell to the seed
    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.members.contains(&cell)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Neighborhood {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_radius() {
        assert_eq!(Neighborhood::kernel_radius(25.0, 10.0), 3);
        assert_eq!(Neighborhood::kernel_radius(20.0, 10.0), 2);
        assert_eq!(Neighborhood::kernel_radius(0.0, 10.0), 0);
        assert_eq!(Neighborhood::kernel_radius(-5.0, 10.0), 0);
    }

    #[test]
    fn test_ordered_by_distance() {
        let n = Neighborhood::around(Cell::new(5, 5), 20.0, 10.0, 11, 11);
        // disc of radius 2: 13 cells
        assert_eq!(n.len(), 13);
        assert_eq!(n.first(), Some(Cell::new(5, 5)));
        let d: Vec<f64> = n.iter().map(|c| c.distance(n.seed())).collect();
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let n = Neighborhood::around(Cell::new(5, 5), 10.0, 10.0, 11, 11);
        // column offset outer loop, row offset inner loop
        let expected = vec![
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 5),
            Cell::new(6, 5),
            Cell::new(5, 6),
        ];
        assert_eq!(n.cells(), expected.as_slice());
    }

    #[test]
    fn test_clipped_to_grid() {
        let n = Neighborhood::around(Cell::new(0, 0), 10.0, 10.0, 3, 3);
        assert_eq!(n.len(), 3);
        assert!(n.contains(Cell::new(0, 1)));
        assert!(!n.contains(Cell::new(-1, 0)));
    }

    #[test]
    fn test_seed_outside_grid() {
        let near = Neighborhood::around(Cell::new(2, 3), 10.0, 10.0, 3, 3);
        assert_eq!(near.first(), Some(Cell::new(2, 2)));
        assert!(!near.contains(Cell::new(2, 3)));

        let far = Neighborhood::around(Cell::new(20, 20), 10.0, 10.0, 3, 3);
        assert!(far.is_empty());
        assert_eq!(far.first(), None);
    }

    #[test]
    fn test_radius_far_beyond_grid() {
        // w = 100_000 cells around a 5x5 grid: the whole grid, nothing more
        let n = Neighborhood::around(Cell::new(2, 2), 1000.0, 0.01, 5, 5);
        assert_eq!(n.len(), 25);
        assert_eq!(n.first(), Some(Cell::new(2, 2)));

        // kernel radius saturates at isize::MAX
        let n = Neighborhood::around(Cell::new(4, 0), 1e300, 1e-300, 5, 5);
        assert_eq!(n.len(), 25);
        assert_eq!(n.first(), Some(Cell::new(4, 0)));

        let far = Neighborhood::around(Cell::new(isize::MIN, 3), 1e6, 1.0, 5, 5);
        assert!(far.is_empty());
    }

    #[test]
    fn test_d8_weights_match_offsets() {
        for (&(dr, dc), &w) in d8::OFFSETS.iter().zip(d8::WEIGHTS.iter()) {
            let diagonal = dr != 0 && dc != 0;
            assert_eq!(diagonal, w < 1.0);
        }
    }
}
