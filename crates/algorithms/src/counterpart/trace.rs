//! Flow tracing from a seed cell toward a target zone

use counterpart_core::raster::{AccumulationGrid, Cell, DeviationGrid, Neighborhood};
use counterpart_core::{Error, Result};

use super::step::{step, Direction};

/// A traced path with one deviation sample per cell
#[derive(Debug, Clone, PartialEq)]
pub struct PathCandidate {
    cells: Vec<Cell>,
    deviations: Vec<f64>,
}

impl PathCandidate {
    pub fn new(cells: Vec<Cell>, deviations: Vec<f64>) -> Result<Self> {
        if cells.len() != deviations.len() {
            return Err(Error::InvalidParameter {
                name: "deviations",
                value: deviations.len().to_string(),
                reason: format!("expected one sample per cell ({} cells)", cells.len()),
            });
        }
        Ok(Self { cells, deviations })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn deviations(&self) -> &[f64] {
        &self.deviations
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell of the path (its raster start)
    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Largest deviation sample, `None` for an empty path
    pub fn max_deviation(&self) -> Option<f64> {
        self.deviations.iter().copied().reduce(f64::max)
    }

    /// Whether every sample is within `tolerance`
    pub fn within_tolerance(&self, tolerance: f64) -> bool {
        self.deviations.iter().all(|&d| d <= tolerance)
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    fn truncate(&mut self, len: usize) {
        self.cells.truncate(len);
        self.deviations.truncate(len);
    }
}

/// Result of a single trace
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    /// The target zone was entered; the path ends at the last cell visited
    /// inside it.
    Reached(PathCandidate),
    /// The seed is below the minimum accumulation
    BelowThreshold,
    /// Stepping stopped before the target zone was entered
    Stalled,
    /// The step budget ran out
    BudgetExhausted,
}

impl TraceOutcome {
    pub fn into_candidate(self) -> Option<PathCandidate> {
        match self {
            TraceOutcome::Reached(candidate) => Some(candidate),
            _ => None,
        }
    }
}

/// Trace from `seed` until the path enters and then leaves `target`.
///
/// Every visited cell is recorded with its deviation sample. The cell that
/// leaves the zone is not recorded, and the returned path is cut after the
/// last cell visited inside the zone. A stall inside the zone also ends the
/// trace successfully.
///
/// # Errors
/// `GridAccessFault` when the path runs off the grid (only possible when
/// ascending into the padding ring).
pub fn trace(
    grid: &AccumulationGrid,
    deviation: &DeviationGrid,
    seed: Cell,
    min_accumulation: f64,
    target: &Neighborhood,
    direction: Direction,
    max_steps: usize,
) -> Result<TraceOutcome> {
    if grid.value(seed)? < min_accumulation {
        return Ok(TraceOutcome::BelowThreshold);
    }

    let mut cells = Vec::new();
    let mut deviations = Vec::new();
    let mut last_inside: Option<usize> = None;
    let mut current = seed;
    let mut steps = 0usize;

    loop {
        if target.contains(current) {
            last_inside = Some(cells.len());
        } else if last_inside.is_some() {
            break;
        }

        cells.push(current);
        deviations.push(deviation.sample(current)?);

        let next = step(grid, current, direction)?;
        if next == current {
            break;
        }
        if steps >= max_steps {
            return Ok(TraceOutcome::BudgetExhausted);
        }
        steps += 1;
        current = next;
    }

    match last_inside {
        Some(idx) => {
            let mut candidate = PathCandidate { cells, deviations };
            candidate.truncate(idx + 1);
            Ok(TraceOutcome::Reached(candidate))
        }
        None => Ok(TraceOutcome::Stalled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterpart_core::GeoTransform;
    use ndarray::{array, Array2};

    fn grid(values: Array2<f64>) -> AccumulationGrid {
        let rows = values.nrows();
        AccumulationGrid::from_array(values, GeoTransform::from_lower_left(0.0, 0.0, 10.0, rows)).unwrap()
    }

    /// One row with accumulation rising to the east
    fn channel(len: usize) -> AccumulationGrid {
        grid(Array2::from_shape_fn((1, len), |(_, c)| (c + 1) as f64))
    }

    /// Target zone holding a single cell
    fn zone(cell: (isize, isize)) -> Neighborhood {
        Neighborhood::around(Cell::from(cell), 0.0, 10.0, 100, 100)
    }

    #[test]
    fn test_below_threshold() {
        let g = channel(5);
        let d = DeviationGrid::zeros(1, 5);
        let out = trace(&g, &d, Cell::new(0, 0), 2.0, &zone((0, 4)), Direction::Descend, 100).unwrap();
        assert_eq!(out, TraceOutcome::BelowThreshold);
    }

    #[test]
    fn test_reaches_terminal_zone() {
        let g = channel(6);
        let d = DeviationGrid::new(Array2::from_shape_fn((1, 6), |(_, c)| c as f64)).unwrap();
        let out = trace(&g, &d, Cell::new(0, 0), 1.0, &zone((0, 5)), Direction::Descend, 100).unwrap();
        let path = out.into_candidate().unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path.start(), Some(Cell::new(0, 0)));
        assert_eq!(path.end(), Some(Cell::new(0, 5)));
        assert_eq!(path.deviations(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(path.max_deviation(), Some(5.0));
    }

    #[test]
    fn test_cut_after_last_cell_inside_zone() {
        let g = channel(10);
        let d = DeviationGrid::zeros(1, 10);
        // zone covers columns 3..=5; the trace runs on to column 9
        let target = Neighborhood::around(Cell::new(0, 4), 10.0, 10.0, 1, 10);
        let out = trace(&g, &d, Cell::new(0, 0), 1.0, &target, Direction::Descend, 100).unwrap();
        let path = out.into_candidate().unwrap();
        assert_eq!(path.end(), Some(Cell::new(0, 5)));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_stall_before_zone() {
        let g = grid(array![[1.0, 2.0, 3.0, 2.0, 1.0]]);
        let d = DeviationGrid::zeros(1, 5);
        let out = trace(&g, &d, Cell::new(0, 0), 1.0, &zone((0, 4)), Direction::Descend, 100).unwrap();
        assert_eq!(out, TraceOutcome::Stalled);
    }

    #[test]
    fn test_budget_exhausted() {
        let g = channel(10);
        let d = DeviationGrid::zeros(1, 10);
        let out = trace(&g, &d, Cell::new(0, 0), 1.0, &zone((0, 9)), Direction::Descend, 3).unwrap();
        assert_eq!(out, TraceOutcome::BudgetExhausted);
    }

    #[test]
    fn test_ascend_runs_upstream() {
        let g = channel(5);
        let d = DeviationGrid::zeros(1, 5);
        let target = Neighborhood::around(Cell::new(0, 0), 0.0, 10.0, 1, 5);
        let out = trace(&g, &d, Cell::new(0, 4), 1.0, &target, Direction::Ascend, 100).unwrap();
        let path = out.into_candidate().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.end(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_no_immediate_repeats() {
        let g = grid(Array2::from_shape_fn((8, 8), |(r, c)| ((r * 3 + c * 5) % 11 + r + c) as f64));
        let d = DeviationGrid::zeros(8, 8);
        let target = Neighborhood::around(Cell::new(7, 7), 30.0, 10.0, 8, 8);
        for r in 0..8 {
            for c in 0..8 {
                let out = trace(&g, &d, Cell::new(r, c), 0.0, &target, Direction::Descend, 1000).unwrap();
                if let TraceOutcome::Reached(p) = out {
                    assert!(p.cells().windows(2).all(|w| w[0] != w[1]));
                    assert!(p.len() <= 64);
                }
            }
        }
    }

    #[test]
    fn test_candidate_length_mismatch() {
        assert!(PathCandidate::new(vec![Cell::new(0, 0)], vec![]).is_err());
    }
}
