//! Stamping traced paths into per-line output layers

use counterpart_core::raster::{AccumulationGrid, Cell, Raster};
use counterpart_core::{Error, LineId, Result};

use super::candidate::SelectedPath;
use super::trace::PathCandidate;

/// A successfully traced line
#[derive(Debug, Clone)]
pub struct TracedLine {
    pub id: LineId,
    pub path: PathCandidate,
    pub seed: Cell,
    pub score: f64,
    /// Path cells set to `id`, every other cell nodata
    pub layer: Raster<i64>,
}

impl TracedLine {
    /// Raster start cell of the path, for direction checks against the
    /// reference line
    pub fn start_cell(&self) -> Cell {
        self.seed
    }
}

/// A line left for the external fallback
#[derive(Debug, Clone, PartialEq)]
pub struct FailedLine {
    pub id: LineId,
    pub error: Error,
}

/// Output of a tracing run, in processing order
#[derive(Debug, Clone)]
pub struct AssembledPaths {
    pub traced: Vec<TracedLine>,
    pub failed: Vec<FailedLine>,
    /// Value of cells outside every path
    pub nodata: i64,
    /// Line indices in the order they were processed
    pub order: Vec<usize>,
}

impl AssembledPaths {
    pub fn failed_ids(&self) -> Vec<LineId> {
        self.failed.iter().map(|f| f.id).collect()
    }

    pub fn traced_ids(&self) -> Vec<LineId> {
        self.traced.iter().map(|t| t.id).collect()
    }
}

/// Nodata value that cannot collide with any line id: 0 when all ids are
/// positive, else one below the smallest id.
///
/// `i64::MIN` has nothing below it and comes back unchanged; a line with
/// that id is then refused by [`stamp_layer`].
pub fn nodata_for<I: IntoIterator<Item = LineId>>(ids: I) -> i64 {
    match ids.into_iter().min() {
        Some(min) if min <= 0 => min.saturating_sub(1),
        _ => 0,
    }
}

/// Layer shaped like `grid` with the path cells set to `id`
///
/// # Errors
/// `InvalidParameter` when `id` equals `nodata`, since the path would be
/// indistinguishable from the background.
pub fn stamp_layer(grid: &AccumulationGrid, cells: &[Cell], id: LineId, nodata: i64) -> Result<Raster<i64>> {
    if id == nodata {
        return Err(Error::InvalidParameter {
            name: "id",
            value: id.to_string(),
            reason: format!("line id collides with the nodata value {}", nodata),
        });
    }
    let (rows, cols) = grid.shape();
    let mut layer = Raster::filled(rows, cols, nodata);
    layer.set_transform(*grid.transform());
    layer.set_nodata(Some(nodata));

    for &cell in cells {
        let (row, col) = cell.index(rows, cols).ok_or(Error::GridAccessFault {
            row: cell.row,
            col: cell.col,
            rows,
            cols,
        })?;
        layer.set(row, col, id)?;
    }
    Ok(layer)
}

/// Split per-line outcomes into traced layers and failures.
///
/// `outcomes` must be in processing order; a path that cannot be stamped
/// moves its line to the failed list.
pub fn assemble(
    grid: &AccumulationGrid,
    outcomes: Vec<(LineId, Result<SelectedPath>)>,
    order: Vec<usize>,
) -> AssembledPaths {
    let nodata = nodata_for(outcomes.iter().map(|(id, _)| *id));
    let mut traced = Vec::new();
    let mut failed = Vec::new();

    for (id, outcome) in outcomes {
        let stamped = outcome.and_then(|selected| {
            let layer = stamp_layer(grid, selected.candidate.cells(), id, nodata)?;
            Ok(TracedLine {
                id,
                path: selected.candidate,
                seed: selected.seed,
                score: selected.score,
                layer,
            })
        });
        match stamped {
            Ok(line) => traced.push(line),
            Err(error) => failed.push(FailedLine { id, error }),
        }
    }

    AssembledPaths {
        traced,
        failed,
        nodata,
        order,
    }
}
