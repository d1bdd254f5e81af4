//! Candidate selection: try every start cell as a seed, keep the best trace

use counterpart_core::raster::{path_length, AccumulationGrid, Cell, Neighborhood};
use counterpart_core::{Error, LineId, LineRecord, Result};

use super::step::Direction;
use super::trace::{trace, PathCandidate};
use super::TraceParams;

/// Winning trace for a line
#[derive(Debug, Clone)]
pub struct SelectedPath {
    pub line: LineId,
    pub candidate: PathCandidate,
    /// Start cell the winning trace was seeded from
    pub seed: Cell,
    pub score: f64,
    /// Number of start cells above the accumulation threshold
    pub seeds_evaluated: usize,
}

/// Terms of a candidate score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTerms {
    /// Length of the leading run inside the start neighborhood, plus one (cells)
    pub length: f64,
    /// Deviation accumulated over that run, normalized by cell size and length
    pub deviation: f64,
    /// Seed offset from the nearest start cell, normalized by length
    pub displacement: f64,
    /// `sqrt(deviation + 1) * (displacement + 1)`; lower is better
    pub score: f64,
}

/// Score a trace seeded at `seed`.
///
/// Only the leading run of cells still inside the start neighborhood counts;
/// the deviation of its last cell is left out.
pub fn score_candidate(
    candidate: &PathCandidate,
    seed: Cell,
    start: &Neighborhood,
    cell_size: f64,
) -> ScoreTerms {
    let cells = candidate.cells();
    let run = cells.iter().take_while(|c| start.contains(**c)).count();

    let length = path_length(&cells[..run]) + 1.0;
    let deviation_sum: f64 = candidate.deviations()[..run.saturating_sub(1)].iter().sum();
    let deviation = deviation_sum / (cell_size * length);
    let displacement = start.first().map_or(0.0, |first| seed.distance(first)) / length;

    ScoreTerms {
        length,
        deviation,
        displacement,
        score: (deviation + 1.0).sqrt() * (displacement + 1.0),
    }
}

/// Find the best counterpart path for one line.
///
/// Every start-neighborhood cell with accumulation above
/// `params.min_accumulation` seeds a downstream trace toward the end
/// neighborhood. Traces with any cell farther than
/// `params.deviation_tolerance` from the line are discarded; the lowest
/// score wins, earlier seeds winning ties.
///
/// # Errors
/// - `EmptyNeighborhood` if either endpoint neighborhood misses the grid
/// - `NoSeedAboveThreshold` if no start cell qualifies as a seed
/// - `DeviationExceeded` if traces reached the end but all strayed too far
/// - `NoPathToTargetZone` if no trace reached the end neighborhood
/// - `GridAccessFault` / `SizeMismatch` on inconsistent inputs
pub fn select_candidate(
    grid: &AccumulationGrid,
    line: &LineRecord,
    params: &TraceParams,
) -> Result<SelectedPath> {
    line.deviation.check_shape(grid)?;

    let (rows, cols) = grid.shape();
    let cell_size = grid.cell_size();
    let start = Neighborhood::around(
        grid.cell_at(line.start.x, line.start.y),
        params.search_radius,
        cell_size,
        rows,
        cols,
    );
    let end = Neighborhood::around(
        grid.cell_at(line.end.x, line.end.y),
        params.search_radius,
        cell_size,
        rows,
        cols,
    );
    if start.is_empty() || end.is_empty() {
        return Err(Error::EmptyNeighborhood { line: line.id });
    }

    let budget = params.max_steps.unwrap_or_else(|| grid.padded_len());
    let mut best: Option<(ScoreTerms, Cell, PathCandidate)> = None;
    let mut seeds_evaluated = 0usize;
    let mut reached = 0usize;

    for &seed in &start {
        if grid.value(seed)? <= params.min_accumulation {
            continue;
        }
        seeds_evaluated += 1;

        let outcome = trace(
            grid,
            &line.deviation,
            seed,
            params.min_accumulation,
            &end,
            Direction::Descend,
            budget,
        )?;
        let Some(candidate) = outcome.into_candidate() else {
            continue;
        };
        reached += 1;
        if !candidate.within_tolerance(params.deviation_tolerance) {
            continue;
        }

        let terms = score_candidate(&candidate, seed, &start, cell_size);
        if best.as_ref().map_or(true, |(b, _, _)| terms.score < b.score) {
            best = Some((terms, seed, candidate));
        }
    }

    match best {
        Some((terms, seed, candidate)) => Ok(SelectedPath {
            line: line.id,
            candidate,
            seed,
            score: terms.score,
            seeds_evaluated,
        }),
        None if seeds_evaluated == 0 => Err(Error::NoSeedAboveThreshold { line: line.id }),
        None if reached > 0 => Err(Error::DeviationExceeded {
            line: line.id,
            tolerance: params.deviation_tolerance,
        }),
        None => Err(Error::NoPathToTargetZone { line: line.id }),
    }
}
