//! Tracing every line of a network

use std::sync::atomic::{AtomicUsize, Ordering};

use counterpart_core::raster::AccumulationGrid;
use counterpart_core::{Algorithm, Error, LineRecord, ParallelAlgorithm, Result};
use counterpart_parallel::{ParallelStrategy, ProcessingMode};

use super::assemble::{assemble, AssembledPaths};
use super::candidate::select_candidate;
use super::order::processing_order;
use super::TraceParams;

/// Trace counterpart streams for all `lines`.
///
/// The processing order is resolved first, so a dependency cycle fails the
/// run before any tracing. Lines are then traced in that order with `mode`;
/// each line only reads the shared grid and its own deviation surface.
/// `progress(done, total)` is called once per finished line, from whichever
/// worker finished it.
///
/// A line that cannot be traced ends up in [`AssembledPaths::failed`] and
/// never stops the others.
pub fn trace_counterparts<P>(
    grid: &AccumulationGrid,
    lines: &[LineRecord],
    params: &TraceParams,
    mode: ProcessingMode,
    progress: P,
) -> Result<AssembledPaths>
where
    P: Fn(usize, usize) + Sync + Send,
{
    params.validate()?;
    for line in lines {
        line.deviation.check_shape(grid)?;
    }

    let order = processing_order(lines, grid.cell_size())?;
    let total = order.len();
    let done = AtomicUsize::new(0);

    let outcomes = mode.par_map(0..total, |k| {
        let line = &lines[order[k]];
        let outcome = select_candidate(grid, line, params);
        progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
        (line.id, outcome)
    })?;

    Ok(assemble(grid, outcomes, order))
}

/// Counterpart stream tracing as an [`Algorithm`]
#[derive(Debug, Clone, Default)]
pub struct CounterpartStreams;

impl Algorithm for CounterpartStreams {
    type Input = (AccumulationGrid, Vec<LineRecord>);
    type Output = AssembledPaths;
    type Params = TraceParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Counterpart Streams"
    }

    fn description(&self) -> &'static str {
        "Trace raster paths over flow accumulation that follow vector stream lines"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (grid, lines) = input;
        trace_counterparts(&grid, &lines, &params, ProcessingMode::Sequential, |_, _| {})
    }
}

impl ParallelAlgorithm for CounterpartStreams {
    fn execute_parallel(
        &self,
        input: Self::Input,
        params: Self::Params,
        threads: Option<usize>,
    ) -> Result<Self::Output> {
        let (grid, lines) = input;
        trace_counterparts(&grid, &lines, &params, ProcessingMode::from_threads(threads), |_, _| {})
    }
}
