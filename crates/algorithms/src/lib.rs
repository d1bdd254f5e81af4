//! # Counterpart Algorithms
//!
//! Tracing of raster counterpart streams: paths over a flow accumulation
//! surface that follow existing vector stream lines.
//!
//! - **counterpart**: step selection, flow tracing, candidate selection,
//!   processing order, path assembly and the batch driver

pub mod counterpart;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::counterpart::{
        deviation_grid, processing_order, select_candidate, step, trace, trace_counterparts,
        AssembledPaths, CounterpartStreams, Direction, PathCandidate, TraceOutcome, TraceParams,
    };
    pub use counterpart_core::prelude::*;
    pub use counterpart_parallel::ProcessingMode;
}
