//! # Counterpart Core
//!
//! Core types for tracing raster counterparts of vector stream lines.
//!
//! This crate provides:
//! - `Raster<T>`: generic georeferenced grid
//! - `AccumulationGrid` / `DeviationGrid`: the read-only surfaces a trace runs on
//! - `Cell` and distance-ordered `Neighborhood`s
//! - `LineRecord`: the reference stream lines
//! - Algorithm traits for a consistent API

pub mod error;
pub mod raster;
pub mod vector;

pub use error::{Error, Result};
pub use raster::{AccumulationGrid, Cell, DeviationGrid, GeoTransform, Neighborhood, Raster, RasterElement};
pub use vector::{LineId, LineRecord};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{AccumulationGrid, Cell, DeviationGrid, GeoTransform, Neighborhood, Raster};
    pub use crate::vector::{LineId, LineRecord};
    pub use crate::{Algorithm, ParallelAlgorithm};
}

/// Core trait for algorithms.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}

/// Algorithms whose independent units can run on a worker pool
pub trait ParallelAlgorithm: Algorithm {
    /// Execute using `threads` workers (`None` = all available cores)
    fn execute_parallel(
        &self,
        input: Self::Input,
        params: Self::Params,
        threads: Option<usize>,
    ) -> std::result::Result<Self::Output, Self::Error>;
}
