//! Error types for counterpart stream tracing

use thiserror::Error;

use crate::vector::LineId;

/// Main error type.
///
/// The first group of variants describes why a single line could not be
/// traced; a batch records them per line and carries on with the remaining
/// lines. `UnresolvedDependencyCycle` is fatal to a whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("line {line}: no cell in the start neighborhood exceeds the minimum accumulation")]
    NoSeedAboveThreshold { line: LineId },

    #[error("line {line}: no trace reached the end neighborhood")]
    NoPathToTargetZone { line: LineId },

    #[error("line {line}: every complete trace deviates more than {tolerance} from the reference line")]
    DeviationExceeded { line: LineId, tolerance: f64 },

    #[error("line {line}: search neighborhood contains no grid cells")]
    EmptyNeighborhood { line: LineId },

    #[error("grid access fault at ({row}, {col}) in grid of size ({rows}, {cols})")]
    GridAccessFault {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("unresolved dependency cycle among lines {lines:?}")]
    UnresolvedDependencyCycle { lines: Vec<LineId> },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Negative value {value} at ({row}, {col})")]
    NegativeValue { row: usize, col: usize, value: f64 },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error only concerns the line being traced.
    ///
    /// Grid access faults are included: they abort the current line, not the batch.
    pub fn is_line_failure(&self) -> bool {
        matches!(
            self,
            Error::NoSeedAboveThreshold { .. }
                | Error::NoPathToTargetZone { .. }
                | Error::DeviationExceeded { .. }
                | Error::EmptyNeighborhood { .. }
                | Error::GridAccessFault { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
