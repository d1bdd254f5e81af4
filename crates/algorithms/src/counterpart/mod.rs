//! Counterpart stream tracing
//!
//! Derives, for every vector stream line, a raster path that follows the
//! drainage of a flow accumulation surface while staying close to the line:
//! - Step: steepest weighted accumulation change in a 3x3 window
//! - Trace: repeated stepping from a seed until the end neighborhood is entered and left
//! - Candidate: every qualifying start cell is tried as a seed; the straightest,
//!   least deviating trace wins
//! - Order: lines that end on another line are processed after it
//! - Assemble: one stamped layer per traced line plus a failed list
//!
//! Lines without a surviving candidate are reported, not retried; a
//! least-cost-path fallback is left to the caller.

mod assemble;
mod batch;
mod candidate;
mod deviation;
mod order;
mod step;
mod trace;
mod vectorize;

pub use assemble::{assemble, nodata_for, stamp_layer, AssembledPaths, FailedLine, TracedLine};
pub use batch::{trace_counterparts, CounterpartStreams};
pub use candidate::{score_candidate, select_candidate, ScoreTerms, SelectedPath};
pub use deviation::deviation_grid;
pub use order::{classify, nearest_endpoints, processing_order, resolve_order, Dependency, EndpointProximity};
pub use step::{step, Direction};
pub use trace::{trace, PathCandidate, TraceOutcome};
pub use vectorize::{densify, orient_to_reference, path_to_line_string};

use counterpart_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters shared by every line of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceParams {
    /// Seeds must exceed this accumulation; traces may not start below it.
    /// Default: 1.0
    pub min_accumulation: f64,
    /// Radius of the start and end neighborhoods, in world units.
    /// Default: 0.0 (the endpoint cell only)
    pub search_radius: f64,
    /// Largest distance to the reference line any path cell may have, in
    /// world units. Default: 100.0
    pub deviation_tolerance: f64,
    /// Step budget per trace. `None` uses the number of cells of the padded
    /// grid, which strict stepping cannot exceed.
    pub max_steps: Option<usize>,
    /// Cost penalty forwarded to the external least-cost-path fallback.
    /// Default: 1000.0
    pub penalty: f64,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            min_accumulation: 1.0,
            search_radius: 0.0,
            deviation_tolerance: 100.0,
            max_steps: None,
            penalty: 1000.0,
        }
    }
}

impl TraceParams {
    /// Reject values that make every trace meaningless
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64); 4] = [
            ("min_accumulation", self.min_accumulation),
            ("search_radius", self.search_radius),
            ("deviation_tolerance", self.deviation_tolerance),
            ("penalty", self.penalty),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "must be a non-negative finite number".into(),
                });
            }
        }
        if self.max_steps == Some(0) {
            return Err(Error::InvalidParameter {
                name: "max_steps",
                value: "0".into(),
                reason: "a trace needs at least one step".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(TraceParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let p = TraceParams { search_radius: -1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(Error::InvalidParameter { name: "search_radius", .. })));

        let p = TraceParams { deviation_tolerance: f64::NAN, ..Default::default() };
        assert!(p.validate().is_err());

        let p = TraceParams { max_steps: Some(0), ..Default::default() };
        assert!(p.validate().is_err());
    }
}
