//! Deviation surfaces from reference lines

use counterpart_core::raster::{AccumulationGrid, DeviationGrid};
use counterpart_core::{Error, Result};
use geo::{Distance, Euclidean, LineString, Point};
use ndarray::Array2;

/// Euclidean distance from every cell center of `grid` to `line`.
///
/// Stands in for an externally computed distance raster when only the line
/// geometry is at hand.
pub fn deviation_grid(grid: &AccumulationGrid, line: &LineString<f64>) -> Result<DeviationGrid> {
    if line.0.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "line",
            value: format!("{} vertices", line.0.len()),
            reason: "a deviation surface needs at least two vertices".into(),
        });
    }

    let transform = grid.transform();
    let values = Array2::from_shape_fn(grid.shape(), |(row, col)| {
        let (x, y) = transform.pixel_to_geo(col, row);
        Euclidean::distance(&Point::new(x, y), line)
    });
    DeviationGrid::new(values)
}
