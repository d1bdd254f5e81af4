//! Turning traced cells back into oriented polylines

use counterpart_core::raster::{Cell, GeoTransform};
use geo::{Coord, Densify, Distance, Euclidean, LineString};

/// Polyline through the centers of `cells`
pub fn path_to_line_string(cells: &[Cell], transform: &GeoTransform) -> LineString<f64> {
    cells.iter().map(|&c| transform.cell_center(c)).collect()
}

/// Orient `line` like the reference line running from `start` to `end`.
///
/// The line is reversed when its first vertex is farther from `start` than
/// from `end`. Returns the line and whether it was reversed.
pub fn orient_to_reference(
    mut line: LineString<f64>,
    start: Coord<f64>,
    end: Coord<f64>,
) -> (LineString<f64>, bool) {
    let Some(&first) = line.0.first() else {
        return (line, false);
    };
    let reverse = Euclidean::distance(first, start) > Euclidean::distance(first, end);
    if reverse {
        line.0.reverse();
    }
    (line, reverse)
}

/// Insert evenly spaced vertices so no segment is longer than `max_segment`.
///
/// A non-positive or NaN `max_segment` leaves the line unchanged.
pub fn densify(line: &LineString<f64>, max_segment: f64) -> LineString<f64> {
    if max_segment.is_nan() || max_segment <= 0.0 || line.0.len() < 2 {
        return line.clone();
    }
    line.densify::<Euclidean>(max_segment)
}
