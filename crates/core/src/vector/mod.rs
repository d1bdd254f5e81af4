//! Reference stream lines

use geo_types::{Coord, LineString};

use crate::error::{Error, Result};
use crate::raster::DeviationGrid;

/// Identifier of a stream line, as carried by the source features
pub type LineId = i64;

/// A vector stream line to be matched by a counterpart stream.
#[derive(Debug, Clone)]
pub struct LineRecord {
    /// Feature identifier
    pub id: LineId,
    /// First vertex (upstream end)
    pub start: Coord<f64>,
    /// Last vertex (downstream end)
    pub end: Coord<f64>,
    /// Full geometry, when known
    pub geometry: Option<LineString<f64>>,
    /// Distance of every grid cell to this line
    pub deviation: DeviationGrid,
}

impl LineRecord {
    pub fn new(id: LineId, start: Coord<f64>, end: Coord<f64>, deviation: DeviationGrid) -> Self {
        Self {
            id,
            start,
            end,
            geometry: None,
            deviation,
        }
    }

    /// Build from a polyline; its first and last vertices become the endpoints.
    pub fn from_line_string(
        id: LineId,
        geometry: LineString<f64>,
        deviation: DeviationGrid,
    ) -> Result<Self> {
        let (start, end) = match (geometry.0.first(), geometry.0.last()) {
            (Some(&s), Some(&e)) if geometry.0.len() >= 2 => (s, e),
            _ => {
                return Err(Error::InvalidParameter {
                    name: "geometry",
                    value: format!("line {} with {} vertices", id, geometry.0.len()),
                    reason: "a stream line needs at least two vertices".into(),
                })
            }
        };
        Ok(Self {
            id,
            start,
            end,
            geometry: Some(geometry),
            deviation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_geometry() {
        let ls = LineString::from(vec![(0.0, 0.0), (5.0, 1.0), (10.0, 0.0)]);
        let line = LineRecord::from_line_string(7, ls, DeviationGrid::zeros(1, 1)).unwrap();
        assert_eq!(line.start, Coord { x: 0.0, y: 0.0 });
        assert_eq!(line.end, Coord { x: 10.0, y: 0.0 });
        assert!(line.geometry.is_some());
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let ls = LineString::from(vec![(0.0, 0.0)]);
        assert!(LineRecord::from_line_string(1, ls, DeviationGrid::zeros(1, 1)).is_err());
    }
}
