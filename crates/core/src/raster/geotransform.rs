//! North-up georeferencing for rasters

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use super::Cell;

/// Affine transformation for north-up rasters with square cells.
///
/// Converts between cell coordinates (col, row) and world coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
/// `origin_*` is the upper-left corner and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X direction
    pub pixel_width: f64,
    /// Cell size in Y direction (negative for north-up)
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Build from a lower-left corner, the way flow accumulation rasters are
    /// usually described by the surrounding toolchain.
    pub fn from_lower_left(min_x: f64, min_y: f64, cell_size: f64, rows: usize) -> Self {
        Self::new(min_x, min_y + rows as f64 * cell_size, cell_size, -cell_size)
    }

    /// Cell size (square cells)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Lower-left corner of a raster with `rows` rows
    pub fn lower_left(&self, rows: usize) -> (f64, f64) {
        (self.origin_x, self.origin_y - rows as f64 * self.cell_size())
    }

    /// World coordinates of the center of (col, row)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let x = self.origin_x + (col as f64 + 0.5) * self.pixel_width;
        let y = self.origin_y + (row as f64 + 0.5) * self.pixel_height;
        (x, y)
    }

    /// World coordinates of a cell center; the cell may lie outside the raster.
    pub fn cell_center(&self, cell: Cell) -> Coord<f64> {
        Coord {
            x: self.origin_x + (cell.col as f64 + 0.5) * self.pixel_width,
            y: self.origin_y + (cell.row as f64 + 0.5) * self.pixel_height,
        }
    }

    /// Cell containing a world point in a raster of `rows` rows.
    ///
    /// Offsets from the lower-left corner are truncated toward zero, so points
    /// on the far edges (and just outside) map to cells outside the raster.
    pub fn world_to_cell(&self, x: f64, y: f64, rows: usize) -> Cell {
        let (min_x, min_y) = self.lower_left(rows);
        let cs = self.cell_size();
        let row = rows as isize - ((y - min_y) / cs) as isize - 1;
        let col = ((x - min_x) / cs) as isize;
        Cell::new(row, col)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) for a raster of given dimensions
    pub fn bounds(&self, cols: usize, rows: usize) -> (f64, f64, f64, f64) {
        let (min_x, min_y) = self.lower_left(rows);
        let max_x = min_x + cols as f64 * self.cell_size();
        (min_x, min_y, max_x, self.origin_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lower_left_origin() {
        let gt = GeoTransform::from_lower_left(100.0, 200.0, 10.0, 5);
        assert_relative_eq!(gt.origin_y, 250.0);
        let (x, y) = gt.lower_left(5);
        assert_relative_eq!(x, 100.0);
        assert_relative_eq!(y, 200.0);
    }

    #[test]
    fn test_world_to_cell() {
        let gt = GeoTransform::from_lower_left(0.0, 0.0, 10.0, 5);
        // lower-left cell
        assert_eq!(gt.world_to_cell(1.0, 1.0, 5), Cell::new(4, 0));
        // upper-right cell
        assert_eq!(gt.world_to_cell(49.0, 49.0, 5), Cell::new(0, 4));
        // right edge falls outside
        assert_eq!(gt.world_to_cell(50.0, 25.0, 5), Cell::new(2, 5));
    }

    #[test]
    fn test_cell_center_matches_world_to_cell() {
        let gt = GeoTransform::from_lower_left(-30.0, 15.0, 2.5, 8);
        let cell = Cell::new(3, 6);
        let c = gt.cell_center(cell);
        assert_eq!(gt.world_to_cell(c.x, c.y, 8), cell);
        let (x, y) = gt.pixel_to_geo(6, 3);
        assert_relative_eq!(x, c.x);
        assert_relative_eq!(y, c.y);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::from_lower_left(0.0, 0.0, 1.0, 100);
        let (min_x, min_y, max_x, max_y) = gt.bounds(50, 100);
        assert_relative_eq!(min_x, 0.0);
        assert_relative_eq!(min_y, 0.0);
        assert_relative_eq!(max_x, 50.0);
        assert_relative_eq!(max_y, 100.0);
    }
}
