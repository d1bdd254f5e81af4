//! Read-only surfaces consumed by the tracing engine

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::raster::{Cell, GeoTransform, Raster, RasterElement};

/// Flow accumulation surface, padded with a one-cell ring of zeros.
///
/// Cells are addressed in the coordinates of the unpadded raster; the ring
/// occupies row/col `-1` and `rows`/`cols`, so every 3x3 query around an
/// interior cell stays in bounds. Construction copies the source raster.
#[derive(Debug, Clone)]
pub struct AccumulationGrid {
    padded: Raster<f64>,
    rows: usize,
    cols: usize,
    transform: GeoTransform,
    max_accumulation: f64,
}

impl AccumulationGrid {
    /// Sentinel value of the padding ring
    pub const BORDER: f64 = 0.0;

    /// Build from a raster. No-data cells are replaced by one more than the
    /// largest valid value, so they behave as strong channels.
    pub fn from_raster(raster: &Raster<f64>) -> Result<Self> {
        let (rows, cols) = raster.shape();
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let cell_size = raster.cell_size();
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::InvalidParameter {
                name: "cell_size",
                value: cell_size.to_string(),
                reason: "must be a positive finite number".into(),
            });
        }

        let mut max_accumulation = 0.0_f64;
        for ((row, col), &value) in raster.data().indexed_iter() {
            if raster.is_nodata(value) {
                continue;
            }
            if value < 0.0 {
                return Err(Error::NegativeValue { row, col, value });
            }
            max_accumulation = max_accumulation.max(value);
        }

        let filled = raster
            .data()
            .mapv(|v| if v.is_nodata(raster.nodata()) { max_accumulation + 1.0 } else { v });
        let mut source = Raster::from_array(filled);
        source.set_transform(*raster.transform());

        Ok(Self {
            padded: source.padded(1, Self::BORDER),
            rows,
            cols,
            transform: *raster.transform(),
            max_accumulation,
        })
    }

    /// Build from plain values and a transform
    pub fn from_array(values: Array2<f64>, transform: GeoTransform) -> Result<Self> {
        let mut raster = Raster::from_array(values);
        raster.set_transform(transform);
        Self::from_raster(&raster)
    }

    /// Rows of the unpadded grid
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns of the unpadded grid
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells including the padding ring
    pub fn padded_len(&self) -> usize {
        self.padded.len()
    }

    /// Transform of the unpadded grid
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Largest valid accumulation value in the source raster
    pub fn max_accumulation(&self) -> f64 {
        self.max_accumulation
    }

    /// Whether a cell lies inside the unpadded grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.index(self.rows, self.cols).is_some()
    }

    /// Accumulation at a cell; the padding ring reads as [`Self::BORDER`].
    pub fn value(&self, cell: Cell) -> Result<f64> {
        let shifted = cell.offset(1, 1);
        match shifted.index(self.rows + 2, self.cols + 2) {
            Some((r, c)) => self.padded.get(r, c),
            None => Err(self.fault(cell)),
        }
    }

    /// Cell containing a world point (may lie outside the grid)
    pub fn cell_at(&self, x: f64, y: f64) -> Cell {
        self.transform.world_to_cell(x, y, self.rows)
    }

    fn fault(&self, cell: Cell) -> Error {
        Error::GridAccessFault {
            row: cell.row,
            col: cell.col,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Per-line distance surface: each cell's distance to the reference line.
#[derive(Debug, Clone)]
pub struct DeviationGrid {
    values: Array2<f64>,
}

impl DeviationGrid {
    pub fn new(values: Array2<f64>) -> Result<Self> {
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| **v < 0.0) {
            return Err(Error::NegativeValue { row, col, value });
        }
        Ok(Self { values })
    }

    /// All-zero surface of the given shape
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: Array2::zeros((rows, cols)),
        }
    }

    pub fn from_raster(raster: &Raster<f64>) -> Result<Self> {
        Self::new(raster.data().clone())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Deviation sample at a cell
    pub fn sample(&self, cell: Cell) -> Result<f64> {
        let (rows, cols) = self.shape();
        cell.index(rows, cols)
            .map(|idx| self.values[idx])
            .ok_or(Error::GridAccessFault {
                row: cell.row,
                col: cell.col,
                rows,
                cols,
            })
    }

    /// Ensure this surface matches an accumulation grid
    pub fn check_shape(&self, grid: &AccumulationGrid) -> Result<()> {
        let (ar, ac) = self.shape();
        let (er, ec) = grid.shape();
        if (ar, ac) != (er, ec) {
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }
        Ok(())
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
