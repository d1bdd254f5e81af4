//! Raster data structures and surfaces

mod cell;
mod element;
mod geotransform;
mod grid;
mod neighborhood;
mod surface;

pub use cell::{path_length, Cell};
pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use neighborhood::{d8, Neighborhood};
pub use surface::{AccumulationGrid, DeviationGrid};
