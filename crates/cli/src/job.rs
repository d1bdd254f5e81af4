//! JSON job and report files

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

use counterpart_algorithms::counterpart::{
    densify, deviation_grid, orient_to_reference, path_to_line_string, AssembledPaths, TraceParams,
};
use counterpart_core::{AccumulationGrid, Cell, DeviationGrid, GeoTransform, LineId, LineRecord, Raster};

/// Accumulation grid as stored in a job file. `values` are rows, top row first.
#[derive(Debug, Deserialize)]
pub struct GridSpec {
    pub min_x: f64,
    pub min_y: f64,
    pub cell_size: f64,
    #[serde(default)]
    pub nodata: Option<f64>,
    pub values: Vec<Vec<f64>>,
}

impl GridSpec {
    pub fn to_raster(&self) -> Result<Raster<f64>> {
        let mut raster = Raster::from_rows(&self.values).context("Invalid grid values")?;
        raster.set_transform(GeoTransform::from_lower_left(
            self.min_x,
            self.min_y,
            self.cell_size,
            raster.rows(),
        ));
        raster.set_nodata(self.nodata);
        Ok(raster)
    }
}

#[derive(Debug, Deserialize)]
pub struct LineSpec {
    pub id: LineId,
    /// Vertices from upstream to downstream
    pub coords: Vec<[f64; 2]>,
    /// Distance surface for this line; computed from `coords` when absent
    #[serde(default)]
    pub deviation: Option<Vec<Vec<f64>>>,
}

impl LineSpec {
    pub fn to_record(&self, grid: &AccumulationGrid) -> Result<LineRecord> {
        let geometry: LineString<f64> = self.coords.iter().map(|&[x, y]| Coord { x, y }).collect();
        let deviation = match &self.deviation {
            Some(rows) => {
                let raster = Raster::from_rows(rows)
                    .with_context(|| format!("Invalid deviation grid for line {}", self.id))?;
                DeviationGrid::from_raster(&raster)?
            }
            None => deviation_grid(grid, &geometry)
                .with_context(|| format!("Failed to compute deviation for line {}", self.id))?,
        };
        Ok(LineRecord::from_line_string(self.id, geometry, deviation)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct Job {
    pub grid: GridSpec,
    pub lines: Vec<LineSpec>,
    #[serde(default)]
    pub params: TraceParams,
}

impl Job {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse job file {}", path.display()))
    }

    pub fn accumulation(&self) -> Result<AccumulationGrid> {
        let raster = self.grid.to_raster()?;
        Ok(AccumulationGrid::from_raster(&raster).context("Invalid accumulation grid")?)
    }

    pub fn records(&self, grid: &AccumulationGrid) -> Result<Vec<LineRecord>> {
        self.lines.iter().map(|l| l.to_record(grid)).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct TracedReport {
    pub id: LineId,
    pub start_cell: Cell,
    pub score: f64,
    pub cells: Vec<Cell>,
    /// Whether the polyline was flipped to match the reference direction
    pub reversed: bool,
    pub coords: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct FailedReport {
    pub id: LineId,
    pub reason: String,
}

/// Everything a run produced, written as the output JSON
#[derive(Debug, Serialize)]
pub struct Report {
    /// Line ids in processing order
    pub order: Vec<LineId>,
    pub nodata: i64,
    /// Weight for the least-cost-path fallback of failed lines
    pub penalty: f64,
    pub traced: Vec<TracedReport>,
    pub failed: Vec<FailedReport>,
}

impl Report {
    /// `densify_to` caps the polyline segment length, if given.
    pub fn new(
        paths: &AssembledPaths,
        lines: &[LineRecord],
        transform: &GeoTransform,
        penalty: f64,
        densify_to: Option<f64>,
    ) -> Self {
        let traced = paths
            .traced
            .iter()
            .map(|t| {
                let line = path_to_line_string(t.path.cells(), transform);
                let (line, reversed) = match lines.iter().find(|l| l.id == t.id) {
                    Some(reference) => orient_to_reference(line, reference.start, reference.end),
                    None => (line, false),
                };
                let line = match densify_to {
                    Some(max) => densify(&line, max),
                    None => line,
                };
                TracedReport {
                    id: t.id,
                    start_cell: t.start_cell(),
                    score: t.score,
                    cells: t.path.cells().to_vec(),
                    reversed,
                    coords: line.0.iter().map(|c| [c.x, c.y]).collect(),
                }
            })
            .collect();

        Self {
            order: paths.order.iter().filter_map(|&i| lines.get(i).map(|l| l.id)).collect(),
            nodata: paths.nodata,
            penalty,
            traced,
            failed: paths
                .failed
                .iter()
                .map(|f| FailedReport {
                    id: f.id,
                    reason: f.error.to_string(),
                })
                .collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).context("Failed to write report")
    }
}
