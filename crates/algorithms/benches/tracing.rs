//! Benchmarks for counterpart stream tracing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use counterpart_algorithms::counterpart::{trace_counterparts, TraceParams};
use counterpart_core::{AccumulationGrid, Cell, DeviationGrid, GeoTransform, LineRecord};
use counterpart_parallel::ProcessingMode;
use ndarray::Array2;

/// Fan of parallel channels draining south; channel `k` runs down column `4k + 2`
fn create_channels(size: usize) -> AccumulationGrid {
    let values = Array2::from_shape_fn((size, size), |(r, c)| {
        if c % 4 == 2 {
            10.0 + r as f64 * 5.0
        } else {
            // small noise so hillslopes are not flat
            1.0 + ((r * 7 + c * 13) % 17) as f64 * 0.01
        }
    });
    AccumulationGrid::from_array(values, GeoTransform::from_lower_left(0.0, 0.0, 1.0, size)).unwrap()
}

fn create_lines(grid: &AccumulationGrid) -> Vec<LineRecord> {
    let (rows, cols) = grid.shape();
    let transform = grid.transform();
    (2..cols)
        .step_by(4)
        .map(|c| {
            let col = c as isize;
            let start = transform.cell_center(Cell::new(0, col));
            let end = transform.cell_center(Cell::new(rows as isize - 1, col));
            let deviation = Array2::from_shape_fn((rows, cols), |(_, cc)| (cc as f64 - c as f64).abs());
            LineRecord::new(c as i64, start, end, DeviationGrid::new(deviation).unwrap())
        })
        .collect()
}

fn bench_trace_counterparts(c: &mut Criterion) {
    let params = TraceParams {
        search_radius: 2.0,
        deviation_tolerance: 3.0,
        ..Default::default()
    };

    for (name, mode) in [
        ("sequential", ProcessingMode::Sequential),
        ("parallel", ProcessingMode::Parallel),
    ] {
        let mut group = c.benchmark_group(format!("counterpart/trace_{}", name));
        for size in [64, 128, 256] {
            let grid = create_channels(size);
            let lines = create_lines(&grid);
            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
                b.iter(|| {
                    trace_counterparts(black_box(&grid), black_box(&lines), &params, mode, |_, _| {}).unwrap()
                })
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_trace_counterparts);
criterion_main!(benches);
