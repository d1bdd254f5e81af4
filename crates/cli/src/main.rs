//! Counterpart CLI - raster counterparts of vector stream lines

mod job;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use counterpart_algorithms::counterpart::{processing_order, trace_counterparts, TraceParams};
use counterpart_core::{AccumulationGrid, LineRecord};
use counterpart_parallel::{num_cpus, ProcessingMode};

use job::{Job, Report};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "counterpart")]
#[command(author, version, about = "Trace raster counterparts of vector stream lines", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace a counterpart stream for every line of a job
    Trace {
        /// Job file (JSON)
        input: PathBuf,
        /// Report file (JSON)
        output: PathBuf,
        /// Minimum accumulation for seeds and trace starts
        #[arg(short = 'm', long)]
        min_accumulation: Option<f64>,
        /// Start/end neighborhood radius in map units
        #[arg(short, long)]
        radius: Option<f64>,
        /// Largest allowed distance from the reference line in map units
        #[arg(short, long)]
        deviation: Option<f64>,
        /// Step budget per trace
        #[arg(long)]
        max_steps: Option<usize>,
        /// Worker threads (default: all cores)
        #[arg(short, long, conflicts_with = "sequential")]
        threads: Option<usize>,
        /// Trace lines one after another on the calling thread
        #[arg(long)]
        sequential: bool,
        /// Densify output polylines to one vertex per cell size
        #[arg(long)]
        densify: bool,
    },
    /// Print the order in which lines are traced
    Order {
        /// Job file (JSON)
        input: PathBuf,
    },
    /// Show information about a job
    Info {
        /// Job file (JSON)
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} lines ({elapsed})") {
        pb.set_style(style);
    }
    pb
}

fn read_job(path: &Path) -> Result<(Job, AccumulationGrid, Vec<LineRecord>)> {
    let pb = spinner("Reading job...");
    let job = Job::load(path)?;
    let grid = job.accumulation()?;
    pb.set_message("Computing deviation surfaces...");
    let lines = job.records(&grid)?;
    pb.finish_and_clear();
    let (rows, cols) = grid.shape();
    info!("Input: {} x {}, {} lines", cols, rows, lines.len());
    Ok((job, grid, lines))
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let job = Job::load(&input)?;
            let raster = job.grid.to_raster()?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nAccumulation:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
            println!("\nLines: {}", job.lines.len());
            let with_deviation = job.lines.iter().filter(|l| l.deviation.is_some()).count();
            println!("  With deviation grid: {}", with_deviation);
        }

        Commands::Order { input } => {
            let (_, grid, lines) = read_job(&input)?;
            let order = processing_order(&lines, grid.cell_size()).context("Failed to order lines")?;
            for (pos, line) in order.iter().filter_map(|&i| lines.get(i)).enumerate() {
                println!("{:>4}  {}", pos + 1, line.id);
            }
        }

        Commands::Trace {
            input,
            output,
            min_accumulation,
            radius,
            deviation,
            max_steps,
            threads,
            sequential,
            densify,
        } => {
            let (job, grid, lines) = read_job(&input)?;
            let params = TraceParams {
                min_accumulation: min_accumulation.unwrap_or(job.params.min_accumulation),
                search_radius: radius.unwrap_or(job.params.search_radius),
                deviation_tolerance: deviation.unwrap_or(job.params.deviation_tolerance),
                max_steps: max_steps.or(job.params.max_steps),
                penalty: job.params.penalty,
            };
            let mode = if sequential {
                ProcessingMode::Sequential
            } else {
                ProcessingMode::from_threads(threads)
            };
            let workers = match mode {
                ProcessingMode::Sequential => 1,
                ProcessingMode::Parallel => num_cpus(),
                ProcessingMode::ParallelWith(n) => n,
            };
            info!("Tracing with {} worker thread(s)", workers);
            debug!("Parameters: {:?}, mode: {:?}", params, mode);

            let start = Instant::now();
            let pb = progress_bar(lines.len());
            let paths = trace_counterparts(&grid, &lines, &params, mode, |done, _| {
                pb.set_position(done as u64);
            })
            .context("Failed to trace counterpart streams")?;
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            for failed in &paths.failed {
                if failed.error.is_line_failure() {
                    warn!("Line {}: {}", failed.id, failed.error);
                } else {
                    error!("Line {}: {}", failed.id, failed.error);
                }
            }
            info!(
                "Traced {} of {} lines ({} left for fallback)",
                paths.traced.len(),
                lines.len(),
                paths.failed.len()
            );

            let densify_to = densify.then(|| grid.cell_size());
            let report = Report::new(&paths, &lines, grid.transform(), params.penalty, densify_to);
            debug!("Processing order: {:?}", report.order);
            report.save(&output)?;
            done("Counterpart streams", &output, elapsed);
        }
    }

    Ok(())
}
