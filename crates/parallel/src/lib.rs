//! # Counterpart Parallel
//!
//! Execution strategies for work that splits into independent units, such as
//! tracing one stream line per unit.

pub mod strategy;

pub use strategy::{num_cpus, ParallelStrategy, ProcessingMode};
