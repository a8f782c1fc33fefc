//! Synthetic trip fixtures
//!
//! Generates plausible ride-hailing trips for demos, tests and benchmarks,
//! and writes them in the CSV layout the store reads.

pub mod generator;

pub use generator::{GeneratorConfig, TripGenerator, write_csv, write_csv_file};
