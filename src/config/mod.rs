//! Configuration module

pub mod benchmark_config;
pub mod cli;

pub use benchmark_config::{detect_parallelism, parse_iterations, BenchmarkConfig};
pub use cli::CliArgs;
