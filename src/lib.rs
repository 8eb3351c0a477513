//! crud-bench library
//!
//! Micro-benchmark harness comparing counter, JSON and mutex-contention
//! throughput across language runtimes.

pub mod benchmark;
pub mod config;
pub mod driver;
pub mod metrics;
pub mod utils;
pub mod workload;
