//! Benchmark orchestration and timing
//!
//! This module provides:
//! - Timer: monotonic measurement of a trial's timed region
//! - Orchestrator: mode dispatch, oversubscription sweep and reporting

pub mod orchestrator;
pub mod timer;

pub use orchestrator::{format_count, Orchestrator};
pub use timer::{ops_per_sec, Timer};
