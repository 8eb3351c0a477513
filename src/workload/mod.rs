//! Benchmark workloads
//!
//! This module provides:
//! - Mode parsing for the command line
//! - Single-threaded integer and JSON loops
//! - Contended counter workloads on OS threads, tokio tasks and child
//!   processes

pub mod async_mutex;
pub mod contended;
pub mod mode;
pub mod outcome;
pub mod process_mutex;
pub mod shared_counter;
pub mod simple;
pub mod thread_mutex;

pub use async_mutex::AsyncMutexWorkload;
pub use contended::{concurrency_for, ContendedWorkload, OVERSUBSCRIPTION_FACTORS};
pub use mode::Mode;
pub use outcome::{increments_for, TrialOutcome};
pub use process_mutex::{run_child, ProcessMutexWorkload, PROCESS_FACTORS};
pub use shared_counter::SharedCounter;
pub use simple::{run_int_loop, run_json_loop, INT_LABEL, JSON_LABEL};
pub use thread_mutex::ThreadMutexWorkload;
