//! Result reporting
//!
//! One pipe-delimited row per trial, appended to the shared results file.

pub mod reporter;

pub use reporter::{ResultReporter, TrialResult, DEFAULT_RESULTS_FILE, LANGUAGE_TAG};
