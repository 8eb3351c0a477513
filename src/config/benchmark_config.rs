//! Benchmark configuration derived from CLI arguments

use super::cli::CliArgs;
use crate::metrics::{DEFAULT_RESULTS_FILE, LANGUAGE_TAG};
use crate::utils::{BenchmarkError, Result};
use crate::workload::Mode;
use std::path::PathBuf;

/// Complete benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Iterations per trial
    pub iterations: u64,
    /// Requested mode, `None` when the name was not recognized
    pub mode: Option<Mode>,
    /// Hardware parallelism the oversubscription factors multiply
    pub parallelism: usize,

    // Output
    pub output_path: PathBuf,
    pub language_tag: String,
    pub quiet: bool,
}

impl BenchmarkConfig {
    /// Create configuration from CLI arguments
    ///
    /// The iteration count is parsed before the mode is looked at, so a bad
    /// count is fatal even when the mode is unknown too.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let (Some(raw_iterations), Some(mode_name)) = (&args.iterations, &args.mode) else {
            return Err(BenchmarkError::Config(
                "expected <iterations> <mode>".to_string(),
            ));
        };

        let iterations = parse_iterations(raw_iterations)?;

        Ok(Self {
            iterations,
            mode: Mode::parse(mode_name),
            parallelism: detect_parallelism(),
            output_path: PathBuf::from(DEFAULT_RESULTS_FILE),
            language_tag: LANGUAGE_TAG.to_string(),
            quiet: args.quiet,
        })
    }
}

/// Parse the iteration count
pub fn parse_iterations(raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        BenchmarkError::Config(format!("invalid iteration count {:?}: {}", raw, e))
    })
}

/// Available hardware parallelism (4 if it cannot be determined)
pub fn detect_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}
