//! Command-line argument parsing
//!
//! The two positionals are kept as raw strings so the driver can print its
//! own usage and invalid-mode messages, and so a bad iteration count surfaces
//! as a configuration error rather than a clap usage error. Positionals past
//! the mode are accepted and ignored.
//!
//! The hidden `--child-*` flags are how the process workload re-launches this
//! executable as one of its workers.

use clap::Parser;
use std::path::PathBuf;

/// Cross-runtime micro-benchmark: counter loops, JSON and mutex contention
#[derive(Parser, Debug, Clone)]
#[command(name = "crud-bench")]
#[command(version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct CliArgs {
    /// Iterations per trial
    pub iterations: Option<String>,

    /// Benchmark mode: simple, json, thread, async, process or all
    pub mode: Option<String>,

    /// Extra positionals, ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Run as a process-workload child against this shared counter file
    #[arg(long = "child-counter", hide = true, requires = "child_lock")]
    pub child_counter: Option<PathBuf>,

    /// Lock file guarding the shared counter
    #[arg(long = "child-lock", hide = true)]
    pub child_lock: Option<PathBuf>,

    /// Steps the child runs
    #[arg(long = "child-steps", hide = true, default_value_t = 0)]
    pub child_steps: u64,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Both positionals were supplied
    pub fn has_positionals(&self) -> bool {
        self.iterations.is_some() && self.mode.is_some()
    }

    /// Launched as a process-workload child
    pub fn is_child(&self) -> bool {
        self.child_counter.is_some()
    }

    /// Usage line printed when positionals are missing
    pub fn usage(program: &str) -> String {
        format!("Usage: {} <iterations> <mode>", program)
    }
}
