//! crud-bench - cross-runtime micro-benchmark
//!
//! Runs one workload mode for a given iteration count and appends one row
//! per trial to `benchmark.csv`.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use crud_bench::config::CliArgs;
use crud_bench::driver::{run_with, DriverOutcome};
use crud_bench::metrics::DEFAULT_RESULTS_FILE;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn program_name() -> String {
    std::env::args()
        .next()
        .and_then(|p| {
            std::path::Path::new(&p)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();

    setup_logging(args.verbose, args.quiet);

    match run_with(&args, PathBuf::from(DEFAULT_RESULTS_FILE))? {
        DriverOutcome::Usage => println!("{}", CliArgs::usage(&program_name())),
        DriverOutcome::InvalidMode => println!("Invalid mode."),
        DriverOutcome::Child(_) | DriverOutcome::Ran(_) => {}
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
