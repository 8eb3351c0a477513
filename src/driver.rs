//! Command-line driver
//!
//! Everything `main` does short of logging setup and printing, so each exit
//! path can be exercised without spawning the binary.

use std::path::PathBuf;

use tracing::info;

use crate::benchmark::{format_count, Orchestrator};
use crate::config::{BenchmarkConfig, CliArgs};
use crate::metrics::TrialResult;
use crate::utils::{BenchmarkError, Result};
use crate::workload::run_child;

/// What a driver run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutcome {
    /// Positionals missing; the caller prints the usage line
    Usage,
    /// Mode not recognized; the caller prints `Invalid mode.`
    InvalidMode,
    /// Ran as a process-workload child, with the last value it observed
    Child(i64),
    /// Trials ran and were appended to the results file
    Ran(Vec<TrialResult>),
}

/// Run the benchmark the arguments describe, appending to `output_path`
///
/// Nothing is written for [`DriverOutcome::Usage`] or
/// [`DriverOutcome::InvalidMode`]. A bad iteration count is an error.
pub fn run_with(args: &CliArgs, output_path: PathBuf) -> Result<DriverOutcome> {
    if args.is_child() {
        return run_as_child(args).map(DriverOutcome::Child);
    }

    if !args.has_positionals() {
        return Ok(DriverOutcome::Usage);
    }

    let mut config = BenchmarkConfig::from_cli(args)?;
    config.output_path = output_path;

    let Some(mode) = config.mode else {
        return Ok(DriverOutcome::InvalidMode);
    };

    info!(
        "crud-bench v{}: mode={} iterations={} parallelism={}",
        env!("CARGO_PKG_VERSION"),
        mode,
        format_count(config.iterations),
        config.parallelism
    );

    let orchestrator = Orchestrator::new(config);
    let results = orchestrator.run(mode)?;

    info!(
        "{} trial(s) appended to {}",
        results.len(),
        orchestrator.reporter().path().display()
    );
    Ok(DriverOutcome::Ran(results))
}

fn run_as_child(args: &CliArgs) -> Result<i64> {
    let (Some(counter_path), Some(lock_path)) = (&args.child_counter, &args.child_lock) else {
        return Err(BenchmarkError::Config(
            "--child-counter needs --child-lock".to_string(),
        ));
    };
    run_child(counter_path, lock_path, args.child_steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_missing_positionals_is_usage() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("benchmark.csv");

        for argv in [&["test"][..], &["test", "100"][..]] {
            let outcome = run_with(&args(argv), output.clone()).unwrap();
            assert_eq!(outcome, DriverOutcome::Usage);
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("benchmark.csv");

        let outcome = run_with(&args(&["test", "100", "bogus"]), output.clone()).unwrap();
        assert_eq!(outcome, DriverOutcome::InvalidMode);
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_iterations_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("benchmark.csv");

        let result = run_with(&args(&["test", "lots", "simple"]), output.clone());
        assert!(matches!(result, Err(BenchmarkError::Config(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_simple_mode_appends_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("benchmark.csv");

        let outcome = run_with(&args(&["test", "100", "simple", "-q"]), output.clone()).unwrap();
        let DriverOutcome::Ran(results) = outcome else {
            panic!("expected trials, got {:?}", outcome);
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Single Thread INT");
        assert_eq!(results[0].last_value, "10");

        let contents = std::fs::read_to_string(&output).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("rust|Single Thread INT|"));
        assert!(contents.ends_with("|10\n"));
    }

    #[test]
    fn test_extra_positionals_still_run() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("benchmark.csv");

        let outcome =
            run_with(&args(&["test", "10", "simple", "extra", "-q"]), output.clone()).unwrap();
        assert!(matches!(outcome, DriverOutcome::Ran(ref rows) if rows.len() == 1));
        assert!(output.exists());
    }

    #[test]
    fn test_child_flags_run_child_loop() {
        use crate::workload::SharedCounter;

        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("counter");
        let lock = dir.path().join("lock");
        let output = dir.path().join("benchmark.csv");
        // Created at 0, so the child starts immediately
        let shared = SharedCounter::create(&counter).unwrap();

        let argv = [
            "test",
            "--child-counter",
            counter.to_str().unwrap(),
            "--child-lock",
            lock.to_str().unwrap(),
            "--child-steps",
            "30",
        ];
        let outcome = run_with(&args(&argv), output.clone()).unwrap();
        assert_eq!(outcome, DriverOutcome::Child(3));
        assert_eq!(shared.value().load(std::sync::atomic::Ordering::SeqCst), 3);
        assert_eq!(shared.ready().load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(!output.exists());
    }
}
