//! Benchmark orchestrator
//!
//! Dispatches a mode to its workloads, sweeps the oversubscription factors for
//! the contended ones, and hands every finished trial to the reporter.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::BenchmarkConfig;
use crate::metrics::{ResultReporter, TrialResult};
use crate::utils::Result;
use crate::workload::{
    concurrency_for, run_int_loop, run_json_loop, AsyncMutexWorkload, ContendedWorkload, Mode,
    ProcessMutexWorkload, ThreadMutexWorkload, TrialOutcome, INT_LABEL, JSON_LABEL,
    OVERSUBSCRIPTION_FACTORS, PROCESS_FACTORS,
};

/// Benchmark orchestrator
pub struct Orchestrator {
    config: Arc<BenchmarkConfig>,
    reporter: ResultReporter,
}

impl Orchestrator {
    /// Create orchestrator writing to the configured results file
    pub fn new(config: BenchmarkConfig) -> Self {
        let reporter = ResultReporter::new(config.output_path.clone(), config.language_tag.clone());
        Self {
            config: Arc::new(config),
            reporter,
        }
    }

    /// Results reporter in use
    pub fn reporter(&self) -> &ResultReporter {
        &self.reporter
    }

    /// Run every trial of a mode, in order
    ///
    /// Rows are appended as each trial finishes, so an error part-way
    /// through leaves the earlier rows on disk.
    pub fn run(&self, mode: Mode) -> Result<Vec<TrialResult>> {
        match mode {
            Mode::Simple => Ok(vec![self.run_simple_int()?]),
            Mode::Json => Ok(vec![self.run_simple_json()?]),
            Mode::Thread => self.sweep(&ThreadMutexWorkload::new(), &OVERSUBSCRIPTION_FACTORS),
            Mode::Async => {
                let workload = AsyncMutexWorkload::new(self.config.parallelism)?;
                self.sweep(&workload, &OVERSUBSCRIPTION_FACTORS)
            }
            Mode::Process => self.sweep(&ProcessMutexWorkload::current()?, &PROCESS_FACTORS),
            // In-process workloads only; process mode re-launches the binary
            Mode::All => {
                let mut results = vec![self.run_simple_int()?, self.run_simple_json()?];
                results.extend(self.sweep(&ThreadMutexWorkload::new(), &[1])?);
                let workload = AsyncMutexWorkload::new(self.config.parallelism)?;
                results.extend(self.sweep(&workload, &[1])?);
                Ok(results)
            }
        }
    }

    /// Single-threaded integer loop trial
    pub fn run_simple_int(&self) -> Result<TrialResult> {
        let outcome = run_int_loop(self.config.iterations);
        self.record(INT_LABEL.to_string(), outcome)
    }

    /// Single-threaded JSON loop trial
    pub fn run_simple_json(&self) -> Result<TrialResult> {
        let outcome = run_json_loop(self.config.iterations)?;
        self.record(JSON_LABEL.to_string(), outcome)
    }

    /// Run a contended workload once per oversubscription factor
    pub fn sweep(
        &self,
        workload: &dyn ContendedWorkload,
        factors: &[usize],
    ) -> Result<Vec<TrialResult>> {
        let pb = if self.config.quiet || factors.len() < 2 {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(factors.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(factors.len());
        for &factor in factors {
            let concurrency = concurrency_for(self.config.parallelism, factor);
            pb.set_message(format!("{} workers", concurrency));

            let outcome = workload.run(self.config.iterations, concurrency)?;
            results.push(self.record(workload.label(factor), outcome)?);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(results)
    }

    /// Report a finished trial
    fn record(&self, label: String, outcome: TrialOutcome) -> Result<TrialResult> {
        let result = TrialResult::new(
            label,
            self.config.iterations,
            outcome.duration,
            outcome.final_value,
        );
        self.reporter.append(&result)?;

        info!(
            "{}: {} ops/s in {:.3}s (final value {})",
            result.label,
            format_count(result.ops_per_sec),
            outcome.duration.as_secs_f64(),
            result.last_value
        );
        Ok(result)
    }
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
