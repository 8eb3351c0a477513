//! Contended counter across child processes with a file lock
//!
//! The parent re-launches its own executable once per worker with the
//! `--child-*` flags. The counter lives in a memory-mapped file
//! ([`SharedCounter`]) and exclusion is an advisory lock on a second file,
//! which each process opens separately. The parent holds that lock while the
//! trial is armed, waits until every child has bumped the ready count, then
//! resets the counter to 0, starts the timer and unlocks.

use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use fslock::LockFile;
use tracing::debug;

use super::contended::{ContendedWorkload, ARMED_SENTINEL};
use super::outcome::{is_increment_step, reserve_hint, TrialOutcome};
use super::shared_counter::SharedCounter;
use crate::benchmark::timer::Timer;
use crate::utils::{BenchmarkError, Result};

/// Oversubscription factors swept by the process mode, in order
pub const PROCESS_FACTORS: [usize; 5] = [1, 2, 4, 8, 16];

/// How often the parent re-checks the ready count
const READY_POLL: Duration = Duration::from_micros(200);

/// Process-per-worker contended counter
#[derive(Debug, Clone)]
pub struct ProcessMutexWorkload {
    exe: PathBuf,
}

impl ProcessMutexWorkload {
    /// Workload whose children run `exe`
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Workload whose children re-run the current executable
    pub fn current() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    fn spawn_child(&self, counter_path: &Path, lock_path: &Path, steps: u64) -> Result<Child> {
        let child = Command::new(&self.exe)
            .arg("--quiet")
            .arg("--child-counter")
            .arg(counter_path)
            .arg("--child-lock")
            .arg(lock_path)
            .arg("--child-steps")
            .arg(steps.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()?;
        Ok(child)
    }
}

impl ContendedWorkload for ProcessMutexWorkload {
    fn kind(&self) -> &'static str {
        "Process"
    }

    /// Truncating split with no floor
    fn per_worker_iterations(&self, iterations: u64, concurrency: usize) -> u64 {
        iterations / concurrency.max(1) as u64
    }

    fn label(&self, factor: usize) -> String {
        format!("{} (Lock, oversub={})", self.kind(), factor)
    }

    fn run(&self, iterations: u64, concurrency: usize) -> Result<TrialOutcome> {
        if concurrency == 0 {
            return Err(BenchmarkError::Config(
                "process workload needs at least one child".to_string(),
            ));
        }
        let steps = self.per_worker_iterations(iterations, concurrency);
        debug!("Process trial: {} children x {} steps", concurrency, steps);

        let dir = tempfile::Builder::new().prefix("crud-bench-").tempdir()?;
        let counter_path = dir.path().join("counter");
        let lock_path = dir.path().join("lock");

        let shared = SharedCounter::create(&counter_path)?;
        shared.value().store(ARMED_SENTINEL, Ordering::SeqCst);

        let mut lock = open_lock(&lock_path)?;
        lock.lock().map_err(|e| lock_error(&lock_path, e))?;

        let mut children = ChildGroup(Vec::with_capacity(concurrency));
        for _ in 0..concurrency {
            children
                .0
                .push(self.spawn_child(&counter_path, &lock_path, steps)?);
        }

        while (shared.ready().load(Ordering::SeqCst) as usize) < concurrency {
            children.check_running()?;
            thread::sleep(READY_POLL);
        }

        shared.value().store(0, Ordering::SeqCst);
        let timer = Timer::start();
        lock.unlock().map_err(|e| lock_error(&lock_path, e))?;

        children.wait_all()?;
        let duration = timer.stop();

        Ok(TrialOutcome {
            final_value: shared.value().load(Ordering::SeqCst),
            duration,
        })
    }
}

/// Children of one trial; any still running when dropped are killed
struct ChildGroup(Vec<Child>);

impl ChildGroup {
    /// Fail if a child exited before the start signal
    fn check_running(&mut self) -> Result<()> {
        for child in &mut self.0 {
            if let Some(status) = child.try_wait()? {
                return Err(BenchmarkError::Worker(format!(
                    "child process {} exited before start: {}",
                    child.id(),
                    status
                )));
            }
        }
        Ok(())
    }

    fn wait_all(&mut self) -> Result<()> {
        for child in &mut self.0 {
            let status = child.wait()?;
            if !status.success() {
                return Err(BenchmarkError::Worker(format!(
                    "child process {} failed: {}",
                    child.id(),
                    status
                )));
            }
        }
        Ok(())
    }
}

impl Drop for ChildGroup {
    fn drop(&mut self) {
        for child in &mut self.0 {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

fn open_lock(path: &Path) -> Result<LockFile> {
    LockFile::open(path).map_err(|e| lock_error(path, e))
}

fn lock_error(path: &Path, e: impl std::fmt::Display) -> BenchmarkError {
    BenchmarkError::Lock(format!("{}: {}", path.display(), e))
}

/// Child body: report ready, wait for the start signal, run `steps` locked
/// steps against the shared counter
pub fn run_child(counter_path: &Path, lock_path: &Path, steps: u64) -> Result<i64> {
    let shared = SharedCounter::open(counter_path)?;
    let mut lock = open_lock(lock_path)?;

    shared.ready().fetch_add(1, Ordering::SeqCst);
    // Unguarded read; the parent holds the lock until after it stores 0
    while shared.value().load(Ordering::SeqCst) < 0 {
        thread::yield_now();
    }

    let mut seen = Vec::with_capacity(reserve_hint(steps));
    for step in 0..steps {
        lock.lock().map_err(|e| lock_error(lock_path, e))?;
        let mut value = shared.value().load(Ordering::SeqCst);
        if is_increment_step(step) {
            value += 1;
            shared.value().store(value, Ordering::SeqCst);
        }
        lock.unlock().map_err(|e| lock_error(lock_path, e))?;
        seen.push(value);
    }
    Ok(black_box(&seen).last().copied().unwrap_or(0))
}
