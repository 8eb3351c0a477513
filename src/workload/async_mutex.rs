//! Contended counter on tokio tasks with an async mutex
//!
//! Workers are tasks multiplexed onto a multi-thread runtime. Exclusion is a
//! `tokio::sync::Mutex`, so a worker waiting for the counter yields its
//! runtime thread instead of blocking it.

use std::hint::black_box;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::{Barrier, Mutex};
use tracing::debug;

use super::contended::{ContendedWorkload, ARMED_SENTINEL};
use super::outcome::{is_increment_step, reserve_hint, TrialOutcome};
use crate::benchmark::timer::Timer;
use crate::utils::{BenchmarkError, Result};

struct TrialState {
    counter: Mutex<i64>,
    ready: Barrier,
}

/// Task-per-worker contended counter
///
/// Owns the runtime its trials run on; build it once per sweep.
pub struct AsyncMutexWorkload {
    runtime: Runtime,
}

impl AsyncMutexWorkload {
    /// Create a workload backed by a runtime with `worker_threads` threads
    pub fn new(worker_threads: usize) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("async-worker")
            .build()
            .map_err(|e| BenchmarkError::Runtime(format!("Failed to create tokio runtime: {}", e)))?;
        Ok(Self { runtime })
    }
}

impl ContendedWorkload for AsyncMutexWorkload {
    fn kind(&self) -> &'static str {
        "Async"
    }

    /// Truncating split with no floor: tasks may get zero steps
    fn per_worker_iterations(&self, iterations: u64, concurrency: usize) -> u64 {
        iterations / concurrency.max(1) as u64
    }

    fn run(&self, iterations: u64, concurrency: usize) -> Result<TrialOutcome> {
        if concurrency == 0 {
            return Err(BenchmarkError::Config(
                "async workload needs at least one task".to_string(),
            ));
        }
        let steps = self.per_worker_iterations(iterations, concurrency);
        debug!("Async trial: {} tasks x {} steps", concurrency, steps);

        self.runtime.block_on(run_trial(concurrency, steps))
    }
}

async fn run_trial(concurrency: usize, steps: u64) -> Result<TrialOutcome> {
    let state = Arc::new(TrialState {
        counter: Mutex::new(ARMED_SENTINEL),
        ready: Barrier::new(concurrency + 1),
    });

    let mut armed = state.counter.lock().await;

    let mut tasks = Vec::with_capacity(concurrency);
    for _ in 0..concurrency {
        let state = Arc::clone(&state);
        tasks.push(tokio::spawn(async move { mutex_task(&state, steps).await }));
    }

    state.ready.wait().await;

    *armed = 0;
    let timer = Timer::start();
    drop(armed);

    for task in tasks {
        task.await
            .map_err(|e| BenchmarkError::Worker(format!("async mutex task failed: {}", e)))?;
    }
    let duration = timer.stop();

    let final_value = *state.counter.lock().await;
    Ok(TrialOutcome {
        final_value,
        duration,
    })
}

async fn mutex_task(state: &TrialState, steps: u64) -> i64 {
    state.ready.wait().await;

    loop {
        let started = *state.counter.lock().await >= 0;
        if started {
            break;
        }
        tokio::task::yield_now().await;
    }

    let mut seen = Vec::with_capacity(reserve_hint(steps));
    for step in 0..steps {
        let mut counter = state.counter.lock().await;
        if is_increment_step(step) {
            *counter += 1;
        }
        seen.push(*counter);
    }
    black_box(&seen).last().copied().unwrap_or(0)
}
