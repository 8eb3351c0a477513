//! Contended counter on OS threads with a blocking mutex
//!
//! One named thread per worker. The counter lives in a `parking_lot::Mutex`
//! that the initiator holds while the trial is armed; workers block on it
//! after passing the ready barrier and only start once it reads 0.

use std::hint::black_box;
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;
use tracing::debug;

use super::contended::{ContendedWorkload, ARMED_SENTINEL};
use super::outcome::{is_increment_step, reserve_hint, TrialOutcome};
use crate::benchmark::timer::Timer;
use crate::utils::{BenchmarkError, Result};

/// State shared by the initiator and every worker of one trial
struct TrialState {
    counter: Mutex<i64>,
    ready: Barrier,
}

/// Thread-per-worker contended counter
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadMutexWorkload;

impl ThreadMutexWorkload {
    pub fn new() -> Self {
        Self
    }
}

impl ContendedWorkload for ThreadMutexWorkload {
    fn kind(&self) -> &'static str {
        "Thread"
    }

    /// Truncating split with a floor of one step per worker
    fn per_worker_iterations(&self, iterations: u64, concurrency: usize) -> u64 {
        (iterations / concurrency.max(1) as u64).max(1)
    }

    fn run(&self, iterations: u64, concurrency: usize) -> Result<TrialOutcome> {
        if concurrency == 0 {
            return Err(BenchmarkError::Config(
                "thread workload needs at least one worker".to_string(),
            ));
        }
        let steps = self.per_worker_iterations(iterations, concurrency);
        debug!("Thread trial: {} workers x {} steps", concurrency, steps);

        let state = Arc::new(TrialState {
            counter: Mutex::new(ARMED_SENTINEL),
            ready: Barrier::new(concurrency + 1),
        });

        // Armed: hold the counter lock until every worker is parked on it
        let mut armed = state.counter.lock();

        let mut handles: Vec<thread::JoinHandle<i64>> = Vec::with_capacity(concurrency);
        for worker_id in 0..concurrency {
            let state = Arc::clone(&state);
            let handle = thread::Builder::new()
                .name(format!("mutex-worker-{}", worker_id))
                .spawn(move || mutex_worker(&state, steps))?;
            handles.push(handle);
        }

        state.ready.wait();

        *armed = 0;
        let timer = Timer::start();
        drop(armed);

        for handle in handles {
            handle
                .join()
                .map_err(|_| BenchmarkError::Worker("mutex worker thread panicked".to_string()))?;
        }
        let duration = timer.stop();

        let final_value = *state.counter.lock();
        Ok(TrialOutcome {
            final_value,
            duration,
        })
    }
}

/// Worker body: wait for the start signal, then run `steps` locked steps
fn mutex_worker(state: &TrialState, steps: u64) -> i64 {
    state.ready.wait();

    // Blocks while the initiator still holds the armed lock
    loop {
        let started = *state.counter.lock() >= 0;
        if started {
            break;
        }
        thread::yield_now();
    }

    let mut seen = Vec::with_capacity(reserve_hint(steps));
    for step in 0..steps {
        let mut counter = state.counter.lock();
        if is_increment_step(step) {
            *counter += 1;
        }
        seen.push(*counter);
    }
    black_box(&seen).last().copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_has_floor_of_one() {
        let workload = ThreadMutexWorkload::new();
        assert_eq!(workload.per_worker_iterations(1000, 8), 125);
        assert_eq!(workload.per_worker_iterations(1001, 8), 125);
        assert_eq!(workload.per_worker_iterations(3, 8), 1);
        assert_eq!(workload.per_worker_iterations(0, 8), 1);
    }

    #[test]
    fn test_no_lost_updates() {
        let workload = ThreadMutexWorkload::new();
        for concurrency in [1usize, 2, 4, 16] {
            let outcome = workload.run(10_000, concurrency).unwrap();
            assert_eq!(
                outcome.final_value,
                workload.expected_final_value(10_000, concurrency),
                "concurrency={}",
                concurrency
            );
        }
    }

    #[test]
    fn test_more_workers_than_iterations() {
        let workload = ThreadMutexWorkload::new();
        // Every worker still takes one step, which increments
        let outcome = workload.run(5, 32).unwrap();
        assert_eq!(outcome.final_value, 32);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let workload = ThreadMutexWorkload::new();
        assert!(matches!(
            workload.run(100, 0),
            Err(BenchmarkError::Config(_))
        ));
    }

    #[test]
    fn test_label() {
        assert_eq!(
            ThreadMutexWorkload::new().label(8),
            "Thread (mutex, oversub=8)"
        );
    }
}
