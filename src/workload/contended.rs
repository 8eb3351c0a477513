//! Shared interface of the contended-counter workloads
//!
//! The thread, async and process workloads differ only in scheduling
//! substrate and exclusion primitive. Each arms a counter at -1 while the
//! initiator holds the lock, waits for every worker to report ready, then
//! resets the counter to 0, starts the timer and releases.

use super::outcome::{increments_for, TrialOutcome};
use crate::utils::Result;

/// Oversubscription factors swept by the contended modes, in order
pub const OVERSUBSCRIPTION_FACTORS: [usize; 7] = [1, 2, 4, 8, 16, 32, 64];

/// Counter value while a trial is armed but not yet started
pub const ARMED_SENTINEL: i64 = -1;

/// A counter workload run by `concurrency` workers under mutual exclusion
pub trait ContendedWorkload {
    /// Row label prefix ("Thread", "Async", "Process")
    fn kind(&self) -> &'static str;

    /// Loop steps each worker performs for a trial
    fn per_worker_iterations(&self, iterations: u64, concurrency: usize) -> u64;

    /// Run one trial and return the final counter value and timed duration
    fn run(&self, iterations: u64, concurrency: usize) -> Result<TrialOutcome>;

    /// Result row label for an oversubscription factor
    fn label(&self, factor: usize) -> String {
        format!("{} (mutex, oversub={})", self.kind(), factor)
    }

    /// Final counter value a race-free trial must produce
    fn expected_final_value(&self, iterations: u64, concurrency: usize) -> i64 {
        let per_worker = self.per_worker_iterations(iterations, concurrency);
        (increments_for(per_worker) * concurrency as u64) as i64
    }
}

/// Worker count for an oversubscription factor
#[inline]
pub fn concurrency_for(parallelism: usize, factor: usize) -> usize {
    parallelism.max(1) * factor
}
