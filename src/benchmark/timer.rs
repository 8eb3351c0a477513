//! Monotonic trial timer and throughput calculation

use std::time::{Duration, Instant};

/// Measures the timed region of a single trial
///
/// Backed by `Instant`, so wall-clock adjustments during a run do not skew
/// the result.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start timing now
    #[inline]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop timing and return the elapsed interval
    #[inline]
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

/// Operations per second, truncated to an integer
///
/// Returns 0 for a zero-length interval instead of an overflowed value.
pub fn ops_per_sec(iterations: u64, duration: Duration) -> u64 {
    let secs = duration.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (iterations as f64 / secs) as u64
}
