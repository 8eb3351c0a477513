//! Result of one timed workload run

use std::time::Duration;

/// What a workload hands back once its timed region has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Final value of the trial's shared counter
    pub final_value: i64,
    /// Length of the timed region
    pub duration: Duration,
}

/// Number of counter increments performed by `steps` loop steps
///
/// Steps are 0-indexed and every 10th step (0, 10, 20, ...) increments.
#[inline]
pub fn increments_for(steps: u64) -> u64 {
    steps.div_ceil(10)
}

/// Step predicate shared by every loop: increment on 0, 10, 20, ...
#[inline]
pub(crate) fn is_increment_step(step: u64) -> bool {
    step % 10 == 0
}

/// Upper bound on the up-front reservation for a per-step results vector
const MAX_RESERVE: usize = 1 << 20;

/// Capacity to reserve for `steps` recorded values
///
/// Capped so a huge iteration count grows the vector instead of failing the
/// allocation up front, and never truncated on narrow targets.
#[inline]
pub(crate) fn reserve_hint(steps: u64) -> usize {
    usize::try_from(steps).map_or(MAX_RESERVE, |n| n.min(MAX_RESERVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_hint_is_capped() {
        assert_eq!(reserve_hint(0), 0);
        assert_eq!(reserve_hint(1000), 1000);
        assert_eq!(reserve_hint(u64::MAX), MAX_RESERVE);
        assert_eq!(reserve_hint(isize::MAX as u64 / 4), MAX_RESERVE);
    }

    #[test]
    fn test_reserve_hint_allocates_for_huge_counts() {
        let seen: Vec<i64> = Vec::with_capacity(reserve_hint(u64::MAX));
        assert!(seen.capacity() >= MAX_RESERVE);
    }

    #[test]
    fn test_increments_for() {
        assert_eq!(increments_for(0), 0);
        assert_eq!(increments_for(1), 1);
        assert_eq!(increments_for(10), 1);
        assert_eq!(increments_for(11), 2);
        assert_eq!(increments_for(100), 10);
    }

    #[test]
    fn test_matches_closed_form() {
        for n in 1..=250u64 {
            assert_eq!(increments_for(n), (n - 1) / 10 + 1);
        }
    }
}
