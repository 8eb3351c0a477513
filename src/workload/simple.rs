//! Single-threaded workloads
//!
//! Both loops share the same stepping pattern: the counter is bumped on every
//! 10th step and every step records what it observed. The JSON loop also
//! serializes a small record per step, so the difference between the two rows
//! is the serialization cost.

use std::convert::Infallible;
use std::hint::black_box;

use serde::Serialize;

use super::outcome::{is_increment_step, reserve_hint, TrialOutcome};
use crate::benchmark::timer::Timer;
use crate::utils::Result;

/// Label of the integer loop row
pub const INT_LABEL: &str = "Single Thread INT";

/// Label of the JSON loop row
pub const JSON_LABEL: &str = "Single Thread JSON";

/// Record serialized on every JSON loop step
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    name: &'a str,
    value: i64,
}

/// Shared stepping pattern: bump on the 10th-step cadence, run `on_step`
/// with the current value, record it
fn record_steps<E>(
    iterations: u64,
    mut on_step: impl FnMut(i64) -> std::result::Result<(), E>,
) -> std::result::Result<Vec<i64>, E> {
    let mut counter: i64 = 0;
    let mut seen = Vec::with_capacity(reserve_hint(iterations));
    for step in 0..iterations {
        if is_increment_step(step) {
            counter += 1;
        }
        on_step(counter)?;
        seen.push(counter);
    }
    Ok(seen)
}

/// Run the integer increment loop
pub fn run_int_loop(iterations: u64) -> TrialOutcome {
    let timer = Timer::start();

    let seen = match record_steps(iterations, |_| Ok::<(), Infallible>(())) {
        Ok(seen) => seen,
        Err(never) => match never {},
    };
    let last = black_box(&seen).last().copied().unwrap_or(0);

    TrialOutcome {
        final_value: last,
        duration: timer.stop(),
    }
}

/// Run the JSON serialization loop
pub fn run_json_loop(iterations: u64) -> Result<TrialOutcome> {
    let timer = Timer::start();

    let mut buf = Vec::with_capacity(64);
    let seen = record_steps(iterations, |value| {
        buf.clear();
        serde_json::to_writer(&mut buf, &JsonRecord { name: "name", value })?;
        black_box(&buf);
        Ok::<(), serde_json::Error>(())
    })?;
    let last = black_box(&seen).last().copied().unwrap_or(0);

    Ok(TrialOutcome {
        final_value: last,
        duration: timer.stop(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::outcome::increments_for;

    #[test]
    fn test_int_loop_hundred_iterations() {
        let outcome = run_int_loop(100);
        assert_eq!(outcome.final_value, 10);
    }

    #[test]
    fn test_int_loop_final_value_formula() {
        for iterations in [1u64, 2, 9, 10, 11, 19, 20, 21, 999, 1000, 1001] {
            let outcome = run_int_loop(iterations);
            assert_eq!(
                outcome.final_value,
                ((iterations - 1) / 10 + 1) as i64,
                "iterations={}",
                iterations
            );
        }
    }

    #[test]
    fn test_int_loop_zero_iterations() {
        assert_eq!(run_int_loop(0).final_value, 0);
    }

    #[test]
    fn test_json_loop_counts_like_int_loop() {
        for iterations in [1u64, 10, 55, 100] {
            let outcome = run_json_loop(iterations).unwrap();
            assert_eq!(outcome.final_value, increments_for(iterations) as i64);
        }
    }

    #[test]
    fn test_record_steps_records_every_step() {
        let mut observed = Vec::new();
        let seen = record_steps(25, |value| {
            observed.push(value);
            Ok::<(), Infallible>(())
        })
        .unwrap();

        assert_eq!(seen.len(), 25);
        assert_eq!(seen, observed);
        assert_eq!(seen[0], 1);
        assert_eq!(seen[9], 1);
        assert_eq!(seen[10], 2);
        assert_eq!(seen[24], 3);
    }

    #[test]
    fn test_record_steps_stops_on_error() {
        let mut calls = 0;
        let result = record_steps(100, |_| {
            calls += 1;
            if calls == 3 {
                Err("serialize failed")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("serialize failed"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_json_record_shape() {
        let json = serde_json::to_string(&JsonRecord {
            name: "name",
            value: 7,
        })
        .unwrap();
        assert_eq!(json, r#"{"name":"name","value":7}"#);
    }
}
