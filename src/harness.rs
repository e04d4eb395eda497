//! Test harness: drive N concurrent workers against one service.
//!
//! The harness spawns real OS threads, not cooperative tasks, each issuing
//! a fixed number of sequential, blocking [`next_id`](crate::services::Sequence::next_id)
//! calls against one shared service instance. Workers never communicate with
//! each other; every id a worker observes is recorded in call order and
//! handed to the [`validate`] module once all workers have joined.
//!
//! This is a correctness-proving harness, not a production service: a single
//! violation fails the strategy's run, and nothing is retried.
//!
//! # Examples
//!
//! ```rust
//! use sequenza::harness;
//! use sequenza::services::atomic::Atomic;
//!
//! let service = Atomic::new().with_name("atomic");
//! let report = harness::run(&service, 10, 1000).unwrap();
//!
//! assert!(report.passed());
//! assert_eq!(report.max_observed, 10_000);
//! ```

pub mod report;
pub mod validate;

use std::thread;
use std::time::Instant;

use crate::services::{Result, Sequence, SequenceError};

pub use report::RunReport;
pub use validate::{validate, Violation};

/// Violations beyond this many are logged as a single summary line.
const MAX_LOGGED_VIOLATIONS: usize = 8;

/// Drives `workers` concurrent threads, each issuing `calls_per_worker`
/// sequential calls against `service`, and validates the observations.
///
/// The concurrent phase is timed with wall-clock time; validation happens
/// after the clock stops. Invariant violations do not error (they are part
/// of the [`RunReport`]), but a [`SequenceError`] from any worker aborts the
/// run and is returned as the harness error.
///
/// # Errors
///
/// Returns the first [`SequenceError`] any worker hit, e.g.
/// [`SequenceError::Stopped`] when driving a service that was shut down.
pub fn run<S>(service: &S, workers: usize, calls_per_worker: usize) -> Result<RunReport>
where
    S: Sequence + Sync,
{
    let expected_total = workers as u64 * calls_per_worker as u64;
    log::debug!(
        "run start: service={} workers={} calls_per_worker={}",
        service.name(),
        workers,
        calls_per_worker
    );

    let started = Instant::now();
    let results: Vec<std::result::Result<Vec<u64>, SequenceError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(move || {
                    let mut observed = Vec::with_capacity(calls_per_worker);
                    for _ in 0..calls_per_worker {
                        observed.push(service.next_id()?);
                    }
                    Ok(observed)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    let elapsed = started.elapsed();

    let mut samples = Vec::with_capacity(workers);
    for result in results {
        samples.push(result?);
    }

    let violations = validate(&samples, expected_total);
    for violation in violations.iter().take(MAX_LOGGED_VIOLATIONS) {
        log::warn!("{}: {}", service.name(), violation);
    }
    if violations.len() > MAX_LOGGED_VIOLATIONS {
        log::warn!(
            "{}: ... and {} more violations",
            service.name(),
            violations.len() - MAX_LOGGED_VIOLATIONS
        );
    }

    let max_observed = samples.iter().flatten().copied().max().unwrap_or(0);
    log::debug!(
        "run finish: service={} max={} elapsed={:?} violations={}",
        service.name(),
        max_observed,
        elapsed,
        violations.len()
    );

    Ok(RunReport {
        name: service.name(),
        workers,
        calls_per_worker,
        expected_total,
        max_observed,
        elapsed,
        violations,
    })
}
