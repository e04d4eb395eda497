//! Invariant validation over a finished run.
//!
//! The validator receives every id each worker observed, in call order, and
//! checks the two contract invariants: per-worker monotonicity and global
//! uniqueness of the issued ids. A violation is a test failure for the
//! strategy under test; nothing is retried.

use thiserror::Error;

/// A broken invariant detected in a run's observations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A worker observed a value lower than one it had already observed.
    #[error("worker {worker}: ids not monotonically increasing: got {got} after {prev}")]
    Monotonicity {
        /// Index of the offending worker.
        worker: usize,
        /// The previously observed value.
        prev: u64,
        /// The later, smaller value.
        got: u64,
    },

    /// The same id was issued to more than one call.
    #[error("duplicate id {id} issued {occurrences} times")]
    Duplicate {
        /// The duplicated id.
        id: u64,
        /// How many calls received it.
        occurrences: usize,
    },

    /// The maximum issued id does not match the total number of calls,
    /// signalling lost or duplicated increments.
    #[error("max id across workers incorrect: expected {expected}, got {observed}")]
    CountMismatch {
        /// The total number of calls issued.
        expected: u64,
        /// The maximum id actually observed.
        observed: u64,
    },
}

/// Checks a run's per-worker observations against the sequence contract.
///
/// `samples` holds one `Vec<u64>` per worker, ids in call order;
/// `expected_total` is `workers × calls_per_worker`. Returns every violation
/// found, in worker order for monotonicity and ascending id order for
/// duplicates.
///
/// The three checks together are complete: the sample count always equals
/// `expected_total`, so a multiset with no duplicate and the correct maximum
/// can only be exactly `{1, ..., expected_total}`.
pub fn validate(samples: &[Vec<u64>], expected_total: u64) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (worker, observed) in samples.iter().enumerate() {
        let mut prev = 0u64;
        for &id in observed {
            if id < prev {
                violations.push(Violation::Monotonicity {
                    worker,
                    prev,
                    got: id,
                });
            }
            prev = id;
        }
    }

    let mut all: Vec<u64> = samples.iter().flatten().copied().collect();
    all.sort_unstable();

    let mut i = 0;
    while i < all.len() {
        let occurrences = all[i..].iter().take_while(|&&id| id == all[i]).count();
        if occurrences > 1 {
            violations.push(Violation::Duplicate {
                id: all[i],
                occurrences,
            });
        }
        i += occurrences;
    }

    let observed = all.last().copied().unwrap_or(0);
    if observed != expected_total {
        violations.push(Violation::CountMismatch {
            expected: expected_total,
            observed,
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_has_no_violations() {
        let samples = vec![vec![1, 3, 5], vec![2, 4, 6]];
        assert!(validate(&samples, 6).is_empty());
    }

    #[test]
    fn test_detects_monotonicity_violation() {
        let samples = vec![vec![1, 3, 2, 4]];
        let violations = validate(&samples, 4);
        assert!(violations.contains(&Violation::Monotonicity {
            worker: 0,
            prev: 3,
            got: 2,
        }));
    }

    #[test]
    fn test_detects_duplicate_ids() {
        let samples = vec![vec![1, 2], vec![2, 4]];
        let violations = validate(&samples, 4);
        assert!(violations.contains(&Violation::Duplicate {
            id: 2,
            occurrences: 2,
        }));
        // 3 was never issued, so the maximum alone does not betray the loss;
        // the duplicate check is what catches it.
        assert!(!violations
            .iter()
            .any(|v| matches!(v, Violation::CountMismatch { .. })));
    }

    #[test]
    fn test_detects_lost_increments() {
        // A stale read-modify-write: two workers both computed 2.
        let samples = vec![vec![1, 2], vec![2, 3]];
        let violations = validate(&samples, 4);
        assert!(violations.contains(&Violation::Duplicate {
            id: 2,
            occurrences: 2,
        }));
        assert!(violations.contains(&Violation::CountMismatch {
            expected: 4,
            observed: 3,
        }));
    }

    #[test]
    fn test_monotonicity_is_per_worker() {
        // Interleaving across workers is fine; only a worker's own sequence
        // must increase.
        let samples = vec![vec![2, 4], vec![1, 3]];
        assert!(validate(&samples, 4).is_empty());
    }

    #[test]
    fn test_empty_run() {
        let samples: Vec<Vec<u64>> = Vec::new();
        assert!(validate(&samples, 0).is_empty());
    }

    #[test]
    fn test_violation_messages() {
        let monotonicity = Violation::Monotonicity {
            worker: 3,
            prev: 7,
            got: 5,
        };
        assert_eq!(
            monotonicity.to_string(),
            "worker 3: ids not monotonically increasing: got 5 after 7"
        );

        let mismatch = Violation::CountMismatch {
            expected: 100_000,
            observed: 99_987,
        };
        assert_eq!(
            mismatch.to_string(),
            "max id across workers incorrect: expected 100000, got 99987"
        );
    }
}
