//! Mutex-guarded sequence service.
//!
//! This module provides [`Locked`], which reaches the same correctness
//! guarantees as the atomic strategy through explicit mutual exclusion: a
//! mutex guards the read-increment-return critical section. The lock handoff
//! makes it costlier than `fetch_add` under contention, increasingly so as
//! the number of callers grows past the core count and waiters start paying
//! context-switch and wake latency.

use std::sync::Mutex;

use crate::services::{Result, Sequence, SequenceError};

/// A sequence service guarding its value with a [`Mutex`].
///
/// The critical section is held for the minimal scope: acquire, increment,
/// copy the result out, release on scope exit. Every exit path releases the
/// guard because release *is* scope exit.
///
/// A poisoned lock (a previous holder panicked) is reported as
/// [`SequenceError::Poisoned`] rather than propagated as a panic; no holder
/// in this crate can panic while the guard is live, so the error is only
/// reachable through outside use of the same instance.
///
/// # Examples
///
/// ```rust
/// use sequenza::services::locked::Locked;
/// use sequenza::services::Sequence;
///
/// let ids = Locked::new().with_name("orders");
/// assert_eq!(ids.next_id().unwrap(), 1);
/// assert_eq!(ids.next_id().unwrap(), 2);
/// ```
#[derive(Debug)]
pub struct Locked {
    name: &'static str,
    id: Mutex<u64>,
}

impl Locked {
    /// Creates a new service with the sequence at zero.
    pub const fn new() -> Self {
        Locked {
            name: "",
            id: Mutex::new(0),
        }
    }

    /// Sets the name of this service, returning `self` for method chaining.
    pub const fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }
}

impl Sequence for Locked {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the next id from inside the mutex-guarded critical section.
    #[inline]
    fn next_id(&self) -> Result<u64> {
        let mut id = self.id.lock().map_err(|_| SequenceError::Poisoned)?;
        *id += 1;
        Ok(*id)
    }
}

impl Default for Locked {
    /// Creates a new service at zero with no name.
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_at_one() {
        let ids = Locked::new();
        assert_eq!(ids.next_id().unwrap(), 1);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = Locked::new();
        for expected in 1..=100 {
            assert_eq!(ids.next_id().unwrap(), expected);
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Locked::new();
        let b = Locked::new();
        assert_eq!(a.next_id().unwrap(), 1);
        assert_eq!(a.next_id().unwrap(), 2);
        assert_eq!(b.next_id().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = Locked::new();
        let mut observed: Vec<u64> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..1000)
                            .map(|_| ids.next_id().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        observed.sort_unstable();
        let expected: Vec<u64> = (1..=4000).collect();
        assert_eq!(observed, expected);
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let ids = Locked::new();
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = ids.id.lock().unwrap();
            panic!("poison the lock");
        }));

        assert_eq!(ids.next_id(), Err(SequenceError::Poisoned));
    }

    #[test]
    fn test_with_name() {
        let ids = Locked::new().with_name("my_sequence");
        assert_eq!(ids.name(), "my_sequence");
    }

    #[test]
    fn test_default() {
        let ids = Locked::default();
        assert_eq!(ids.name(), "");
        assert_eq!(ids.next_id().unwrap(), 1);
    }
}
