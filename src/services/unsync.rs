//! Unsynchronized sequence service - the negative control.
//!
//! This module provides [`Unsync`], a strategy that is **deliberately
//! incorrect** under concurrent access. Its read-modify-write is two
//! independent steps, so concurrent callers can load the same pre-increment
//! value and both store the same successor: ids get duplicated, increments
//! get lost, and the final maximum falls short of the total call count.
//!
//! It exists so the harness has a known-bad baseline: a validator that never
//! flags `Unsync` under contention would not be worth trusting when it
//! passes the correct strategies.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

use crate::services::{Result, Sequence};

/// A sequence service with no synchronization between its read and its write.
///
/// The value is held in an `AtomicU64` only to keep the race at the logical
/// level: Rust offers no way to hand out plain unsynchronized writes through
/// `&self` without undefined behavior, so the load and the store are each
/// individually atomic while the read-modify-write as a whole is not. The
/// lost-update window between the two steps is the whole point of this type.
///
/// Single-threaded use behaves like any other strategy:
///
/// ```rust
/// use sequenza::services::unsync::Unsync;
/// use sequenza::services::Sequence;
///
/// let ids = Unsync::new();
/// assert_eq!(ids.next_id().unwrap(), 1);
/// assert_eq!(ids.next_id().unwrap(), 2);
/// ```
///
/// Shared across threads it is memory-safe but wrong: expect duplicates and
/// a final maximum below `workers × calls`.
#[derive(Debug)]
pub struct Unsync {
    name: &'static str,
    id: CachePadded<AtomicU64>,
}

impl Unsync {
    /// Creates a new service with the sequence at zero.
    pub const fn new() -> Self {
        Unsync {
            name: "",
            id: CachePadded::new(AtomicU64::new(0)),
        }
    }

    /// Sets the name of this service, returning `self` for method chaining.
    pub const fn with_name(self, name: &'static str) -> Self {
        Self { name, ..self }
    }
}

impl Sequence for Unsync {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the next id via an unprotected read-increment-store.
    ///
    /// Concurrent callers race between the load and the store; duplicates
    /// are expected under contention. Never fails.
    #[inline]
    fn next_id(&self) -> Result<u64> {
        // Two separate atomic steps, not one RMW: the race lives here.
        let next = self.id.load(Ordering::Relaxed) + 1;
        self.id.store(next, Ordering::Relaxed);
        Ok(next)
    }
}

impl Default for Unsync {
    /// Creates a new service at zero with no name.
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let ids = Unsync::new();
        assert_eq!(ids.next_id().unwrap(), 1);
    }

    #[test]
    fn test_sequential_ids_single_thread() {
        let ids = Unsync::new();
        for expected in 1..=100 {
            assert_eq!(ids.next_id().unwrap(), expected);
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Unsync::new();
        let b = Unsync::new();
        assert_eq!(a.next_id().unwrap(), 1);
        assert_eq!(b.next_id().unwrap(), 1);
    }

    #[test]
    fn test_name_default() {
        let ids = Unsync::new();
        assert_eq!(ids.name(), "");
    }

    #[test]
    fn test_with_name() {
        let ids = Unsync::new().with_name("no_sync");
        assert_eq!(ids.name(), "no_sync");
    }

    #[test]
    fn test_default() {
        let ids = Unsync::default();
        assert_eq!(ids.next_id().unwrap(), 1);
    }
}
