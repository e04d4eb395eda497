//! Core module containing the id-sequence services and their shared contract.
//!
//! This module provides the [`Sequence`] trait implemented by all four
//! strategies, together with the error type they report through.
//!
//! # Architecture
//!
//! Every service owns one encapsulated `u64` starting at 0 and exposes a
//! single operation, [`Sequence::next_id`], that returns the next value. The
//! strategies differ only in how they make the read-increment-return step
//! safe (or, for the negative control, fail to):
//!
//! ```text
//!                ┌─────────────────────────────────────────────────┐
//!                │                 Sequence trait                  │
//!                ├───────────┬───────────┬───────────┬─────────────┤
//!   discipline   │ none      │ fetch_add │ Mutex     │ owner thread│
//!                │           │           │           │ + channels  │
//!                ├───────────┼───────────┼───────────┼─────────────┤
//!   value lives  │ shared    │ shared    │ shared,   │ private to  │
//!                │ atomic    │ atomic    │ guarded   │ one thread  │
//!                ├───────────┼───────────┼───────────┼─────────────┤
//!   callers wait │ never     │ hardware  │ lock      │ two channel │
//!                │           │ step only │ handoff   │ handoffs    │
//!                └───────────┴───────────┴───────────┴─────────────┘
//! ```
//!
//! # Correctness Contract
//!
//! For the correct strategies ([`atomic::Atomic`], [`locked::Locked`],
//! [`owned::Owned`]) the issued ids are linearizable: restricted to any one
//! caller the sequence strictly increases, and across all callers the ids
//! form exactly `{1, 2, ..., total_calls}` with no duplicate and no gap.
//! [`unsync::Unsync`] deliberately breaks this contract under contention and
//! exists so the harness has a known-bad baseline to detect.
//!
//! # Lifecycle
//!
//! A service is constructed at 0, mutated by concurrent callers, and dropped
//! at the end of a run. Only [`owned::Owned`] has a lifecycle beyond
//! construction: its owner thread starts with the instance and is shut down
//! by [`owned::Owned::stop`] (or on drop). Calling `next_id` on a stopped
//! service fails fast with [`SequenceError::Stopped`] instead of hanging.

pub mod atomic;
pub mod locked;
pub mod owned;
pub mod unsync;

use std::fmt::Display;

use thiserror::Error;

/// Error type for sequence operations.
///
/// The lock-free strategies never fail; the variants here cover the two ways
/// the blocking strategies can: a poisoned mutex and a shut-down owner
/// thread.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// The service was stopped; no further ids can be issued.
    #[error("sequence service stopped: no further ids can be issued")]
    Stopped,

    /// The mutex guarding the value was poisoned by a panicking holder.
    #[error("sequence lock poisoned")]
    Poisoned,
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, SequenceError>;

/// The contract shared by all id-sequence services.
///
/// Returns values in ascending order; it must be safe to call
/// [`next_id`](Sequence::next_id) concurrently without any additional
/// synchronization on the caller's side.
///
/// # Implementors
///
/// - [`unsync::Unsync`] - no synchronization, the negative control
/// - [`atomic::Atomic`] - hardware fetch-and-add, lock-free
/// - [`locked::Locked`] - mutex-guarded critical section
/// - [`owned::Owned`] - owner thread reached over a channel pair
///
/// # Examples
///
/// ```rust
/// use sequenza::services::locked::Locked;
/// use sequenza::services::Sequence;
///
/// let ids = Locked::new().with_name("orders");
/// assert_eq!(ids.next_id().unwrap(), 1);
/// assert_eq!(ids.name(), "orders");
/// ```
pub trait Sequence {
    /// Returns the name of this service.
    ///
    /// The name is typically a static string set at construction time using
    /// the `with_name()` builder method. Returns an empty string if no name
    /// was set.
    fn name(&self) -> &'static str;

    /// Returns the next value in the sequence, starting from 1.
    ///
    /// Safe to invoke from any number of threads concurrently. Whether the
    /// returned values actually satisfy the uniqueness contract depends on
    /// the strategy; see the implementor docs.
    fn next_id(&self) -> Result<u64>;
}

impl Display for dyn Sequence + '_ {
    /// Formats the service by name, or as `<sequence>` if unnamed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "<sequence>")
        }
    }
}
