//! Owner-thread sequence service.
//!
//! This module provides [`Owned`], where a single dedicated thread owns the
//! counter value exclusively and every caller reaches it through a
//! request/response channel pair. Nothing else ever touches the value, so
//! there is no data race on it by construction: correctness comes from
//! ownership confinement, not from hardware atomics or locks.
//!
//! # Protocol
//!
//! A caller sends a unit request on the request channel, the owner thread
//! receives it, increments its private value, and sends the new value back on
//! the response channel; the caller blocks until the response arrives. Both
//! channels are rendezvous (zero-capacity) channels, and the response side
//! being rendezvous is load-bearing: a response send completes only when a
//! caller takes it, so at most one response is ever in flight and responses
//! are delivered in strictly increasing order. That is what keeps per-caller
//! monotonicity intact even though many callers share one response channel.
//!
//! # Owner state machine
//!
//! ```text
//!             request received
//!   Listening ─────────────────► Incrementing
//!       ▲                             │ private value updated
//!       │        send completed       ▼
//!       └───────────────────────  Responding
//!
//!   Listening ──── stop signal / channel closed ────► Stopped (terminal)
//! ```
//!
//! Expected performance: the highest latency per call of all strategies,
//! paying two channel handoffs plus the scheduling cost of waking the owner
//! thread.

use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::services::{Result, Sequence, SequenceError};

/// A sequence service whose value is confined to a dedicated owner thread.
///
/// # Lifecycle
///
/// [`Owned::start`] is the constructor *and* the start operation: it spawns
/// the owner thread and returns the running service. There is no separate
/// start method, so a second owner thread on the same channel pair (the
/// classic double-start bug with this pattern) is unrepresentable.
///
/// [`Owned::stop`] signals shutdown and joins the owner thread; it is
/// idempotent, and dropping the service stops it as well. A stopped service
/// cannot be restarted. Calling [`next_id`](Sequence::next_id) after `stop`
/// fails fast with [`SequenceError::Stopped`]: the owner drops its channel
/// endpoints on exit, so the caller's send or receive disconnects
/// immediately instead of blocking forever.
///
/// # Examples
///
/// ```rust
/// use sequenza::services::owned::Owned;
/// use sequenza::services::{Sequence, SequenceError};
///
/// let ids = Owned::start().with_name("owned");
/// assert_eq!(ids.next_id().unwrap(), 1);
/// assert_eq!(ids.next_id().unwrap(), 2);
///
/// ids.stop();
/// assert_eq!(ids.next_id(), Err(SequenceError::Stopped));
/// ```
#[derive(Debug)]
pub struct Owned {
    name: &'static str,
    requests: Sender<()>,
    responses: Receiver<u64>,
    stop: Sender<()>,
    owner: Mutex<Option<JoinHandle<()>>>,
}

impl Owned {
    /// Spawns the owner thread and returns the running service.
    ///
    /// The owner starts in its listening state with the private value at
    /// zero; the first request is answered with 1.
    pub fn start() -> Self {
        let (req_tx, req_rx) = bounded::<()>(0);
        let (resp_tx, resp_rx) = bounded::<u64>(0);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let owner = thread::spawn(move || owner_loop(&req_rx, &resp_tx, &stop_rx));

        Owned {
            name: "",
            requests: req_tx,
            responses: resp_rx,
            stop: stop_tx,
            owner: Mutex::new(Some(owner)),
        }
    }

    /// Sets the name of this service, returning `self` for method chaining.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Signals shutdown and joins the owner thread.
    ///
    /// Safe to call more than once; only the first call does anything. After
    /// `stop` returns, the owner thread is gone and every subsequent
    /// [`next_id`](Sequence::next_id) returns [`SequenceError::Stopped`].
    pub fn stop(&self) {
        let handle = self
            .owner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(handle) = handle {
            // Errors if the owner is already gone, which is fine.
            let _ = self.stop.send(());
            let _ = handle.join();
        }
    }
}

/// The owner loop: Listening → Incrementing → Responding, until stopped.
///
/// The value lives on this stack frame and nowhere else. Exiting the loop
/// drops the request receiver and response sender, which is what makes
/// post-shutdown calls fail fast on the caller's side.
fn owner_loop(requests: &Receiver<()>, responses: &Sender<u64>, stop: &Receiver<()>) {
    let mut id: u64 = 0;
    loop {
        select! {
            recv(requests) -> msg => match msg {
                Ok(()) => {
                    id += 1;
                    if responses.send(id).is_err() {
                        break;
                    }
                }
                // All request senders dropped.
                Err(_) => break,
            },
            recv(stop) -> _ => break,
        }
    }
}

impl Sequence for Owned {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    /// Requests the next id from the owner thread and blocks for the reply.
    ///
    /// Returns [`SequenceError::Stopped`] if the owner has shut down.
    fn next_id(&self) -> Result<u64> {
        self.requests
            .send(())
            .map_err(|_| SequenceError::Stopped)?;
        self.responses.recv().map_err(|_| SequenceError::Stopped)
    }
}

impl Drop for Owned {
    /// Stops the owner thread so it cannot outlive the service.
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let ids = Owned::start();
        assert_eq!(ids.next_id().unwrap(), 1);
        ids.stop();
    }

    #[test]
    fn test_sequential_ids() {
        let ids = Owned::start();
        for expected in 1..=100 {
            assert_eq!(ids.next_id().unwrap(), expected);
        }
        ids.stop();
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Owned::start();
        let b = Owned::start();
        assert_eq!(a.next_id().unwrap(), 1);
        assert_eq!(a.next_id().unwrap(), 2);
        assert_eq!(b.next_id().unwrap(), 1);
        a.stop();
        b.stop();
    }

    #[test]
    fn test_next_id_after_stop_fails_fast() {
        let ids = Owned::start();
        assert_eq!(ids.next_id().unwrap(), 1);
        ids.stop();
        assert_eq!(ids.next_id(), Err(SequenceError::Stopped));
        // Still an error on repeat, not a hang.
        assert_eq!(ids.next_id(), Err(SequenceError::Stopped));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let ids = Owned::start();
        ids.stop();
        ids.stop();
        assert_eq!(ids.next_id(), Err(SequenceError::Stopped));
    }

    #[test]
    fn test_stop_without_any_calls() {
        let ids = Owned::start();
        ids.stop();
    }

    #[test]
    fn test_drop_stops_the_owner() {
        // Must not leak a thread or hang; drop runs stop() internally.
        let ids = Owned::start();
        assert_eq!(ids.next_id().unwrap(), 1);
        drop(ids);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        use std::thread;

        let ids = Owned::start();
        let mut observed: Vec<u64> = thread::scope(|s| {
            let ids = &ids;
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(move || {
                        (0..250)
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
        ids.stop();

        observed.sort_unstable();
        let expected: Vec<u64> = (1..=1000).collect();
        assert_eq!(observed, expected);
    }

    #[test]
    fn test_per_caller_ids_increase() {
        use std::thread;

        let ids = Owned::start();
        thread::scope(|s| {
            let ids = &ids;
            for _ in 0..4 {
                s.spawn(move || {
                    let mut prev = 0;
                    for _ in 0..250 {
                        let id = ids.next_id().unwrap();
                        assert!(id > prev, "got {id} after {prev}");
                        prev = id;
                    }
                });
            }
        });
        ids.stop();
    }

    #[test]
    fn test_with_name() {
        let ids = Owned::start().with_name("owned");
        assert_eq!(ids.name(), "owned");
        ids.stop();
    }
}
