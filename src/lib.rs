//! # Sequenza - Concurrent Id-Sequence Services
//!
//! A Rust library exploring correctness and performance trade-offs among four
//! synchronization strategies for a shared monotonically-increasing id
//! sequence accessed concurrently by many threads.
//!
//! ## The Problem
//!
//! Handing out unique, ascending ids from many threads looks trivial (read a
//! value, add one, return it), but the read-modify-write sequence is where
//! every classic concurrency hazard lives. Two threads that read the same
//! pre-increment value will both compute the same successor, silently issuing
//! a duplicate id and losing an increment. The interesting questions are which
//! synchronization disciplines make the sequence linearizable, what each one
//! costs under contention, and how a harness can *empirically* prove or
//! disprove correctness rather than taking it on faith.
//!
//! ## The Strategies
//!
//! | Type | Discipline | Correct under contention? |
//! |------|------------|---------------------------|
//! | [`Unsync`](services::unsync::Unsync) | None (split load/store) | **No** (negative control) |
//! | [`Atomic`](services::atomic::Atomic) | Hardware fetch-and-add | Yes, lock-free |
//! | [`Locked`](services::locked::Locked) | Mutex critical section | Yes, blocking |
//! | [`Owned`](services::owned::Owned) | Owner thread + channels | Yes, message passing |
//!
//! All four implement the [`Sequence`](services::Sequence) trait and can be
//! driven interchangeably by the [`harness`].
//!
//! ## Quick Start
//!
//! ```rust
//! use sequenza::services::atomic::Atomic;
//! use sequenza::services::Sequence;
//!
//! let ids = Atomic::new().with_name("requests");
//!
//! // Call from any thread - ids come back 1, 2, 3, ...
//! assert_eq!(ids.next_id().unwrap(), 1);
//! assert_eq!(ids.next_id().unwrap(), 2);
//! ```
//!
//! ## Proving Correctness Under Contention
//!
//! The [`harness`] drives N real OS threads, each issuing M sequential calls
//! against one shared service, then validates the result: every worker's own
//! ids must strictly increase, and across all workers the issued ids must be
//! exactly `{1, ..., N×M}` with no duplicate and no gap.
//!
//! ```rust
//! use sequenza::harness;
//! use sequenza::services::atomic::Atomic;
//!
//! let service = Atomic::new().with_name("atomic");
//! let report = harness::run(&service, 4, 1000).unwrap();
//!
//! assert!(report.passed());
//! assert_eq!(report.max_observed, 4000);
//! ```
//!
//! Run the same harness against [`Unsync`](services::unsync::Unsync) on a
//! multicore machine and the report fills with duplicate ids and a maximum
//! below the expected total: the harness detects real races, which is what
//! makes its green runs meaningful.
//!
//! ## Thread Safety
//!
//! Every service is `Send + Sync`; `next_id` is safe to invoke concurrently
//! without additional synchronization on the caller's side (the `Unsync`
//! variant is *memory-safe* to share, it just returns wrong answers; see its
//! module docs).
//!
//! ## Benchmarks and the Comparison Binary
//!
//! `benches/strategies.rs` compares throughput of all four strategies with
//! Criterion. With the `cli` feature, the `compare` binary runs the harness
//! over every strategy and reports pass/fail plus timing:
//!
//! ```bash
//! cargo run --bin compare --features cli -- --workers 10 --calls 10000
//! ```
//!
//! ## Report Output
//!
//! Feature flags mirror the report renderers:
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `table` | Render run reports as ASCII tables (`tabled`) |
//! | `json`  | Serialize run reports to JSON (`serde_json`) |
//! | `cli`   | The `compare` binary (pulls `table`, `json`, `clap`) |

pub mod harness;
pub mod services;
