//! # LIFO Scheduler
//!
//! A bounded-concurrency task scheduler that always starts the most recently
//! submitted pending work first.
//!
//! Callers submit closures (or [`core::Operation`] objects); the scheduler runs
//! at most `max_concurrent` of them at once on a pluggable [`core::Executor`].
//! Whenever a slot frees up, the newest pending item takes it. This suits
//! workloads where fresh requests matter more than stale ones, such as loading
//! thumbnails for whatever just scrolled into view.
//!
//! ## Key Features
//!
//! - **Stack-order dispatch**: Strict LIFO among items pending when capacity frees up
//! - **Bounded concurrency**: The running count never exceeds the configured ceiling
//! - **Suspend / resume**: Pause dispatch without discarding queued work
//! - **Bulk cancellation**: Pending work is dropped unrun; running work is flagged
//!   and stops cooperatively
//! - **Pluggable executors**: Tokio blocking pool or dedicated worker threads
//!
//! ## Example
//!
//! ```rust
//! use lifo_scheduler::core::{CancellationFlag, LifoScheduler};
//! use lifo_scheduler::runtime::WorkerThreadExecutor;
//! use std::time::Duration;
//!
//! let scheduler = LifoScheduler::new(2, WorkerThreadExecutor::new(2)?)?;
//!
//! scheduler.set_suspended(true);
//! for page in 0..5 {
//!     scheduler.submit(move || println!("render page {page}"));
//! }
//! scheduler.submit_operation(|cancel: &CancellationFlag| {
//!     for _chunk in 0..100 {
//!         if cancel.is_cancelled() {
//!             return;
//!         }
//!     }
//! });
//!
//! // Resuming starts the two newest submissions first.
//! scheduler.set_suspended(false);
//! assert!(scheduler.wait_until_idle(Duration::from_secs(5)));
//!
//! scheduler.cancel_all();
//! # Ok::<(), lifo_scheduler::core::SchedulerError>(())
//! ```
//!
//! For complete scenarios, see `tests/lifo_dispatch_test.rs` and
//! `tests/concurrency_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: work, pending stack, lifecycle tracking, dispatch.
pub mod core;
/// Configuration models for queues and executors.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters: tokio and worker-thread executors.
pub mod runtime;
/// Shared utilities.
pub mod util;
