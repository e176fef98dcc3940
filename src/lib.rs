//! # Prometheus Priority Scheduler
//!
//! A cooperative, priority-ordered task scheduler for async workloads.
//!
//! Work is posted as opaque async task bodies with an integer priority and is
//! executed one task at a time: lowest priority value first, and in posting order
//! within the same priority. The scheduler is meant to be embedded in a larger
//! event-driven system (a UI task loop, a job runner) that decides when to drain.
//!
//! ## Key Features
//!
//! - **Binary Min-Heap**: `PriorityQueue` with `O(log n)` enqueue/dequeue
//! - **Two-Level Ordering**: `TaskKey` compares priority, then arrival order, with no
//!   fused scalar that can overflow into the next priority band
//! - **Single-Flight Drain**: at most one task body runs at a time per scheduler, and a
//!   re-entrant `run()` is a no-op
//! - **Guaranteed Release**: the drain state returns to idle on success, failure, panic,
//!   or cancellation
//! - **Failure Policies**: propagate the first failure or isolate failures and continue
//! - **Lifecycle Events**: optional sinks record posts, starts, completions, and drains
//!
//! ## Scheduler
//!
//! ```rust
//! use prometheus_priority_scheduler::core::Scheduler;
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = Scheduler::new();
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! for (name, priority) in [("low", 2), ("high", 1)] {
//!     let log = Arc::clone(&log);
//!     scheduler.post_task(move || async move { log.lock().unwrap().push(name) }, priority);
//! }
//!
//! scheduler.run().await?;
//! assert_eq!(*log.lock().unwrap(), vec!["high", "low"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Handling
//!
//! ```rust,ignore
//! use prometheus_priority_scheduler::builders::SchedulerBuilder;
//! use prometheus_priority_scheduler::config::FailurePolicy;
//!
//! let scheduler = SchedulerBuilder::new()
//!     .failure_policy(FailurePolicy::Isolate)
//!     .build()?;
//!
//! scheduler.post_task(|| async { anyhow::bail!("flaky") as anyhow::Result<()> }, 1);
//! let report = scheduler.run().await?;
//! assert_eq!(report.failed, 1);
//! ```
//!
//! For complete examples, see `tests/scheduler_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: heap, task model, drain loop, events.
pub mod core;
/// Configuration models for schedulers and failure handling.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters and status models.
pub mod runtime;
/// Shared utilities.
pub mod util;
