//! Core scheduling abstractions: the heap, task model, and drain loop.

pub mod error;
pub mod priority_queue;
pub mod task;
pub mod scheduler;
pub mod audit;

pub use error::{AppResult, SchedulerError};
pub use priority_queue::PriorityQueue;
pub use task::{Priority, QueuedTask, Task, TaskFuture, TaskKey, TaskOrder, TaskOutcome};
pub use scheduler::{DrainReport, RunState, Scheduler, Spawn};
pub use audit::{
    build_event, EventKind, EventSink, InMemoryEventSink, SchedulerEvent, SharedEventSink,
};
