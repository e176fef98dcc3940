//! Error types for scheduler operations.

use thiserror::Error;

use super::task::{Priority, TaskOrder};

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A task body failed and the drain was aborted.
    #[error("task {order} (priority {priority}) failed: {source}")]
    TaskFailed {
        /// Priority the task was posted with.
        priority: Priority,
        /// Arrival order of the task.
        order: TaskOrder,
        /// Failure reported by the task body.
        #[source]
        source: anyhow::Error,
    },
    /// Configuration rejected during validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Runtime or backend failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
