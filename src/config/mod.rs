//! Configuration models for schedulers and their failure handling.

pub mod scheduler;

pub use scheduler::{FailurePolicy, SchedulerConfig, SchedulerSetConfig};
