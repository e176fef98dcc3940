//! Runtime adapters and status surface.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{health, list_schedulers, snapshot, Health, SchedulerSnapshot};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
