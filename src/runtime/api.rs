//! Serializable status models for schedulers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::FailurePolicy;
use crate::core::{RunState, Scheduler, TaskOrder};

/// Point-in-time view of a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// Scheduler name; empty for anonymous schedulers.
    pub name: String,
    /// Scheduler identifier.
    pub id: Uuid,
    /// Drain state.
    pub state: RunState,
    /// Queued tasks.
    pub pending: usize,
    /// Order the next posted task will receive.
    pub next_order: TaskOrder,
    /// Failure handling.
    pub failure_policy: FailurePolicy,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Snapshot a single scheduler.
#[must_use]
pub fn snapshot(name: &str, scheduler: &Scheduler) -> SchedulerSnapshot {
    SchedulerSnapshot {
        name: name.to_string(),
        id: scheduler.id(),
        state: scheduler.state(),
        pending: scheduler.pending(),
        next_order: scheduler.next_order(),
        failure_policy: scheduler.failure_policy(),
    }
}

/// Snapshot every named scheduler, sorted by name.
#[must_use]
pub fn list_schedulers<S: std::hash::BuildHasher>(
    schedulers: &HashMap<String, Scheduler, S>,
) -> Vec<SchedulerSnapshot> {
    let mut out: Vec<_> = schedulers
        .iter()
        .map(|(name, scheduler)| snapshot(name, scheduler))
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Return a health payload.
#[must_use]
pub const fn health() -> Health {
    Health { ok: true }
}
