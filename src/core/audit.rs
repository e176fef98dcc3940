//! Scheduler lifecycle events and sinks.
//!
//! Provides a bounded in-memory log for testing and dev, plus a shareable
//! handle so events can be read while a scheduler owns the sink.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::task::{Priority, TaskOrder};
use crate::util::clock::now_ms;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Task accepted into the queue.
    Posted,
    /// Task body invoked.
    Started,
    /// Task body settled successfully.
    Completed,
    /// Task body failed.
    Failed,
    /// A drain loop began.
    DrainStarted,
    /// A drain loop exited.
    DrainFinished,
    /// `run()` was called while a drain was already active.
    DrainSkipped,
}

/// Lifecycle event structure.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SchedulerEvent {
    /// Event identifier.
    pub event_id: Uuid,
    /// Scheduler that emitted the event.
    pub scheduler_id: Uuid,
    /// Event kind.
    pub kind: EventKind,
    /// Task priority, for task events.
    pub priority: Option<Priority>,
    /// Task order, for task events.
    pub order: Option<TaskOrder>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Event sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, event: SchedulerEvent);
}

/// In-memory event sink with a bounded buffer; the oldest event is evicted first.
pub struct InMemoryEventSink {
    events: VecDeque<SchedulerEvent>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.events.iter().cloned().collect()
    }

    /// Snapshot of stored events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: EventKind) -> Vec<SchedulerEvent> {
        self.events.iter().filter(|e| e.kind == kind).cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: SchedulerEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Cloneable handle over an [`InMemoryEventSink`].
///
/// Hand one clone to the scheduler and keep another to inspect events.
#[derive(Clone)]
pub struct SharedEventSink {
    inner: Arc<Mutex<InMemoryEventSink>>,
}

impl SharedEventSink {
    /// Create a shared sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryEventSink::new(max_events))),
        }
    }

    /// Snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.inner.lock().events()
    }

    /// Snapshot of stored events of one kind.
    #[must_use]
    pub fn events_of(&self, kind: EventKind) -> Vec<SchedulerEvent> {
        self.inner.lock().events_of(kind)
    }
}

impl EventSink for SharedEventSink {
    fn record(&mut self, event: SchedulerEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build an event stamped with a fresh id and the current time.
#[must_use]
pub fn build_event(
    scheduler_id: Uuid,
    kind: EventKind,
    task: Option<(Priority, TaskOrder)>,
    detail: Option<String>,
) -> SchedulerEvent {
    SchedulerEvent {
        event_id: Uuid::new_v4(),
        scheduler_id,
        kind,
        priority: task.map(|(p, _)| p),
        order: task.map(|(_, o)| o),
        created_at_ms: now_ms(),
        detail,
    }
}
