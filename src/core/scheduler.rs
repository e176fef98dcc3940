//! Cooperative priority scheduler and its drain loop.
//!
//! Tasks are posted synchronously and executed one at a time by [`Scheduler::run`],
//! lowest priority value first and in arrival order within a priority. The queue,
//! the arrival counter, and the run state share one `parking_lot::Mutex`; the lock
//! is only held for enqueue/dequeue and never across a task body's `.await`.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::config::{FailurePolicy, SchedulerConfig};
use crate::core::audit::{build_event, EventKind, EventSink};
use crate::core::priority_queue::PriorityQueue;
use crate::core::task::{Priority, QueuedTask, Task, TaskKey, TaskOrder};
use crate::core::SchedulerError;

/// Drain state of a scheduler.
///
/// `Idle -> Draining` on entry to `run()`; `Draining -> Idle` when the drain loop
/// observes an empty queue or exits for any other reason (failure, panic,
/// cancellation). `run()` while `Draining` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No drain loop is active.
    Idle,
    /// A drain loop owns the queue.
    Draining,
}

/// Summary of one `run()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DrainReport {
    /// Task bodies invoked, including ones that failed.
    pub executed: usize,
    /// Failures isolated under [`FailurePolicy::Isolate`].
    pub failed: usize,
    /// The call found a drain already active and did nothing.
    pub skipped: bool,
}

impl DrainReport {
    const fn skipped_run() -> Self {
        Self {
            executed: 0,
            failed: 0,
            skipped: true,
        }
    }
}

/// Abstraction for spawning futures on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

struct Shared {
    queue: PriorityQueue<TaskKey, QueuedTask>,
    next_order: TaskOrder,
    state: RunState,
}

/// Returns the scheduler to `Idle` if the drain loop exits without observing
/// an empty queue.
struct DrainGuard<'a> {
    shared: &'a Mutex<Shared>,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.lock().state = RunState::Idle;
        }
    }
}

/// Priority task scheduler with a single cooperative drain loop.
///
/// # Example
///
/// ```rust
/// use prometheus_priority_scheduler::core::Scheduler;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scheduler = Scheduler::new();
/// scheduler.post_task(|| async { println!("later") }, 2);
/// scheduler.post_task(|| async { println!("first") }, 1);
///
/// let report = scheduler.run().await?;
/// assert_eq!(report.executed, 2);
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    id: Uuid,
    shared: Mutex<Shared>,
    failure_policy: FailurePolicy,
    events: Option<Mutex<Box<dyn EventSink>>>,
}

impl Scheduler {
    /// Create a scheduler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(&SchedulerConfig::default())
    }

    /// Create a scheduler from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if validation fails.
    pub fn with_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &SchedulerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            shared: Mutex::new(Shared {
                queue: PriorityQueue::with_capacity(config.initial_capacity),
                next_order: 0,
                state: RunState::Idle,
            }),
            failure_policy: config.failure_policy,
            events: None,
        }
    }

    /// Attach an event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.events = Some(Mutex::new(sink));
        self
    }

    /// Identifier used in logs and events.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Policy applied when a task body fails.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Current drain state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.shared.lock().state
    }

    /// True when no drain loop is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state() == RunState::Idle
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.size()
    }

    /// Order the next posted task will receive.
    #[must_use]
    pub fn next_order(&self) -> TaskOrder {
        self.shared.lock().next_order
    }

    /// Queue `task` at `priority`. Lower priorities run first; equal priorities run
    /// in posting order.
    ///
    /// Never blocks on task execution and never fails. Safe to call while a drain is
    /// in progress; the active loop picks the task up if it has not yet exited.
    pub fn post_task<T: Task>(&self, task: T, priority: Priority) {
        self.post_boxed(Box::new(task), priority);
    }

    /// Queue an already boxed task. See [`post_task`](Self::post_task).
    pub fn post_boxed(&self, task: Box<dyn Task>, priority: Priority) {
        // Lock order is sink then queue. A drain records `Started` only after
        // releasing the queue, so it cannot log this task before `Posted`.
        let mut sink = self.events.as_ref().map(|events| events.lock());
        let order = {
            let mut shared = self.shared.lock();
            let order = shared.next_order;
            shared.next_order += 1;
            let queued = QueuedTask { task, priority, order };
            let key = queued.key();
            shared.queue.enqueue(queued, key);
            order
        };
        tracing::debug!("scheduler {} posted task {} at priority {}", self.id, order, priority);
        if let Some(sink) = sink.as_mut() {
            sink.record(build_event(self.id, EventKind::Posted, Some((priority, order)), None));
        }
    }

    /// Drain the queue, awaiting each task body before starting the next.
    ///
    /// Returns immediately with `skipped` set if another drain is
    /// active. Otherwise runs until the queue is observed empty. The scheduler is
    /// back in [`RunState::Idle`] on every exit path.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Propagate`], the first failing task aborts the drain
    /// with [`SchedulerError::TaskFailed`]. Tasks still queued stay queued for the
    /// next `run()`.
    pub async fn run(&self) -> Result<DrainReport, SchedulerError> {
        {
            let mut shared = self.shared.lock();
            if shared.state == RunState::Draining {
                drop(shared);
                tracing::warn!("scheduler {} already draining, run skipped", self.id);
                self.emit(EventKind::DrainSkipped, None, None);
                return Ok(DrainReport::skipped_run());
            }
            shared.state = RunState::Draining;
        }
        let mut guard = DrainGuard {
            shared: &self.shared,
            armed: true,
        };

        tracing::info!("scheduler {} drain started", self.id);
        self.emit(EventKind::DrainStarted, None, None);

        let mut report = DrainReport::default();
        loop {
            let next = {
                let mut shared = self.shared.lock();
                let next = shared.queue.dequeue();
                if next.is_none() {
                    // Same critical section as the empty check, so a concurrent post
                    // either lands before it or sees the scheduler idle.
                    shared.state = RunState::Idle;
                    guard.armed = false;
                }
                next
            };
            let Some(QueuedTask { task, priority, order }) = next else {
                break;
            };

            tracing::debug!("scheduler {} executing task {}", self.id, order);
            self.emit(EventKind::Started, Some((priority, order)), None);
            report.executed += 1;

            match task.invoke().await {
                Ok(()) => {
                    self.emit(EventKind::Completed, Some((priority, order)), None);
                }
                Err(source) => {
                    tracing::error!("scheduler {} task {} failed: {:#}", self.id, order, source);
                    self.emit(
                        EventKind::Failed,
                        Some((priority, order)),
                        Some(format!("{source:#}")),
                    );
                    match self.failure_policy {
                        FailurePolicy::Propagate => {
                            self.emit(EventKind::DrainFinished, None, Some("aborted".into()));
                            return Err(SchedulerError::TaskFailed {
                                priority,
                                order,
                                source,
                            });
                        }
                        FailurePolicy::Isolate => report.failed += 1,
                    }
                }
            }
        }

        tracing::info!(
            "scheduler {} drain finished: executed={}, failed={}",
            self.id,
            report.executed,
            report.failed
        );
        self.emit(EventKind::DrainFinished, None, None);
        Ok(report)
    }

    /// Start a drain on `spawner` without waiting for it.
    ///
    /// Failures are logged; a drain already in progress makes this a no-op.
    pub fn run_detached<S: Spawn>(self: &Arc<Self>, spawner: &S) {
        let scheduler = Arc::clone(self);
        spawner.spawn(async move {
            if let Err(e) = scheduler.run().await {
                tracing::error!("detached drain for scheduler {} aborted: {}", scheduler.id, e);
            }
        });
    }

    fn emit(&self, kind: EventKind, task: Option<(Priority, TaskOrder)>, detail: Option<String>) {
        if let Some(sink) = &self.events {
            sink.lock().record(build_event(self.id, kind, task, detail));
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("Scheduler")
            .field("id", &self.id)
            .field("state", &shared.state)
            .field("pending", &shared.queue.size())
            .field("next_order", &shared.next_order)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}
