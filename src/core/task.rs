//! Task bodies, ordering keys, and queued task records.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Task priority. Lower values run first.
pub type Priority = i64;

/// Monotonic arrival sequence number assigned at post time.
pub type TaskOrder = u64;

/// Boxed future produced by invoking a [`Task`].
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Ordering key for queued tasks: priority first, then arrival order.
///
/// The derived `Ord` compares fields in declaration order, so two tasks at the
/// same priority always come out in the order they were posted, regardless of
/// how many tasks are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    /// Priority band; lower runs first.
    pub priority: Priority,
    /// Arrival order within the scheduler.
    pub order: TaskOrder,
}

impl TaskKey {
    /// Build a key from its parts.
    #[must_use]
    pub const fn new(priority: Priority, order: TaskOrder) -> Self {
        Self { priority, order }
    }

    /// Fuse the key into a single scalar `priority * multiplier + order`.
    ///
    /// Returns `None` when `order` would spill into the next priority band
    /// (`order >= multiplier`) or the arithmetic overflows. Scalar keys only
    /// agree with the two-level ordering while every order stays below the
    /// multiplier.
    #[must_use]
    pub fn composite(&self, multiplier: u64) -> Option<i64> {
        if self.order >= multiplier {
            return None;
        }
        let multiplier = i64::try_from(multiplier).ok()?;
        let order = i64::try_from(self.order).ok()?;
        self.priority.checked_mul(multiplier)?.checked_add(order)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}#{}", self.priority, self.order)
    }
}

/// Value a task body may resolve to.
///
/// `()` is an infallible body. `Result<T, E>` fails on `Err`; the `Ok` value is
/// discarded since the scheduler keeps no task results.
pub trait TaskOutcome {
    /// Convert into the scheduler's uniform outcome.
    ///
    /// # Errors
    ///
    /// Returns the task's own failure.
    fn into_outcome(self) -> anyhow::Result<()>;
}

impl TaskOutcome for () {
    fn into_outcome(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<T, E> TaskOutcome for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_outcome(self) -> anyhow::Result<()> {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// A unit of work: something that yields a pending computation when invoked.
///
/// Any `FnOnce() -> impl Future` closure whose output is a [`TaskOutcome`]
/// is a `Task`, so most callers never implement this directly.
pub trait Task: Send + 'static {
    /// Consume the task and return the future that runs its body.
    fn invoke(self: Box<Self>) -> TaskFuture;
}

impl<F, Fut> Task for F
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: TaskOutcome,
{
    fn invoke(self: Box<Self>) -> TaskFuture {
        let fut = (*self)();
        Box::pin(async move { fut.await.into_outcome() })
    }
}

/// A posted task waiting in the scheduler's queue.
pub struct QueuedTask {
    /// Task body.
    pub task: Box<dyn Task>,
    /// Priority supplied at post time.
    pub priority: Priority,
    /// Arrival order assigned at post time.
    pub order: TaskOrder,
}

impl QueuedTask {
    /// Ordering key for this task.
    #[must_use]
    pub const fn key(&self) -> TaskKey {
        TaskKey::new(self.priority, self.order)
    }
}

impl fmt::Debug for QueuedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedTask")
            .field("priority", &self.priority)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
