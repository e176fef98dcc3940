//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::core::{SchedulerError, Spawn};

/// Runtime owned by a spawner. Shuts down without blocking so the last clone
/// may be dropped from inside an async context.
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Tokio-based spawner that executes futures on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: Handle,
    // Keeps an owned runtime alive for as long as any clone of the spawner exists.
    _runtime: Option<Arc<OwnedRuntime>>,
}

impl TokioSpawner {
    /// Create a spawner from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self {
            handle,
            _runtime: None,
        }
    }

    /// Spawner for the runtime the caller is currently running on.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Create a spawner that owns a new multi-threaded runtime.
    ///
    /// The runtime is shut down in the background once the last clone is dropped;
    /// futures still running at that point are abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Backend`] if `worker_threads` is zero or the
    /// runtime cannot be built.
    pub fn with_worker_threads(worker_threads: usize) -> Result<Self, SchedulerError> {
        if worker_threads == 0 {
            return Err(SchedulerError::Backend(
                "worker_threads must be greater than 0".into(),
            ));
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .enable_all()
            .build()
            .map_err(|e| SchedulerError::Backend(format!("failed to build tokio runtime: {e}")))?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Handle of the underlying runtime.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
