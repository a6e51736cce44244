//! Tokio runtime executor implementation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::core::executor::panic_message;
use crate::core::{Completion, Executor, Job, SchedulerError, SchedulerResult};

/// Executor that runs jobs on a tokio runtime's blocking pool.
///
/// Work bodies are synchronous and may block, so they go through
/// `spawn_blocking` rather than the async worker threads.
#[derive(Clone)]
pub struct TokioExecutor {
    handle: tokio::runtime::Handle,
    /// Keeps an owned runtime alive for executors built with `with_worker_threads`.
    _runtime: Option<Arc<OwnedRuntime>>,
}

/// Owned runtime that shuts down without blocking.
///
/// The last executor clone can be dropped from one of the runtime's own
/// blocking threads (a completion releasing the scheduler), where a regular
/// runtime drop would wait on itself.
struct OwnedRuntime(Option<tokio::runtime::Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

impl TokioExecutor {
    /// Create an executor from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            _runtime: None,
        }
    }

    /// Create an executor bound to the runtime of the calling task.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Executor` when called outside a tokio runtime.
    pub fn current() -> SchedulerResult<Self> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| SchedulerError::Executor(format!("no tokio runtime: {e}")))
    }

    /// Handle of the runtime jobs are spawned on.
    #[must_use]
    pub const fn handle(&self) -> &tokio::runtime::Handle {
        &self.handle
    }

    /// Create an executor that owns a new multi-threaded runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Executor` if the runtime cannot be built.
    pub fn with_worker_threads(worker_threads: usize) -> SchedulerResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("lifo-tokio")
            .enable_all()
            .build()
            .map_err(|e| SchedulerError::Executor(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }
}

impl Executor for TokioExecutor {
    fn run(&self, job: Job, on_complete: Completion) {
        self.handle.spawn_blocking(move || {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                tracing::warn!(
                    panic = %panic_message(payload.as_ref()),
                    "work body panicked; treating as completed"
                );
            }
            on_complete.complete();
        });
    }
}
