//! Executor abstraction the scheduler dispatches onto.

use std::fmt;

/// Type-erased job handed to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run jobs in parallel.
///
/// The scheduler enforces its own concurrency ceiling, so implementations do
/// not need to bound parallelism, but `run` must return without waiting for
/// the job to finish.
///
/// # Contract
///
/// `on_complete` must be invoked exactly once after `job` returns, including
/// when the job panics. [`Completion`] fires itself on drop, so an executor
/// that unwinds or discards it still reports the item as finished.
///
/// `run` must not panic. The scheduler catches a panic escaping `run` and logs
/// it; the job is dropped without running and its slot is freed through the
/// dropped [`Completion`]. The item is then reported as completed.
///
/// # Example
///
/// ```rust
/// use lifo_scheduler::core::{Completion, Executor, Job};
///
/// struct ThreadPerJob;
///
/// impl Executor for ThreadPerJob {
///     fn run(&self, job: Job, on_complete: Completion) {
///         std::thread::spawn(move || {
///             let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
///             on_complete.complete();
///         });
///     }
/// }
/// ```
pub trait Executor: Send + Sync + 'static {
    /// Run `job` on a worker and invoke `on_complete` once it has returned.
    fn run(&self, job: Job, on_complete: Completion);
}

impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    fn run(&self, job: Job, on_complete: Completion) {
        (**self).run(job, on_complete);
    }
}

/// Exactly-once completion continuation.
pub struct Completion {
    callback: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Completion {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Signal that the job has finished.
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire();
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}

/// Render a caught panic payload for logging.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
