//! Units of work and their cooperative cancellation flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Identifier assigned to every submission, unique within one scheduler.
pub type WorkId = u64;

/// Lifecycle state of a unit of work.
///
/// The scheduler keeps these states implicitly: `Pending` items sit on the
/// pending stack and `Running` items in the lifecycle tracker. Each
/// [`AuditAction`](crate::core::AuditAction) maps to the state it enters via
/// `resulting_state`, and the tracker reports the terminal state on finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkState {
    /// Submitted and waiting on the pending stack.
    Pending,
    /// Handed to the executor.
    Running,
    /// Body returned (or panicked) without its flag set.
    Completed,
    /// Discarded while pending, or finished after its flag was set.
    Cancelled,
}

impl WorkState {
    /// Whether the state is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Shared, set-once cancellation flag handed to every work body.
///
/// Bodies poll [`CancellationFlag::is_cancelled`] and return early once it
/// reports `true`. The scheduler never preempts a running body.
#[derive(Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation. Returns `true` only for the call that flipped the flag.
    pub(crate) fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }
}

impl fmt::Debug for CancellationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationFlag")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Object-style unit of work.
///
/// Closures taking `&CancellationFlag` implement this automatically, so
/// `submit_operation(|flag: &CancellationFlag| ...)` works without a wrapper type.
///
/// # Example
///
/// ```rust
/// use lifo_scheduler::core::{CancellationFlag, Operation};
///
/// struct Resize {
///     frames: Vec<u32>,
/// }
///
/// impl Operation for Resize {
///     fn run(self: Box<Self>, cancel: &CancellationFlag) {
///         for _frame in &self.frames {
///             if cancel.is_cancelled() {
///                 return;
///             }
///             // resize...
///         }
///     }
/// }
/// ```
pub trait Operation: Send + 'static {
    /// Execute the work, polling `cancel` where it is safe to stop early.
    fn run(self: Box<Self>, cancel: &CancellationFlag);
}

impl<F> Operation for F
where
    F: FnOnce(&CancellationFlag) + Send + 'static,
{
    fn run(self: Box<Self>, cancel: &CancellationFlag) {
        (*self)(cancel);
    }
}

/// A submission owned by the scheduler until it reaches a terminal state.
pub(crate) struct WorkItem {
    pub id: WorkId,
    pub body: Box<dyn Operation>,
    pub cancel: CancellationFlag,
}

impl WorkItem {
    pub fn new(id: WorkId, body: Box<dyn Operation>) -> Self {
        Self {
            id,
            body,
            cancel: CancellationFlag::new(),
        }
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}
