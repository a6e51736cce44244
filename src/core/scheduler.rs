//! LIFO scheduler: bounded concurrency, stack-order dispatch, cooperative cancellation.
//!
//! All state lives behind one `parking_lot::Mutex`. Every public operation takes
//! the lock, mutates, and then runs a dispatch pass that pops pending work in
//! stack order while there is free capacity and dispatch is not suspended.
//!
//! Jobs are handed to the [`Executor`] with the lock released, so an executor
//! that completes work synchronously (or a work body that submits more work)
//! re-enters the scheduler safely. Only one dispatch pass runs at a time: a
//! trigger arriving during a pass marks it for another iteration instead of
//! starting a second pass.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::audit::{build_audit_event, AuditAction, AuditSink};
use super::error::{SchedulerError, SchedulerResult};
use super::executor::{panic_message, Completion, Executor, Job};
use super::pending::PendingStack;
use super::stats::{Counters, SchedulerStats};
use super::tracker::LifecycleTracker;
use super::work::{CancellationFlag, Operation, WorkId, WorkItem, WorkState};

/// Mutable scheduler state, guarded by a single lock.
struct State {
    pending: PendingStack<WorkItem>,
    tracker: LifecycleTracker,
    suspended: bool,
    /// A dispatch pass is in progress.
    dispatching: bool,
    /// Something changed while a pass was in progress.
    redispatch: bool,
    next_id: WorkId,
    counters: Counters,
}

impl State {
    fn new(suspended: bool) -> Self {
        Self {
            pending: PendingStack::new(),
            tracker: LifecycleTracker::new(),
            suspended,
            dispatching: false,
            redispatch: false,
            next_id: 0,
            counters: Counters::default(),
        }
    }

    fn is_idle(&self) -> bool {
        !self.dispatching
            && self.tracker.running_count() == 0
            && (self.suspended || self.pending.is_empty())
    }
}

struct Shared<E> {
    id: Uuid,
    max_concurrent: usize,
    executor: E,
    state: Mutex<State>,
    idle: Condvar,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
}

impl<E: Executor> Shared<E> {
    /// Record a transition. Callers hold the state lock.
    fn record(&self, work_id: WorkId, action: AuditAction) {
        if let Some(audit) = &self.audit {
            audit.lock().record(build_audit_event(self.id, work_id, action));
        }
    }

    fn notify_if_idle(&self, state: &State) {
        if state.is_idle() {
            self.idle.notify_all();
        }
    }

    /// Run a dispatch pass, consuming the caller's guard.
    fn dispatch(shared: &Arc<Self>, mut state: MutexGuard<'_, State>) {
        if state.dispatching {
            state.redispatch = true;
            return;
        }
        state.dispatching = true;

        loop {
            let batch = shared.take_ready(&mut state);
            if !batch.is_empty() {
                MutexGuard::unlocked(&mut state, || {
                    for item in batch {
                        let id = item.id;
                        // The unwind drops the item's completion, which frees its slot.
                        if let Err(payload) =
                            catch_unwind(AssertUnwindSafe(|| Self::launch(shared, item)))
                        {
                            warn!(
                                scheduler = %shared.id,
                                work_id = id,
                                panic = %panic_message(payload.as_ref()),
                                "executor panicked while accepting work; body dropped unrun"
                            );
                        }
                    }
                });
            }
            if !std::mem::take(&mut state.redispatch) {
                break;
            }
        }

        state.dispatching = false;
        shared.notify_if_idle(&state);
    }

    /// Pop ready items in stack order and mark them running.
    fn take_ready(&self, state: &mut State) -> Vec<WorkItem> {
        let mut batch = Vec::new();
        while !state.suspended && state.tracker.running_count() < self.max_concurrent {
            let Some(item) = state.pending.pop() else {
                break;
            };
            state.tracker.start(item.id, item.cancel.clone());
            state.counters.started += 1;
            self.record(item.id, AuditAction::Start);
            debug!(
                scheduler = %self.id,
                work_id = item.id,
                running = state.tracker.running_count(),
                pending = state.pending.len(),
                "starting work"
            );
            batch.push(item);
        }
        batch
    }

    fn launch(shared: &Arc<Self>, item: WorkItem) {
        let WorkItem { id, body, cancel } = item;
        let scheduler = shared.id;
        let job: Job = Box::new(move || {
            // Flagged between the pop and the executor picking it up.
            if cancel.is_cancelled() {
                debug!(scheduler = %scheduler, work_id = id, "work cancelled before its body ran");
                return;
            }
            body.run(&cancel);
        });
        let owner = Arc::clone(shared);
        let completion = Completion::new(move || Self::complete(&owner, id));
        shared.executor.run(job, completion);
    }

    fn complete(shared: &Arc<Self>, id: WorkId) {
        let mut state = shared.state.lock();
        match state.tracker.finish(id) {
            Some(WorkState::Cancelled) => {
                state.counters.cancelled += 1;
                shared.record(id, AuditAction::Cancel);
                debug!(scheduler = %shared.id, work_id = id, "work finished after cancellation");
            }
            Some(_) => {
                state.counters.completed += 1;
                shared.record(id, AuditAction::Complete);
                debug!(scheduler = %shared.id, work_id = id, "work completed");
            }
            None => {
                warn!(
                    scheduler = %shared.id,
                    work_id = id,
                    "completion for work that is not running"
                );
                return;
            }
        }
        Self::dispatch(shared, state);
    }
}

/// Bounded-concurrency scheduler that starts the most recently submitted work first.
///
/// The handle is cheap to clone; clones share the same queue. At most
/// `max_concurrent` items run at once, and whenever a slot frees up the newest
/// pending item takes it.
///
/// # Example
///
/// ```rust
/// use lifo_scheduler::core::LifoScheduler;
/// use lifo_scheduler::runtime::WorkerThreadExecutor;
/// use std::time::Duration;
///
/// let executor = WorkerThreadExecutor::new(2)?;
/// let scheduler = LifoScheduler::new(2, executor)?;
///
/// scheduler.submit(|| println!("thumbnail"));
/// scheduler.submit_operation(|cancel: &lifo_scheduler::core::CancellationFlag| {
///     while !cancel.is_cancelled() {
///         // chunked work...
///         break;
///     }
/// });
///
/// assert!(scheduler.wait_until_idle(Duration::from_secs(5)));
/// # Ok::<(), lifo_scheduler::core::SchedulerError>(())
/// ```
pub struct LifoScheduler<E: Executor> {
    shared: Arc<Shared<E>>,
}

impl<E: Executor> Clone for LifoScheduler<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E: Executor> LifoScheduler<E> {
    /// Create a scheduler running at most `max_concurrent` items at once.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` if `max_concurrent` is zero.
    pub fn new(max_concurrent: usize, executor: E) -> SchedulerResult<Self> {
        Self::from_parts(max_concurrent, false, None, executor)
    }

    pub(crate) fn from_parts(
        max_concurrent: usize,
        suspended: bool,
        audit: Option<Box<dyn AuditSink>>,
        executor: E,
    ) -> SchedulerResult<Self> {
        if max_concurrent == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max_concurrent must be greater than 0".into(),
            ));
        }

        let id = Uuid::new_v4();
        info!(scheduler = %id, max_concurrent, suspended, "LIFO scheduler created");

        Ok(Self {
            shared: Arc::new(Shared {
                id,
                max_concurrent,
                executor,
                state: Mutex::new(State::new(suspended)),
                idle: Condvar::new(),
                audit: audit.map(Mutex::new),
            }),
        })
    }

    /// Submit a closure. It starts once capacity allows, ahead of anything
    /// already pending.
    pub fn submit<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_operation(move |_: &CancellationFlag| work());
    }

    /// Submit work that observes its cancellation flag.
    pub fn submit_operation<O>(&self, operation: O)
    where
        O: Operation,
    {
        self.enqueue(Box::new(operation));
    }

    fn enqueue(&self, body: Box<dyn Operation>) {
        let shared = &self.shared;
        let mut state = shared.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.counters.submitted += 1;
        state.pending.push(WorkItem::new(id, body));
        shared.record(id, AuditAction::Submit);
        debug!(
            scheduler = %shared.id,
            work_id = id,
            pending = state.pending.len(),
            "work submitted"
        );
        Shared::dispatch(shared, state);
    }

    /// Pause or resume dispatch.
    ///
    /// Suspending leaves running work alone. Resuming immediately starts as
    /// many pending items as there are free slots, newest first.
    pub fn set_suspended(&self, suspended: bool) {
        let shared = &self.shared;
        let mut state = shared.state.lock();
        if state.suspended == suspended {
            return;
        }
        state.suspended = suspended;

        if suspended {
            info!(
                scheduler = %shared.id,
                pending = state.pending.len(),
                running = state.tracker.running_count(),
                "dispatch suspended"
            );
            shared.notify_if_idle(&state);
        } else {
            info!(scheduler = %shared.id, pending = state.pending.len(), "dispatch resumed");
            Shared::dispatch(shared, state);
        }
    }

    /// Whether dispatch is paused.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.shared.state.lock().suspended
    }

    /// Discard all pending work and flag all running work.
    ///
    /// Pending bodies are dropped without running. Running bodies keep going
    /// until they notice their flag (or finish on their own); their slots free
    /// up as they complete. Does not wait for them.
    pub fn cancel_all(&self) {
        let shared = &self.shared;
        let mut state = shared.state.lock();

        let discarded: Vec<WorkItem> = state.pending.drain().collect();
        for item in &discarded {
            shared.record(item.id, AuditAction::Cancel);
        }
        state.counters.cancelled += discarded.len() as u64;
        let flagged = state.tracker.cancel_all();

        if !discarded.is_empty() || flagged > 0 {
            info!(
                scheduler = %shared.id,
                discarded = discarded.len(),
                flagged,
                "cancelled all work"
            );
        }
        shared.notify_if_idle(&state);
        drop(state);

        // Bodies may own resources with their own drop logic; release them unlocked.
        drop(discarded);
    }

    /// Block until nothing is running and nothing dispatchable is pending.
    ///
    /// Returns `false` if `timeout` elapses first. A timeout too large to
    /// represent as a deadline (such as `Duration::MAX`) waits without limit.
    /// Must not be called from a work body, which would wait on itself.
    #[must_use]
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.shared.state.lock();
        while !state.is_idle() {
            match deadline {
                Some(deadline) => {
                    if self.shared.idle.wait_until(&mut state, deadline).timed_out() {
                        return state.is_idle();
                    }
                }
                None => self.shared.idle.wait(&mut state),
            }
        }
        true
    }

    /// Unique id of this scheduler, as used in log fields and audit events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Concurrency ceiling.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.shared.max_concurrent
    }

    /// Items waiting to start.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Items currently running.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.shared.state.lock().tracker.running_count()
    }

    /// Consistent snapshot of state and counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let state = self.shared.state.lock();
        SchedulerStats {
            max_concurrent: self.shared.max_concurrent,
            running: state.tracker.running_count(),
            pending: state.pending.len(),
            suspended: state.suspended,
            submitted: state.counters.submitted,
            started: state.counters.started,
            completed: state.counters.completed,
            cancelled: state.counters.cancelled,
        }
    }

    /// The executor work is dispatched onto.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.shared.executor
    }
}

impl<E: Executor> fmt::Debug for LifoScheduler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("LifoScheduler")
            .field("id", &self.shared.id)
            .field("max_concurrent", &stats.max_concurrent)
            .field("running", &stats.running)
            .field("pending", &stats.pending)
            .field("suspended", &stats.suspended)
            .finish()
    }
}
