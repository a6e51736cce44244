//! Executor backed by dedicated OS threads.
//!
//! Workers block on an unbounded channel; jobs are picked up in the order the
//! scheduler dispatched them. The channel never fills, so `run` never blocks
//! the scheduler. Concurrency is bounded by the scheduler, so the pool only
//! needs at least `max_concurrent` workers to avoid adding its own queueing.
//!
//! # Design Principles
//!
//! - **No polling**: Workers sleep in `recv` until work arrives
//! - **Panic isolation**: Each job runs under `catch_unwind`; the worker survives
//! - **Clean shutdown**: Dropping the sender lets workers drain the channel and exit

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::executor::panic_message;
use crate::core::{Completion, Executor, Job, SchedulerError, SchedulerResult};

/// How long `shutdown` waits for each worker before detaching it.
const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// A job travelling to a worker together with its continuation.
struct Dispatch {
    job: Job,
    on_complete: Completion,
}

/// Fixed pool of worker threads named `lifo-worker-{i}`.
pub struct WorkerThreadExecutor {
    /// Job sender. `None` once shut down.
    task_tx: Mutex<Option<Sender<Dispatch>>>,
    /// Worker thread handles.
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    shutdown: AtomicBool,
}

impl WorkerThreadExecutor {
    /// Spawn `worker_count` worker threads.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if `worker_count` is zero
    /// - `SchedulerError::Executor` if a thread cannot be spawned
    pub fn new(worker_count: usize) -> SchedulerResult<Self> {
        if worker_count == 0 {
            return Err(SchedulerError::InvalidConfig(
                "worker_count must be greater than 0".into(),
            ));
        }

        let (task_tx, task_rx) = unbounded::<Dispatch>();
        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            // On failure the already-spawned workers exit once `task_tx` drops.
            workers.push(spawn_worker(worker_id, task_rx.clone())?);
        }

        info!(worker_count, "worker thread executor started");

        Ok(Self {
            task_tx: Mutex::new(Some(task_tx)),
            workers: Mutex::new(workers),
            worker_count,
            shutdown: AtomicBool::new(false),
        })
    }

    /// One worker per available CPU.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Executor` if a thread cannot be spawned.
    pub fn with_default_workers() -> SchedulerResult<Self> {
        Self::new(num_cpus::get().max(1))
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Whether `shutdown` has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Stop accepting jobs, let workers drain what is queued, and join them.
    ///
    /// Workers still busy after a per-worker timeout are detached. Jobs handed
    /// to `run` afterwards are dropped unrun and their completions fire
    /// immediately.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        info!("shutting down worker thread executor");
        *self.task_tx.lock() = None;

        let mut workers = self.workers.lock();
        let worker_count = workers.len();
        for (idx, worker) in workers.drain(..).enumerate() {
            let (done_tx, done_rx) = crossbeam_channel::bounded(1);
            let joiner = thread::spawn(move || {
                let joined = worker.join().is_ok();
                let _ = done_tx.send(joined);
            });

            match done_rx.recv_timeout(JOIN_TIMEOUT) {
                Ok(true) => debug!(worker_id = idx, "worker joined"),
                Ok(false) => warn!(worker_id = idx, "worker panicked"),
                Err(_) => {
                    warn!(worker_id = idx, "worker did not exit within timeout - detaching");
                    continue;
                }
            }
            let _ = joiner.join();
        }

        info!(worker_count, "worker thread executor shut down");
    }
}

impl Executor for WorkerThreadExecutor {
    fn run(&self, job: Job, on_complete: Completion) {
        let dispatch = Dispatch { job, on_complete };
        let rejected = {
            let task_tx = self.task_tx.lock();
            match task_tx.as_ref() {
                Some(task_tx) => task_tx.send(dispatch).err().map(|e| e.into_inner()),
                None => Some(dispatch),
            }
        };

        // Dropped outside the sender lock: the completion re-enters the scheduler,
        // which may call `run` again.
        if let Some(dispatch) = rejected {
            warn!("executor shut down; dropping job");
            drop(dispatch);
        }
    }
}

impl Drop for WorkerThreadExecutor {
    fn drop(&mut self) {
        // Signal shutdown without joining; explicit `shutdown()` joins.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            *self.task_tx.lock() = None;
            debug!("worker thread executor dropped without shutdown - workers detached");
        }
    }
}

fn spawn_worker(worker_id: usize, task_rx: Receiver<Dispatch>) -> SchedulerResult<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("lifo-worker-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, "worker thread started");

            // Returns Err once the sender is gone and the channel is drained.
            while let Ok(Dispatch { job, on_complete }) = task_rx.recv() {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                    warn!(
                        worker_id,
                        panic = %panic_message(payload.as_ref()),
                        "work body panicked; treating as completed"
                    );
                }
                on_complete.complete();
            }

            debug!(worker_id, "worker thread exiting");
        })
        .map_err(|e| SchedulerError::Executor(format!("failed to spawn worker {worker_id}: {e}")))
}
