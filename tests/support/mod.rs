//! Shared test helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use lifo_scheduler::core::{Completion, Executor, Job};
use parking_lot::Mutex;

/// Executor that parks every job until the test runs it.
///
/// Jobs are kept in hand-off order, so the queue order is the scheduler's
/// start order.
#[derive(Clone, Default)]
pub struct ManualExecutor {
    parked: Arc<Mutex<VecDeque<(Job, Completion)>>>,
}

impl ManualExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs handed over and not yet run.
    pub fn in_flight(&self) -> usize {
        self.parked.lock().len()
    }

    /// Run the oldest parked job and complete it. Returns `false` if none.
    pub fn run_next(&self) -> bool {
        // Pop before running: completion re-enters the scheduler, which calls `run`.
        let next = self.parked.lock().pop_front();
        match next {
            Some((job, on_complete)) => {
                job();
                on_complete.complete();
                true
            }
            None => false,
        }
    }

    /// Complete the oldest parked job without running its body.
    pub fn complete_next_unrun(&self) -> bool {
        let next = self.parked.lock().pop_front();
        next.map(|(_, on_complete)| on_complete.complete()).is_some()
    }

    /// Keep running jobs until nothing is parked. Returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Executor for ManualExecutor {
    fn run(&self, job: Job, on_complete: Completion) {
        self.parked.lock().push_back((job, on_complete));
    }
}

/// Append-only log shared between test bodies.
#[derive(Clone)]
pub struct Log<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Log<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        self.entries.lock().push(entry);
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
