//! Lifecycle tracker: running work and its cancellation flags.

use std::collections::HashMap;

use super::work::{CancellationFlag, WorkId, WorkState};

/// Bookkeeping for work currently handed to the executor.
///
/// The running count is the size of the map, so it cannot drift from the set of
/// registered items.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    running: HashMap<WorkId, CancellationFlag>,
}

impl LifecycleTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item as running.
    pub fn start(&mut self, id: WorkId, cancel: CancellationFlag) {
        let previous = self.running.insert(id, cancel);
        debug_assert!(previous.is_none(), "work {id} started twice");
    }

    /// Deregister a finished item and classify its terminal state.
    ///
    /// Returns `None` for ids that are not running.
    pub fn finish(&mut self, id: WorkId) -> Option<WorkState> {
        self.running.remove(&id).map(|cancel| {
            if cancel.is_cancelled() {
                WorkState::Cancelled
            } else {
                WorkState::Completed
            }
        })
    }

    /// Set the flag of every running item. Returns how many were newly flagged.
    pub fn cancel_all(&mut self) -> usize {
        self.running
            .values()
            .filter(|cancel| cancel.cancel())
            .count()
    }

    /// Number of running items.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}
