//! Point-in-time scheduler statistics.

/// Snapshot of scheduler state and lifetime counters.
///
/// Taken under the state lock, so the fields are mutually consistent:
/// `submitted == completed + cancelled + pending + running` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchedulerStats {
    /// Configured concurrency ceiling.
    pub max_concurrent: usize,
    /// Items currently handed to the executor.
    pub running: usize,
    /// Items waiting on the pending stack.
    pub pending: usize,
    /// Whether dispatch is paused.
    pub suspended: bool,
    /// Total submissions.
    pub submitted: u64,
    /// Total Pending→Running transitions.
    pub started: u64,
    /// Items that finished without their cancellation flag set.
    pub completed: u64,
    /// Items discarded while pending or finished after being flagged.
    pub cancelled: u64,
}

impl SchedulerStats {
    /// Items that reached a terminal state.
    #[must_use]
    pub const fn finished(&self) -> u64 {
        self.completed + self.cancelled
    }

    /// Free dispatch slots.
    #[must_use]
    pub const fn available_slots(&self) -> usize {
        self.max_concurrent.saturating_sub(self.running)
    }
}

/// Lifetime counters kept inside the scheduler state.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    pub submitted: u64,
    pub started: u64,
    pub completed: u64,
    pub cancelled: u64,
}
