//! Audit sink implementations.
//!
//! Every lifecycle transition of a work item can be mirrored into an
//! [`AuditSink`]. Events are recorded while the scheduler state lock is held, so
//! a sink observes transitions in exactly the order they happened. Sinks must
//! therefore be quick and must not call back into the scheduler.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::{WorkId, WorkState};
use crate::util::clock::now_ms;

/// Lifecycle transition being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Item pushed on the pending stack.
    Submit,
    /// Item popped and handed to the executor.
    Start,
    /// Item finished without its cancellation flag set.
    Complete,
    /// Item discarded while pending, or finished after being flagged.
    Cancel,
}

impl AuditAction {
    /// State a work item is in once this transition has happened.
    #[must_use]
    pub const fn resulting_state(self) -> WorkState {
        match self {
            Self::Submit => WorkState::Pending,
            Self::Start => WorkState::Running,
            Self::Complete => WorkState::Completed,
            Self::Cancel => WorkState::Cancelled,
        }
    }
}

/// Audit event structure.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuditEvent {
    /// Scheduler that owns the item.
    pub scheduler: Uuid,
    /// Related work item.
    pub work_id: WorkId,
    /// Transition taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Shared sink: lets the caller keep a handle and inspect events later.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Work ids for one action, in recording order.
    #[must_use]
    pub fn ids_for(&self, action: AuditAction) -> Vec<WorkId> {
        self.events
            .iter()
            .filter(|event| event.action == action)
            .map(|event| event.work_id)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::debug!(
            scheduler = %event.scheduler,
            work_id = event.work_id,
            action = ?event.action,
            state = ?event.action.resulting_state(),
            at_ms = event.created_at_ms,
            "work lifecycle"
        );
    }
}

/// Helper to build an audit event stamped with the current time.
#[must_use]
pub fn build_audit_event(scheduler: Uuid, work_id: WorkId, action: AuditAction) -> AuditEvent {
    AuditEvent {
        scheduler,
        work_id,
        action,
        created_at_ms: now_ms(),
    }
}
