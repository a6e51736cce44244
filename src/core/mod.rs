//! Core scheduling abstractions: work items, the pending stack, lifecycle
//! tracking and the LIFO dispatch loop.

pub mod audit;
pub mod error;
pub mod executor;
pub mod pending;
pub mod scheduler;
pub mod stats;
pub mod tracker;
pub mod work;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use error::{SchedulerError, SchedulerResult};
pub use executor::{Completion, Executor, Job};
pub use pending::PendingStack;
pub use scheduler::LifoScheduler;
pub use stats::SchedulerStats;
pub use tracker::LifecycleTracker;
pub use work::{CancellationFlag, Operation, WorkId, WorkState};
