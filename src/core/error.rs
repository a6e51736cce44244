//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Only construction can fail. Submission, cancellation and suspension are total
/// over a valid scheduler, and panics inside work bodies are absorbed by the
/// executor as ordinary completions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Configuration rejected (zero concurrency limit, unparsable config, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An executor could not be brought up.
    #[error("executor error: {0}")]
    Executor(String),
}

/// Result alias used across the crate.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
