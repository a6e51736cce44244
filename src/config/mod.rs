//! Configuration models for queues, executors and environment loading.

pub mod queue;

pub use queue::{QueueConfig, RuntimeConfig, SchedulerConfig};
