//! Builders to construct schedulers and executors from configuration.

pub mod queue_builder;

pub use queue_builder::{
    build_executor, build_scheduler, build_schedulers, ConfiguredExecutor, SchedulerBuilder,
};
