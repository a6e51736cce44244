//! Builders to construct schedulers and executors from configuration.

use std::collections::HashMap;

use crate::config::{QueueConfig, RuntimeConfig, SchedulerConfig};
use crate::core::{
    AuditSink, Completion, Executor, Job, LifoScheduler, SchedulerError, SchedulerResult,
};

/// Step-by-step scheduler construction.
///
/// ```rust
/// use lifo_scheduler::builders::SchedulerBuilder;
/// use lifo_scheduler::core::InMemoryAuditSink;
/// use lifo_scheduler::runtime::WorkerThreadExecutor;
///
/// let scheduler = SchedulerBuilder::new(4)
///     .suspended(true)
///     .audit(InMemoryAuditSink::new(256))
///     .build(WorkerThreadExecutor::new(4)?)?;
/// assert!(scheduler.is_suspended());
/// # Ok::<(), lifo_scheduler::core::SchedulerError>(())
/// ```
pub struct SchedulerBuilder {
    max_concurrent: usize,
    suspended: bool,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start a builder with the given concurrency ceiling.
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            suspended: false,
            audit: None,
        }
    }

    /// Start a builder from a validated queue config.
    #[must_use]
    pub fn from_config(cfg: &QueueConfig) -> Self {
        Self::new(cfg.max_concurrent).suspended(cfg.start_suspended)
    }

    /// Start with dispatch paused.
    #[must_use]
    pub const fn suspended(mut self, suspended: bool) -> Self {
        self.suspended = suspended;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn audit(mut self, audit: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(audit));
        self
    }

    /// Build the scheduler on top of `executor`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` if the ceiling is zero.
    pub fn build<E: Executor>(self, executor: E) -> SchedulerResult<LifoScheduler<E>> {
        LifoScheduler::from_parts(self.max_concurrent, self.suspended, self.audit, executor)
    }
}

/// Executor chosen by [`RuntimeConfig`].
pub enum ConfiguredExecutor {
    /// Tokio blocking pool.
    #[cfg(feature = "tokio-runtime")]
    Tokio(crate::runtime::TokioExecutor),
    /// Dedicated worker threads.
    #[cfg(not(target_arch = "wasm32"))]
    WorkerThreads(crate::runtime::WorkerThreadExecutor),
}

impl Executor for ConfiguredExecutor {
    fn run(&self, job: Job, on_complete: Completion) {
        match self {
            #[cfg(feature = "tokio-runtime")]
            Self::Tokio(executor) => executor.run(job, on_complete),
            #[cfg(not(target_arch = "wasm32"))]
            Self::WorkerThreads(executor) => executor.run(job, on_complete),
        }
    }
}

/// Build the executor a queue config asks for.
///
/// The tokio runtime reuses the ambient runtime when called inside one and
/// otherwise owns a runtime with `effective_worker_threads` workers.
///
/// # Errors
///
/// - `SchedulerError::InvalidConfig` if the config is invalid or the runtime is
///   unavailable on this target
/// - `SchedulerError::Executor` if the executor cannot be started
pub fn build_executor(cfg: &QueueConfig) -> SchedulerResult<ConfiguredExecutor> {
    cfg.validate()?;
    match cfg.runtime {
        #[cfg(feature = "tokio-runtime")]
        RuntimeConfig::Tokio => {
            let executor = match crate::runtime::TokioExecutor::current() {
                Ok(executor) => executor,
                Err(_) => crate::runtime::TokioExecutor::with_worker_threads(
                    cfg.effective_worker_threads(),
                )?,
            };
            Ok(ConfiguredExecutor::Tokio(executor))
        }
        #[cfg(not(target_arch = "wasm32"))]
        RuntimeConfig::WorkerThreads => Ok(ConfiguredExecutor::WorkerThreads(
            crate::runtime::WorkerThreadExecutor::new(cfg.effective_worker_threads())?,
        )),
        #[allow(unreachable_patterns)]
        other => Err(SchedulerError::InvalidConfig(format!(
            "runtime {other:?} is not available in this build"
        ))),
    }
}

/// Build a scheduler from a queue config on top of `executor`.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidConfig` if the config is invalid.
pub fn build_scheduler<E: Executor>(
    cfg: &QueueConfig,
    executor: E,
) -> SchedulerResult<LifoScheduler<E>> {
    cfg.validate()?;
    SchedulerBuilder::from_config(cfg).build(executor)
}

/// Build every named queue in `cfg`, asking `executor_factory` for each executor.
///
/// # Errors
///
/// Returns the first validation or factory error.
pub fn build_schedulers<E, F>(
    cfg: &SchedulerConfig,
    mut executor_factory: F,
) -> SchedulerResult<HashMap<String, LifoScheduler<E>>>
where
    E: Executor,
    F: FnMut(&str, &QueueConfig) -> SchedulerResult<E>,
{
    cfg.validate()?;

    let mut schedulers = HashMap::with_capacity(cfg.queues.len());
    for (name, queue_cfg) in &cfg.queues {
        let executor = executor_factory(name, queue_cfg)?;
        let scheduler = build_scheduler(queue_cfg, executor)?;
        tracing::info!(queue = %name, scheduler = %scheduler.id(), "queue built");
        schedulers.insert(name.clone(), scheduler);
    }

    Ok(schedulers)
}
