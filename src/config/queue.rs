//! Queue and scheduler configuration structures.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::core::{SchedulerError, SchedulerResult};

/// Environment variable holding the concurrency ceiling.
pub const ENV_MAX_CONCURRENT: &str = "LIFO_MAX_CONCURRENT";
/// Environment variable selecting whether dispatch starts paused.
pub const ENV_START_SUSPENDED: &str = "LIFO_START_SUSPENDED";
/// Environment variable selecting the executor (`tokio` or `worker_threads`).
pub const ENV_RUNTIME: &str = "LIFO_RUNTIME";
/// Environment variable sizing the worker thread pool.
pub const ENV_WORKER_THREADS: &str = "LIFO_WORKER_THREADS";

/// Executor selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeConfig {
    /// Tokio blocking pool.
    #[default]
    Tokio,
    /// Dedicated OS worker threads.
    WorkerThreads,
}

impl std::str::FromStr for RuntimeConfig {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokio" => Ok(Self::Tokio),
            "worker_threads" | "threads" => Ok(Self::WorkerThreads),
            other => Err(SchedulerError::InvalidConfig(format!(
                "unknown runtime `{other}`"
            ))),
        }
    }
}

/// Configuration for a single LIFO queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum items running at once.
    pub max_concurrent: usize,
    /// Start with dispatch paused.
    #[serde(default)]
    pub start_suspended: bool,
    /// Executor selection.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Worker thread count; defaults to `max_concurrent`.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get().max(1),
            start_suspended: false,
            runtime: RuntimeConfig::Tokio,
            worker_threads: None,
        }
    }
}

impl QueueConfig {
    /// Config with the given ceiling and defaults elsewhere.
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            ..Self::default()
        }
    }

    /// Set whether dispatch starts paused.
    #[must_use]
    pub const fn with_start_suspended(mut self, start_suspended: bool) -> Self {
        self.start_suspended = start_suspended;
        self
    }

    /// Set the executor selection.
    #[must_use]
    pub const fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Set the worker thread count.
    #[must_use]
    pub const fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = Some(worker_threads);
        self
    }

    /// Worker threads to spawn: explicit value or `max_concurrent`.
    #[must_use]
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or(self.max_concurrent)
    }

    /// Validate queue configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` on a zero ceiling or zero workers.
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.max_concurrent == 0 {
            return Err(SchedulerError::InvalidConfig(
                "max_concurrent must be greater than 0".into(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(SchedulerError::InvalidConfig(
                "worker_threads must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Load from `LIFO_*` environment variables, reading `.env` first if present.
    ///
    /// Unset variables keep their defaults. A negative or non-numeric ceiling is
    /// rejected rather than clamped.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` on unparsable or invalid values.
    pub fn from_env() -> SchedulerResult<Self> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test fixtures, ...).
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` on unparsable or invalid values.
    pub fn from_lookup<F>(lookup: F) -> SchedulerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_MAX_CONCURRENT) {
            cfg.max_concurrent = parse_count(ENV_MAX_CONCURRENT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_START_SUSPENDED) {
            cfg.start_suspended = parse_flag(ENV_START_SUSPENDED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RUNTIME) {
            cfg.runtime = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_WORKER_THREADS) {
            cfg.worker_threads = Some(parse_count(ENV_WORKER_THREADS, &raw)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_count(key: &str, raw: &str) -> SchedulerResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| SchedulerError::InvalidConfig(format!("{key}=`{raw}`: {e}")))
}

fn parse_flag(key: &str, raw: &str) -> SchedulerResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SchedulerError::InvalidConfig(format!(
            "{key}=`{raw}` is not a boolean"
        ))),
    }
}

/// Root configuration: named queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of queue name to configuration.
    pub queues: HashMap<String, QueueConfig>,
}

impl SchedulerConfig {
    /// Validate all queues and ensure at least one exists.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` naming the first invalid queue.
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.queues.is_empty() {
            return Err(SchedulerError::InvalidConfig(
                "at least one queue must be defined".into(),
            ));
        }
        for (name, queue) in &self.queues {
            queue.validate().map_err(|e| {
                SchedulerError::InvalidConfig(format!("queue `{name}` invalid: {e}"))
            })?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` on parse or validation failure,
    /// including negative limits.
    pub fn from_json_str(input: &str) -> SchedulerResult<Self> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
