//! Tests for builder modules

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lifo_scheduler::builders::{build_scheduler, build_schedulers, SchedulerBuilder};
use lifo_scheduler::config::{QueueConfig, SchedulerConfig};
use lifo_scheduler::core::SchedulerError;
use lifo_scheduler::runtime::WorkerThreadExecutor;

#[test]
fn test_scheduler_builder_defaults() {
    let scheduler = SchedulerBuilder::new(3)
        .build(WorkerThreadExecutor::new(3).unwrap())
        .unwrap();
    assert_eq!(scheduler.max_concurrent(), 3);
    assert!(!scheduler.is_suspended());
    scheduler.executor().shutdown();
}

#[test]
fn test_build_scheduler_applies_start_suspended() {
    let cfg = QueueConfig::new(2).with_start_suspended(true);
    let scheduler = build_scheduler(&cfg, WorkerThreadExecutor::new(2).unwrap()).unwrap();
    assert!(scheduler.is_suspended());

    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);
    scheduler.submit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.set_suspended(false);
    assert!(scheduler.wait_until_idle(Duration::from_secs(5)));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    scheduler.executor().shutdown();
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let err = build_scheduler(&QueueConfig::new(0), WorkerThreadExecutor::new(1).unwrap())
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_build_schedulers_per_queue_executor() {
    let mut queues = HashMap::new();
    queues.insert("fast".to_string(), QueueConfig::new(4));
    queues.insert("slow".to_string(), QueueConfig::new(1).with_worker_threads(2));
    let cfg = SchedulerConfig { queues };

    let mut requested = Vec::new();
    let schedulers = build_schedulers(&cfg, |name, queue_cfg| {
        requested.push(name.to_string());
        WorkerThreadExecutor::new(queue_cfg.effective_worker_threads())
    })
    .unwrap();

    requested.sort();
    assert_eq!(requested, vec!["fast", "slow"]);
    assert_eq!(schedulers["fast"].max_concurrent(), 4);
    assert_eq!(schedulers["fast"].executor().worker_count(), 4);
    assert_eq!(schedulers["slow"].executor().worker_count(), 2);
    assert_ne!(schedulers["fast"].id(), schedulers["slow"].id());

    for scheduler in schedulers.values() {
        scheduler.executor().shutdown();
    }
}

#[test]
fn test_build_schedulers_propagates_factory_error() {
    let mut queues = HashMap::new();
    queues.insert("q".to_string(), QueueConfig::new(1));
    let cfg = SchedulerConfig { queues };

    let result = build_schedulers::<WorkerThreadExecutor, _>(&cfg, |_, _| {
        Err(SchedulerError::Executor("no threads today".into()))
    });
    assert!(matches!(result, Err(SchedulerError::Executor(_))));
}
