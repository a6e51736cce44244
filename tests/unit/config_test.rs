//! Tests for configuration validation

use std::collections::HashMap;

use lifo_scheduler::config::{QueueConfig, RuntimeConfig, SchedulerConfig};
use lifo_scheduler::core::SchedulerError;

#[test]
fn test_queue_config_validation() {
    let valid = QueueConfig {
        max_concurrent: 4,
        start_suspended: false,
        runtime: RuntimeConfig::Tokio,
        worker_threads: None,
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_queue_config_invalid_max_concurrent() {
    let invalid = QueueConfig::new(0);
    assert!(matches!(
        invalid.validate(),
        Err(SchedulerError::InvalidConfig(_))
    ));
}

#[test]
fn test_queue_config_invalid_worker_threads() {
    let invalid = QueueConfig::new(2).with_worker_threads(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_validation() {
    let mut queues = HashMap::new();
    queues.insert("thumbnails".to_string(), QueueConfig::new(3));

    let config = SchedulerConfig { queues };
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_empty_queues() {
    let config = SchedulerConfig {
        queues: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "queues": {
            "thumbnails": {
                "max_concurrent": 3,
                "start_suspended": true,
                "runtime": "worker_threads",
                "worker_threads": 6
            },
            "previews": {
                "max_concurrent": 1
            }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    let thumbnails = &config.queues["thumbnails"];
    assert_eq!(thumbnails.max_concurrent, 3);
    assert!(thumbnails.start_suspended);
    assert_eq!(thumbnails.runtime, RuntimeConfig::WorkerThreads);
    assert_eq!(thumbnails.effective_worker_threads(), 6);

    let previews = &config.queues["previews"];
    assert!(!previews.start_suspended);
    assert_eq!(previews.runtime, RuntimeConfig::Tokio);
}

#[test]
fn test_scheduler_config_rejects_zero_and_negative() {
    for limit in ["0", "-1"] {
        let json = format!(r#"{{ "queues": {{ "q": {{ "max_concurrent": {limit} }} }} }}"#);
        let err = SchedulerConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfig(_)), "{limit}");
    }
}

#[test]
fn test_runtime_config_from_str() {
    assert_eq!("tokio".parse::<RuntimeConfig>().unwrap(), RuntimeConfig::Tokio);
    assert_eq!(
        " Worker_Threads ".parse::<RuntimeConfig>().unwrap(),
        RuntimeConfig::WorkerThreads
    );
    assert!("green".parse::<RuntimeConfig>().is_err());
}
