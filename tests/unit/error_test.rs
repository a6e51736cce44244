//! Tests for error types

use lifo_scheduler::core::SchedulerError;

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_concurrent must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_concurrent must be greater than 0"
    );
}

#[test]
fn test_executor_error() {
    let err = SchedulerError::Executor("no tokio runtime".to_string());
    assert_eq!(format!("{}", err), "executor error: no tokio runtime");
}

#[test]
fn test_errors_compare_by_value() {
    assert_eq!(
        SchedulerError::InvalidConfig("a".into()),
        SchedulerError::InvalidConfig("a".into())
    );
    assert_ne!(
        SchedulerError::InvalidConfig("a".into()),
        SchedulerError::Executor("a".into())
    );
}
