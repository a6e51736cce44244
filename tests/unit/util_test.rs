//! Tests for utility functions

use lifo_scheduler::core::{CancellationFlag, WorkState};
use lifo_scheduler::util::{init_tracing, now_ms};

#[test]
fn test_now_ms_after_epoch() {
    // 2020-01-01T00:00:00Z
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialised twice without panicking");
}

#[test]
fn test_fresh_flag_not_cancelled() {
    let flag = CancellationFlag::new();
    assert!(!flag.is_cancelled());
    assert!(!flag.clone().is_cancelled());
}

#[test]
fn test_work_state_serde() {
    let json = serde_json::to_string(&WorkState::Cancelled).unwrap();
    assert_eq!(json, "\"cancelled\"");
    let back: WorkState = serde_json::from_str("\"running\"").unwrap();
    assert_eq!(back, WorkState::Running);
}
