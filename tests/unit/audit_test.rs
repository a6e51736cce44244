//! Tests for audit sink

use lifo_scheduler::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let scheduler = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(scheduler, 7, AuditAction::Submit));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].scheduler, scheduler);
    assert_eq!(events[0].work_id, 7);
    assert_eq!(events[0].action, AuditAction::Submit);
}

#[test]
fn test_audit_sink_overflow() {
    let scheduler = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(scheduler, 1, AuditAction::Submit));
    sink.record(build_audit_event(scheduler, 2, AuditAction::Start));
    sink.record(build_audit_event(scheduler, 3, AuditAction::Complete));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].work_id, 2); // First one popped
    assert_eq!(events[1].work_id, 3);
}

#[test]
fn test_build_audit_event() {
    let scheduler = Uuid::new_v4();
    let event = build_audit_event(scheduler, 42, AuditAction::Cancel);

    assert_eq!(event.scheduler, scheduler);
    assert_eq!(event.work_id, 42);
    assert_eq!(event.action, AuditAction::Cancel);
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_audit_action_serializes_snake_case() {
    let json = serde_json::to_string(&AuditAction::Complete).unwrap();
    assert_eq!(json, "\"complete\"");
}

#[test]
fn test_audit_event_json_keeps_scheduler_id() {
    let scheduler = Uuid::new_v4();
    let event = build_audit_event(scheduler, 9, AuditAction::Start);

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains(&scheduler.to_string()));

    let back: lifo_scheduler::core::AuditEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back.scheduler, scheduler);
    assert_eq!(back.work_id, 9);
    assert_eq!(back.action, AuditAction::Start);
}
