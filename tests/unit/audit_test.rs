//! Tests for lifecycle event sinks

use prometheus_priority_scheduler::core::{
    build_event, EventKind, EventSink, InMemoryEventSink, SharedEventSink,
};
use uuid::Uuid;

#[test]
fn test_in_memory_event_sink() {
    let scheduler_id = Uuid::new_v4();
    let mut sink = InMemoryEventSink::new(10);

    let event = build_event(
        scheduler_id,
        EventKind::Failed,
        Some((2, 5)),
        Some("boom".to_string()),
    );
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].scheduler_id, scheduler_id);
    assert_eq!(events[0].kind, EventKind::Failed);
    assert_eq!(events[0].priority, Some(2));
    assert_eq!(events[0].order, Some(5));
    assert_eq!(events[0].detail.as_deref(), Some("boom"));
}

#[test]
fn test_event_sink_overflow() {
    let id = Uuid::new_v4();
    let mut sink = InMemoryEventSink::new(2);

    sink.record(build_event(id, EventKind::Posted, Some((1, 0)), None));
    sink.record(build_event(id, EventKind::Posted, Some((1, 1)), None));
    sink.record(build_event(id, EventKind::Posted, Some((1, 2)), None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].order, Some(1)); // First one popped
    assert_eq!(events[1].order, Some(2));
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryEventSink::new(0);
    sink.record(build_event(Uuid::nil(), EventKind::DrainStarted, None, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_event() {
    let event = build_event(Uuid::nil(), EventKind::DrainSkipped, None, None);

    assert_eq!(event.kind, EventKind::DrainSkipped);
    assert_eq!(event.priority, None);
    assert_eq!(event.order, None);
    assert_ne!(event.event_id, Uuid::nil());
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_shared_sink_filters_by_kind() {
    let reader = SharedEventSink::new(16);
    let mut writer = reader.clone();
    for kind in [EventKind::Posted, EventKind::Started, EventKind::Posted] {
        writer.record(build_event(Uuid::nil(), kind, None, None));
    }
    assert_eq!(reader.events_of(EventKind::Posted).len(), 2);
    assert_eq!(reader.events_of(EventKind::Completed).len(), 0);
}

#[test]
fn test_event_kind_serializes_snake_case() {
    let json = serde_json::to_string(&EventKind::DrainFinished).unwrap();
    assert_eq!(json, "\"drain_finished\"");
}

#[test]
fn test_scheduler_event_json_round_trip() {
    let event = build_event(Uuid::new_v4(), EventKind::Posted, Some((-3, 42)), None);

    let json = serde_json::to_string(&event).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "posted");
    assert_eq!(value["priority"], -3);
    assert_eq!(value["order"], 42);
    assert!(value["detail"].is_null());

    let back: prometheus_priority_scheduler::core::SchedulerEvent =
        serde_json::from_str(&json).unwrap();
    assert_eq!(back.event_id, event.event_id);
    assert_eq!(back.scheduler_id, event.scheduler_id);
    assert_eq!(back.kind, EventKind::Posted);
    assert_eq!(back.created_at_ms, event.created_at_ms);
}
