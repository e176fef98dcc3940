//! Tests for builder modules

use std::collections::HashMap;

use prometheus_priority_scheduler::builders::{build_schedulers, SchedulerBuilder};
use prometheus_priority_scheduler::config::{FailurePolicy, SchedulerConfig, SchedulerSetConfig};
use prometheus_priority_scheduler::core::{EventSink, SchedulerError, SharedEventSink};

#[test]
fn test_builder_defaults() {
    let scheduler = SchedulerBuilder::new().build().unwrap();
    assert_eq!(scheduler.failure_policy(), FailurePolicy::Propagate);
    assert_eq!(scheduler.pending(), 0);
    assert!(scheduler.is_idle());
}

#[test]
fn test_builder_overrides() {
    let scheduler = SchedulerBuilder::new()
        .initial_capacity(8)
        .failure_policy(FailurePolicy::Isolate)
        .build()
        .unwrap();
    assert_eq!(scheduler.failure_policy(), FailurePolicy::Isolate);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = SchedulerBuilder::new()
        .config(SchedulerConfig {
            event_buffer: 0,
            ..SchedulerConfig::default()
        })
        .build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_builder_with_events_records_posts() {
    let (scheduler, events) = SchedulerBuilder::new().build_with_events().unwrap();
    scheduler.post_task(|| async {}, 4);
    assert_eq!(events.events().len(), 1);
    assert_eq!(events.events()[0].priority, Some(4));
}

#[test]
fn test_build_schedulers_from_set() {
    let mut schedulers = HashMap::new();
    schedulers.insert(
        "ui".to_string(),
        SchedulerConfig {
            failure_policy: FailurePolicy::Isolate,
            ..SchedulerConfig::default()
        },
    );
    schedulers.insert("jobs".to_string(), SchedulerConfig::default());
    let cfg = SchedulerSetConfig { schedulers };

    let sinks: HashMap<String, SharedEventSink> = HashMap::new();
    let sinks = std::cell::RefCell::new(sinks);
    let built = build_schedulers(&cfg, |name, scheduler_cfg| {
        let sink = SharedEventSink::new(scheduler_cfg.event_buffer);
        sinks.borrow_mut().insert(name.to_string(), sink.clone());
        Some(Box::new(sink) as Box<dyn EventSink>)
    })
    .unwrap();

    assert_eq!(built.len(), 2);
    assert_eq!(built["ui"].failure_policy(), FailurePolicy::Isolate);
    assert_eq!(built["jobs"].failure_policy(), FailurePolicy::Propagate);

    built["ui"].post_task(|| async {}, 1);
    let sinks = sinks.into_inner();
    assert_eq!(sinks["ui"].events().len(), 1);
    assert!(sinks["jobs"].events().is_empty());
}

#[test]
fn test_build_schedulers_rejects_empty_set() {
    let cfg = SchedulerSetConfig {
        schedulers: HashMap::new(),
    };
    let result = build_schedulers(&cfg, |_, _| None);
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}
