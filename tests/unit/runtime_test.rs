//! Tests for runtime module

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use prometheus_priority_scheduler::config::FailurePolicy;
use prometheus_priority_scheduler::core::{RunState, Scheduler, SchedulerError};
use prometheus_priority_scheduler::runtime::{health, list_schedulers, snapshot, TokioSpawner};

#[test]
fn test_health() {
    assert!(health().ok);
}

#[test]
fn test_snapshot_reflects_scheduler() {
    let scheduler = Scheduler::new();
    scheduler.post_task(|| async {}, 1);
    scheduler.post_task(|| async {}, 2);

    let snap = snapshot("ui", &scheduler);
    assert_eq!(snap.name, "ui");
    assert_eq!(snap.id, scheduler.id());
    assert_eq!(snap.state, RunState::Idle);
    assert_eq!(snap.pending, 2);
    assert_eq!(snap.next_order, 2);
    assert_eq!(snap.failure_policy, FailurePolicy::Propagate);

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["state"], "idle");
}

#[test]
fn test_list_schedulers_sorted_by_name() {
    let mut schedulers = HashMap::new();
    schedulers.insert("zeta".to_string(), Scheduler::new());
    schedulers.insert("alpha".to_string(), Scheduler::new());

    let names: Vec<_> = list_schedulers(&schedulers)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn test_owned_runtime_spawner_drains() {
    let spawner = TokioSpawner::with_worker_threads(2).unwrap();
    let scheduler = Arc::new(Scheduler::new());
    let (tx, rx) = std::sync::mpsc::channel();

    scheduler.post_task(
        move || async move {
            tx.send("done").unwrap();
        },
        1,
    );
    scheduler.run_detached(&spawner);

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("done"));
}

#[test]
fn test_zero_worker_threads_is_backend_error() {
    let result = TokioSpawner::with_worker_threads(0);
    match result {
        Err(SchedulerError::Backend(msg)) => assert!(msg.contains("worker_threads")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected a backend error"),
    }
}

#[tokio::test]
async fn test_owned_runtime_dropped_inside_async_context() {
    let spawner = TokioSpawner::with_worker_threads(1).unwrap();
    let scheduler = Arc::new(Scheduler::new());
    let (tx, rx) = tokio::sync::oneshot::channel();

    scheduler.post_task(
        move || async move {
            let _ = tx.send(());
        },
        1,
    );
    scheduler.run_detached(&spawner);
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .unwrap()
        .unwrap();

    // Last clone goes away on a runtime worker; must not panic.
    let clone = spawner.clone();
    drop(spawner);
    tokio::spawn(async move { drop(clone) }).await.unwrap();
}
