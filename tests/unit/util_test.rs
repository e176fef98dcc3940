//! Tests for utility functions

use prometheus_priority_scheduler::util::{init_tracing, init_tracing_with, now_ms};

#[test]
fn test_now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing_with("debug");
    init_tracing();
}
