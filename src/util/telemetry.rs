//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "prometheus_priority_scheduler=info";

/// Install an env-based subscriber if none is set. Users can install their own
/// subscriber instead; this is then a no-op.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Like [`init_tracing`], falling back to `default_filter` when `RUST_LOG` is
/// unset or invalid.
pub fn init_tracing_with(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
