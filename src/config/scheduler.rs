//! Scheduler configuration structures.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable selecting the failure policy.
pub const ENV_FAILURE_POLICY: &str = "SCHEDULER_FAILURE_POLICY";
/// Environment variable for the initial queue capacity.
pub const ENV_INITIAL_CAPACITY: &str = "SCHEDULER_INITIAL_CAPACITY";
/// Environment variable for the event buffer size.
pub const ENV_EVENT_BUFFER: &str = "SCHEDULER_EVENT_BUFFER";

/// Upper bound on pre-allocated queue slots.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

const DEFAULT_INITIAL_CAPACITY: usize = 64;
const DEFAULT_EVENT_BUFFER: usize = 1024;

/// What a drain does when a task body fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the drain and return the failure from `run()`. Remaining tasks stay queued.
    #[default]
    Propagate,
    /// Log the failure, count it, and keep draining.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!("unknown failure policy `{other}`")),
        }
    }
}

/// Configuration for a single scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Behavior on task failure.
    pub failure_policy: FailurePolicy,
    /// Queue slots to pre-allocate.
    pub initial_capacity: usize,
    /// Events retained by in-memory sinks built from this config.
    pub event_buffer: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.event_buffer == 0 {
            return Err("event_buffer must be greater than 0".into());
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(format!(
                "initial_capacity must be at most {MAX_INITIAL_CAPACITY}"
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading `.env` first if present.
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a message if a variable is malformed or validation fails.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup using the `SCHEDULER_*` names.
    ///
    /// # Errors
    ///
    /// Returns a message if a value is malformed or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_FAILURE_POLICY) {
            cfg.failure_policy = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_INITIAL_CAPACITY) {
            cfg.initial_capacity = parse_usize(ENV_INITIAL_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_EVENT_BUFFER) {
            cfg.event_buffer = parse_usize(ENV_EVENT_BUFFER, &raw)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_usize(key: &str, raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("{key}: invalid value `{raw}`: {e}"))
}

/// Named, independent schedulers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSetConfig {
    /// Map of scheduler name to configuration.
    pub schedulers: HashMap<String, SchedulerConfig>,
}

impl SchedulerSetConfig {
    /// Validate every scheduler and ensure at least one exists.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid scheduler.
    pub fn validate(&self) -> Result<(), String> {
        if self.schedulers.is_empty() {
            return Err("at least one scheduler must be defined".into());
        }
        for (name, cfg) in &self.schedulers {
            cfg.validate()
                .map_err(|e| format!("scheduler `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
