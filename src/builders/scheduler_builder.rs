//! Builders to construct schedulers from configuration.

use std::collections::HashMap;

use crate::config::{FailurePolicy, SchedulerConfig, SchedulerSetConfig};
use crate::core::{EventSink, Scheduler, SchedulerError, SharedEventSink};

/// Step-by-step construction of a [`Scheduler`].
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    sink: Option<Box<dyn EventSink>>,
}

impl SchedulerBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Set the number of pre-allocated queue slots.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Attach an event sink.
    #[must_use]
    pub fn event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let scheduler = Scheduler::with_config(&self.config)?;
        Ok(match self.sink {
            Some(sink) => scheduler.with_event_sink(sink),
            None => scheduler,
        })
    }

    /// Build with a fresh in-memory sink sized by `event_buffer`, returning a
    /// handle to read its events. Replaces any sink set earlier.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn build_with_events(mut self) -> Result<(Scheduler, SharedEventSink), SchedulerError> {
        let events = SharedEventSink::new(self.config.event_buffer);
        self.sink = Some(Box::new(events.clone()));
        Ok((self.build()?, events))
    }
}

/// Build independent, named schedulers from configuration.
///
/// `sink_factory` may return an event sink per scheduler.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfig`] if any scheduler configuration is invalid.
pub fn build_schedulers<FS>(
    cfg: &SchedulerSetConfig,
    mut sink_factory: FS,
) -> Result<HashMap<String, Scheduler>, SchedulerError>
where
    FS: FnMut(&str, &SchedulerConfig) -> Option<Box<dyn EventSink>>,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    let mut schedulers = HashMap::with_capacity(cfg.schedulers.len());
    for (name, scheduler_cfg) in &cfg.schedulers {
        let mut builder = SchedulerBuilder::new().config(scheduler_cfg.clone());
        if let Some(sink) = sink_factory(name, scheduler_cfg) {
            builder = builder.event_sink(sink);
        }
        tracing::debug!("building scheduler `{}`", name);
        schedulers.insert(name.clone(), builder.build()?);
    }

    Ok(schedulers)
}
