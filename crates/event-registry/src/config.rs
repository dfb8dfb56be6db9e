//! Registry configuration from environment variables.

use std::env;

use crate::{DEFAULT_EVENT_CAPACITY, DEFAULT_SUBSCRIBER_CAPACITY};

/// Configuration for an [`EventRegistry`](crate::EventRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Name attached to every log line of this registry
    pub name: String,

    /// Initial capacity of the event-type map
    pub event_capacity: usize,

    /// Initial capacity of each per-event-type subscriber map
    pub subscriber_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "event-registry".to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            subscriber_capacity: DEFAULT_SUBSCRIBER_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ER_REGISTRY_NAME`: Registry name for logs (default: event-registry)
    /// - `ER_EVENT_CAPACITY`: Initial event-type capacity (default: 16)
    /// - `ER_SUBSCRIBER_CAPACITY`: Initial subscribers per event type (default: 16)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            name: env::var("ER_REGISTRY_NAME").unwrap_or(defaults.name),

            event_capacity: env::var("ER_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.event_capacity),

            subscriber_capacity: env::var("ER_SUBSCRIBER_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.subscriber_capacity),
        }
    }

    /// Same configuration under a different registry name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
