//! Demonstration settings from environment variables.

use std::env;
use std::time::Duration;

use event_registry::RegistryConfig;

/// Configuration for a ping-pong run.
#[derive(Debug, Clone)]
pub struct PingPongConfig {
    /// Number of Ping/Pong exchanges before the run finishes
    pub rounds: u32,

    /// Pause inside every handler before it answers
    pub delay: Duration,

    /// Time after start at which the echo participant leaves
    pub settle: Duration,

    /// Registry settings
    pub registry: RegistryConfig,
}

impl Default for PingPongConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            delay: Duration::from_millis(500),
            settle: Duration::from_millis(5000),
            registry: RegistryConfig::default().named("ping-pong"),
        }
    }
}

impl PingPongConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PP_ROUNDS`: Exchanges before exit (default: 3)
    /// - `PP_DELAY_MS`: Handler pause in milliseconds (default: 500)
    /// - `PP_SETTLE_MS`: Delay before the echo participant unsubscribes (default: 5000)
    /// - `ER_*`: Registry settings, see [`RegistryConfig::from_env`]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut registry = RegistryConfig::from_env();
        if env::var("ER_REGISTRY_NAME").is_err() {
            registry.name = defaults.registry.name.clone();
        }

        Self {
            rounds: env::var("PP_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rounds),

            delay: env::var("PP_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.delay, Duration::from_millis),

            settle: env::var("PP_SETTLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.settle, Duration::from_millis),

            registry,
        }
    }
}
