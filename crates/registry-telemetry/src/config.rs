//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `info,event_registry=debug`
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include thread ids in each line
    pub thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "event-registry".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            thread_ids: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ER_SERVICE_NAME` or `OTEL_SERVICE_NAME`: Service name (default: event-registry)
    /// - `ER_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `ER_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `ER_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `ER_THREAD_IDS`: Include thread ids (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("ER_SERVICE_NAME")
                .or_else(|_| env::var("OTEL_SERVICE_NAME"))
                .unwrap_or_else(|_| "event-registry".to_string()),

            log_level: env::var("ER_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("ER_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("ER_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            thread_ids: env::var("ER_THREAD_IDS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Configuration for a named service, remaining fields from the environment.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
