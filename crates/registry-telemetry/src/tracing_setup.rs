//! `tracing-subscriber` setup.
//!
//! Installs one global subscriber: an `EnvFilter` plus either a pretty
//! `fmt` layer for development or a JSON layer for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by `init_tracing`. Logs once when dropped.
pub(crate) struct TracingGuard {
    service_name: String,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Tracing guard dropped");
    }
}

/// Build the filter: `RUST_LOG` wins, the configured level is the fallback.
pub(crate) fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global tracing subscriber.
///
/// Fails with [`TelemetryError::AlreadyInitialized`] if a global subscriber
/// is already set, e.g. by a second call.
pub(crate) fn init_tracing(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let env_filter = env_filter(config)?;

    let result = if !config.console_output {
        tracing_subscriber::registry().with(env_filter).try_init()
    } else if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(config.thread_ids)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(config.thread_ids)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Tracing initialized"
    );

    Ok(TracingGuard {
        service_name: config.service_name.clone(),
    })
}
