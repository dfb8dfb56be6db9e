//! # Registry Telemetry
//!
//! Logging setup shared by every binary built on `event-registry`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Your application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ER_SERVICE_NAME` | `event-registry` | Service name in the startup line |
//! | `ER_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `ER_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `ER_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global tracing subscriber already set: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging for the process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
