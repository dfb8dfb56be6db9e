//! # Ping-Pong Demonstration
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`ER_*` / `RUST_LOG`)
//! 2. Load configuration (`PP_*`, `ER_*`)
//! 3. Subscribe the participants and serve the first `Ping`
//! 4. Run until the round budget is spent or Ctrl+C arrives
//! 5. Unsubscribe everything

use anyhow::{Context, Result};
use ping_pong::{PingPongConfig, PingPongRuntime};
use registry_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_service("ping-pong"))
        .context("Failed to initialize logging")?;

    let config = PingPongConfig::from_env();
    let runtime = PingPongRuntime::new(config);
    runtime
        .start()
        .await
        .context("Failed to start the exchange")?;

    info!("Exchange running. Press Ctrl+C to stop.");
    tokio::select! {
        () = runtime.finished() => {
            info!("Round budget spent");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Shutdown signal received");
        }
    }

    runtime.shutdown().await;

    let counters = runtime.counters();
    info!(
        pings = counters.pings(),
        pongs = counters.pongs(),
        echoes = counters.echoes(),
        "Exchange summary"
    );
    Ok(())
}
