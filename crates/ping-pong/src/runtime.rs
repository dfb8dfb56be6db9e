//! # Ping-Pong Runtime
//!
//! ```text
//! ponger ──Ping{1}──► pinger ──Pong{1}──┬──► ponger ──Ping{2}──► ...
//!                                       └──► echo ("Again!")
//! ```
//!
//! The exchange stops once `ponger` has seen `rounds` pongs. The echo
//! participant leaves after the settle period, later pongs only reach
//! `ponger`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use event_registry::{
    Delivery, EventRegistry, HandlerResult, Participant, Pending, RegistryError, StatsSnapshot,
};
use registry_telemetry::{log_delivery, log_event};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PingPongConfig;
use crate::events::{Ping, Pong};

/// How many events each participant has handled.
#[derive(Debug, Default)]
pub struct Counters {
    pings: AtomicU32,
    pongs: AtomicU32,
    echoes: AtomicU32,
}

impl Counters {
    /// Pings handled by the pinger.
    pub fn pings(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }

    /// Pongs handled by the ponger.
    pub fn pongs(&self) -> u32 {
        self.pongs.load(Ordering::SeqCst)
    }

    /// Pongs handled by the echo participant.
    pub fn echoes(&self) -> u32 {
        self.echoes.load(Ordering::SeqCst)
    }
}

/// Three participants sharing one registry.
pub struct PingPongRuntime {
    registry: EventRegistry,
    pinger: Participant,
    ponger: Participant,
    echo: Participant,
    config: PingPongConfig,
    counters: Arc<Counters>,
    finished_tx: Arc<watch::Sender<bool>>,
    finished_rx: watch::Receiver<bool>,
}

impl PingPongRuntime {
    /// Create the registry and the participants. Nothing is subscribed yet.
    pub fn new(config: PingPongConfig) -> Self {
        let registry = EventRegistry::with_config(config.registry.clone());
        let (finished_tx, finished_rx) = watch::channel(false);

        Self {
            pinger: registry.participant(),
            ponger: registry.participant(),
            echo: registry.participant(),
            registry,
            config,
            counters: Arc::new(Counters::default()),
            finished_tx: Arc::new(finished_tx),
            finished_rx,
        }
    }

    /// Subscribe every participant, then serve the first `Ping`.
    pub async fn start(&self) -> Result<(), RegistryError> {
        info!(
            rounds = self.config.rounds,
            delay = ?self.config.delay,
            "Starting ping-pong"
        );

        self.subscribe_pinger().await?;
        self.subscribe_ponger().await?;
        self.subscribe_echo().await?;

        self.schedule_echo_exit();

        let delivery = self.ponger.publish_value(Ping { round: 1 }).await?;
        report_delivery("ponger", &delivery);
        Ok(())
    }

    /// Resolves once the round budget is spent.
    pub async fn finished(&self) {
        let mut rx = self.finished_rx.clone();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Remove all remaining subscriptions.
    pub async fn shutdown(&self) {
        info!("Shutting down ping-pong...");

        let results = [
            ("pinger", self.pinger.unsubscribe::<Ping>().await),
            ("ponger", self.ponger.unsubscribe::<Pong>().await),
            ("echo", self.echo.unsubscribe::<Pong>().await),
        ];

        for (name, result) in results {
            match result {
                Ok(()) => log_event!(debug, name, "Unsubscribed"),
                Err(RegistryError::SubscriptionNotFound { .. }) => {
                    log_event!(debug, name, "Already unsubscribed")
                }
                Err(e) => log_event!(warn, name, "Unsubscribe failed", error = %e),
            }
        }

        let stats = self.stats();
        info!(
            published = stats.events_published,
            dispatched = stats.handlers_dispatched,
            "Shutdown complete"
        );
    }

    /// The shared registry.
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Handled-event counters.
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }

    /// Registry operation counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.registry.stats()
    }

    async fn subscribe_pinger(&self) -> Result<(), RegistryError> {
        let me = self.pinger.clone();
        let counters = Arc::clone(&self.counters);
        let delay = self.config.delay;

        self.pinger
            .subscribe(move |ping: Pending<Ping>| {
                let me = me.clone();
                let counters = Arc::clone(&counters);
                async move { answer_ping(me, ping, &counters, delay).await }
            })
            .await
    }

    async fn subscribe_ponger(&self) -> Result<(), RegistryError> {
        let me = self.ponger.clone();
        let counters = Arc::clone(&self.counters);
        let finished = Arc::clone(&self.finished_tx);
        let delay = self.config.delay;
        let rounds = self.config.rounds;

        self.ponger
            .subscribe(move |pong: Pending<Pong>| {
                let me = me.clone();
                let counters = Arc::clone(&counters);
                let finished = Arc::clone(&finished);
                async move { answer_pong(me, pong, &counters, &finished, delay, rounds).await }
            })
            .await
    }

    async fn subscribe_echo(&self) -> Result<(), RegistryError> {
        let counters = Arc::clone(&self.counters);
        let delay = self.config.delay;

        self.echo
            .subscribe(move |pong: Pending<Pong>| {
                let counters = Arc::clone(&counters);
                async move {
                    let pong = pong.await;
                    counters.echoes.fetch_add(1, Ordering::SeqCst);
                    log_event!(info, "echo", "Again!", round = pong.round);
                    sleep(delay).await;
                    Ok(())
                }
            })
            .await
    }

    fn schedule_echo_exit(&self) {
        let echo = self.echo.clone();
        let settle = self.config.settle;

        tokio::spawn(async move {
            sleep(settle).await;
            match echo.unsubscribe::<Pong>().await {
                Ok(()) => log_event!(info, "echo", "Left the exchange"),
                Err(e) => log_event!(debug, "echo", "Leave skipped", error = %e),
            }
        });
    }
}

/// Log one line per handler slot; slots that failed before running are warnings.
pub(crate) fn report_delivery(participant: &str, delivery: &Delivery) -> usize {
    let mut failed = 0;
    for signal in delivery.signals() {
        match signal.failed_early() {
            Some(err) => {
                failed += 1;
                log_delivery!(
                    warn,
                    participant,
                    "Slot failed",
                    delivery.event_type(),
                    signal.subscriber(),
                    error = %err
                );
            }
            None => log_delivery!(
                debug,
                participant,
                "Handler started",
                delivery.event_type(),
                signal.subscriber()
            ),
        }
    }
    failed
}

async fn answer_ping(
    me: Participant,
    ping: Pending<Ping>,
    counters: &Counters,
    delay: Duration,
) -> HandlerResult {
    let ping = ping.await;
    counters.pings.fetch_add(1, Ordering::SeqCst);
    log_event!(info, "pinger", "Ping...", round = ping.round);

    sleep(delay).await;
    me.publish_value(Pong { round: ping.round }).await?;
    Ok(())
}

async fn answer_pong(
    me: Participant,
    pong: Pending<Pong>,
    counters: &Counters,
    finished: &watch::Sender<bool>,
    delay: Duration,
    rounds: u32,
) -> HandlerResult {
    let pong = pong.await;
    counters.pongs.fetch_add(1, Ordering::SeqCst);
    log_event!(info, "ponger", "Pong!", round = pong.round);

    sleep(delay).await;
    if pong.round >= rounds {
        log_event!(info, "ponger", "Round budget spent", rounds = rounds);
        finished.send_replace(true);
        return Ok(());
    }

    if let Err(e) = me.publish_value(Ping { round: pong.round + 1 }).await {
        warn!(error = %e, "Next ping not delivered");
        return Err(e.into());
    }
    Ok(())
}
