//! Operation counters for a registry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated by the registry tasks.
#[derive(Debug, Default)]
pub(crate) struct RegistryStats {
    events_published: AtomicU64,
    handlers_dispatched: AtomicU64,
    slot_failures: AtomicU64,
    subscriptions: AtomicU64,
    unsubscriptions: AtomicU64,
}

impl RegistryStats {
    pub(crate) fn record_publish(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatch(&self) {
        self.handlers_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_slot_failure(&self) {
        self.slot_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_subscribe(&self) {
        self.subscriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unsubscribe(&self) {
        self.unsubscriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_published: self.events_published.load(Ordering::Relaxed),
            handlers_dispatched: self.handlers_dispatched.load(Ordering::Relaxed),
            slot_failures: self.slot_failures.load(Ordering::Relaxed),
            subscriptions: self.subscriptions.load(Ordering::Relaxed),
            unsubscriptions: self.unsubscriptions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Publish calls attempted, including ones that failed top-level checks.
    pub events_published: u64,
    /// Handlers whose future was spawned.
    pub handlers_dispatched: u64,
    /// Slots that failed before their handler could run.
    pub slot_failures: u64,
    /// Handlers successfully registered.
    pub subscriptions: u64,
    /// Handler collections removed.
    pub unsubscriptions: u64,
}
