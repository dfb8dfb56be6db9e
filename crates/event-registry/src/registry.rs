//! # Event Registry
//!
//! Two-level concurrent map from event type to subscriber to handlers:
//!
//! ```text
//! EventRegistry
//!   └─ DashMap<EventType, Arc<SubscriberGroup>>      (groups are never removed)
//!        └─ DashMap<SubscriberId, Vec<HandlerEntry>> (removed whole on unsubscribe)
//! ```
//!
//! Creation at both levels goes through `DashMap::entry`, so two callers
//! racing to create the same group or handler list both end up using the
//! single winner. Appends happen under the entry's shard lock and are
//! therefore never lost, nor can they land in a list that was just removed.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::RegistryConfig;
use crate::events::{Event, EventType};
use crate::handler::HandlerEntry;
use crate::identity::SubscriberId;
use crate::participant::Participant;
use crate::stats::{RegistryStats, StatsSnapshot};

pub(crate) type SubscriberGroup = DashMap<SubscriberId, Vec<HandlerEntry>>;

/// Shared publish/subscribe registry.
///
/// Cloning is cheap and every clone refers to the same registry. Construct
/// one at startup and hand clones (or [`Participant`]s) to every component.
/// All operations spawn onto the current tokio runtime and must be called
/// from within one.
#[derive(Clone)]
pub struct EventRegistry {
    pub(crate) inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    events: DashMap<EventType, Arc<SubscriberGroup>>,
    pub(crate) config: RegistryConfig,
    pub(crate) stats: RegistryStats,
}

impl EventRegistry {
    /// Create a registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                events: DashMap::with_capacity(config.event_capacity),
                stats: RegistryStats::default(),
                config,
            }),
        }
    }

    /// A new participant with a fresh identity bound to this registry.
    #[must_use]
    pub fn participant(&self) -> Participant {
        Participant::new(self.clone())
    }

    /// Configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Current operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// True once anyone has subscribed to `E`, even if they have since unsubscribed.
    #[must_use]
    pub fn is_registered<E: Event>(&self) -> bool {
        self.inner.events.contains_key(&EventType::of::<E>())
    }

    /// Number of subscribers currently holding handlers for `E`.
    #[must_use]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .group(EventType::of::<E>())
            .map_or(0, |group| group.len())
    }

    /// Number of handlers `subscriber` has registered for `E`.
    #[must_use]
    pub fn handler_count<E: Event>(&self, subscriber: SubscriberId) -> usize {
        self.inner
            .group(EventType::of::<E>())
            .and_then(|group| group.get(&subscriber).map(|handlers| handlers.len()))
            .unwrap_or(0)
    }

    /// Every event type that has ever been subscribed to.
    #[must_use]
    pub fn event_types(&self) -> Vec<EventType> {
        self.inner.events.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("name", &self.inner.config.name)
            .field("event_types", &self.inner.events.len())
            .finish()
    }
}

impl RegistryInner {
    /// The subscriber group for `event_type`, if one was ever created.
    pub(crate) fn group(&self, event_type: EventType) -> Option<Arc<SubscriberGroup>> {
        self.events
            .get(&event_type)
            .map(|group| Arc::clone(group.value()))
    }

    /// The subscriber group for `event_type`, creating it on first use.
    pub(crate) fn group_or_create(&self, event_type: EventType) -> Arc<SubscriberGroup> {
        let capacity = self.config.subscriber_capacity;
        let group = self
            .events
            .entry(event_type)
            .or_insert_with(|| Arc::new(DashMap::with_capacity(capacity)));
        Arc::clone(group.value())
    }
}
