//! # Participant
//!
//! Binds a [`SubscriberId`] to a registry so components can subscribe,
//! unsubscribe and publish without passing their identity around.

use std::future::Future;
use std::sync::Arc;

use crate::events::Event;
use crate::handler::{EventHandler, HandlerResult};
use crate::identity::SubscriberId;
use crate::pending::Pending;
use crate::registry::EventRegistry;
use crate::signal::{Completion, Delivery};

/// A component's handle on the registry.
///
/// Clones share the identity, so a handler can capture a clone and publish
/// follow-up events as the same participant.
#[derive(Clone, Debug)]
pub struct Participant {
    id: SubscriberId,
    registry: EventRegistry,
}

impl Participant {
    /// A participant with a fresh identity.
    #[must_use]
    pub fn new(registry: EventRegistry) -> Self {
        Self::with_id(registry, SubscriberId::new())
    }

    /// A participant acting under an existing identity.
    #[must_use]
    pub fn with_id(registry: EventRegistry, id: SubscriberId) -> Self {
        Self { id, registry }
    }

    /// This participant's identity.
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// The registry this participant talks to.
    #[must_use]
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// See [`EventRegistry::subscribe`].
    pub fn subscribe<E, F, Fut>(&self, handler: F) -> Completion<()>
    where
        E: Event,
        F: Fn(Pending<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.subscribe(self.id, handler)
    }

    /// See [`EventRegistry::subscribe_handler`].
    pub fn subscribe_handler<E, H>(&self, handler: Arc<H>) -> Completion<()>
    where
        E: Event,
        H: EventHandler<E>,
    {
        self.registry.subscribe_handler(self.id, handler)
    }

    /// See [`EventRegistry::unsubscribe`].
    pub fn unsubscribe<E: Event>(&self) -> Completion<()> {
        self.registry.unsubscribe::<E>(self.id)
    }

    /// See [`EventRegistry::publish`].
    pub fn publish<E: Event>(&self, event: Pending<E>) -> Completion<Delivery> {
        self.registry.publish(self.id, event)
    }

    /// See [`EventRegistry::publish_value`].
    pub fn publish_value<E: Event>(&self, value: E) -> Completion<Delivery> {
        self.registry.publish_value(self.id, value)
    }
}
