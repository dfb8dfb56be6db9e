//! # Subscribe / Unsubscribe
//!
//! Registration side of the registry. Both operations run on their own
//! task and report through a [`Completion`].

use std::future::Future;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::error::RegistryError;
use crate::events::{Event, EventType};
use crate::handler::{EventHandler, HandlerEntry, HandlerResult};
use crate::identity::SubscriberId;
use crate::pending::Pending;
use crate::registry::{EventRegistry, RegistryInner};
use crate::signal::{Completion, Operation};

impl EventRegistry {
    /// Register `handler` for events of type `E` under `subscriber`.
    ///
    /// A subscriber may register any number of handlers for the same type;
    /// all of them are kept and all of them run on every publish. The
    /// completion resolves once the handler is visible to later publishes.
    pub fn subscribe<E, F, Fut>(&self, subscriber: SubscriberId, handler: F) -> Completion<()>
    where
        E: Event,
        F: Fn(Pending<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.spawn_subscription(subscriber, HandlerEntry::from_fn(handler))
    }

    /// Register a struct-based [`EventHandler`] for events of type `E`.
    pub fn subscribe_handler<E, H>(&self, subscriber: SubscriberId, handler: Arc<H>) -> Completion<()>
    where
        E: Event,
        H: EventHandler<E>,
    {
        self.spawn_subscription(subscriber, HandlerEntry::from_handler(handler))
    }

    /// Remove every handler `subscriber` registered for `E`.
    ///
    /// Fails with [`RegistryError::SubscriptionNotFound`] if there is nothing
    /// to remove, including a second unsubscribe of the same pair.
    pub fn unsubscribe<E: Event>(&self, subscriber: SubscriberId) -> Completion<()> {
        let event_type = EventType::of::<E>();
        let inner = Arc::clone(&self.inner);
        let handle =
            tokio::spawn(async move { inner.remove_subscription(event_type, subscriber) });
        Completion::new(handle, Operation::Unsubscribe { event_type })
    }

    fn spawn_subscription(&self, subscriber: SubscriberId, entry: HandlerEntry) -> Completion<()> {
        let event_type = entry.event_type();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.add_subscription(subscriber, entry) });
        Completion::new(
            handle,
            Operation::Subscribe {
                event_type,
                subscriber,
            },
        )
    }
}

impl RegistryInner {
    fn add_subscription(
        &self,
        subscriber: SubscriberId,
        entry: HandlerEntry,
    ) -> Result<(), RegistryError> {
        let event_type = entry.event_type();
        let group = self.group_or_create(event_type);

        // The shard lock is held until the push completes.
        let handlers = match group.entry(subscriber) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().push(entry);
                occupied.get().len()
            }
            Entry::Vacant(vacant) => {
                vacant.insert(vec![entry]);
                1
            }
        };

        self.stats.record_subscribe();
        debug!(
            registry = %self.config.name,
            event_type = %event_type,
            subscriber = %subscriber,
            handlers,
            "Handler subscribed"
        );
        Ok(())
    }

    fn remove_subscription(
        &self,
        event_type: EventType,
        subscriber: SubscriberId,
    ) -> Result<(), RegistryError> {
        let not_found = || RegistryError::SubscriptionNotFound {
            event_type,
            subscriber,
        };

        let group = self.group(event_type).ok_or_else(not_found)?;
        let (_, handlers) = group.remove(&subscriber).ok_or_else(not_found)?;

        self.stats.record_unsubscribe();
        debug!(
            registry = %self.config.name,
            event_type = %event_type,
            subscriber = %subscriber,
            handlers = handlers.len(),
            "Subscriber removed"
        );
        Ok(())
    }
}
