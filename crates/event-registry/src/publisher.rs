//! # Event Publisher
//!
//! Fan-out side of the registry.
//!
//! ```text
//! publish(publisher, event)
//!   │ spawn
//!   ▼
//! lookup group ──none──► EventTypeNotRegistered
//!   │
//! snapshot subscribers except publisher ──empty──► NoSubscribers
//!   │
//!   ├─► subscriber S1 ─┬─► handler ─► spawn ─► HandlerSignal
//!   │                  └─► handler ─► spawn ─► HandlerSignal
//!   ├─► subscriber S2 (gone) ───────────────► HandlerSignal(SubscriberLookupFailure)
//!   └─► subscriber S3 ───► handler panics ──► HandlerSignal(HandlerInvocationFailure)
//!   │
//!   ▼
//! Delivery { signals }
//! ```
//!
//! Slot failures never abort delivery to the remaining subscribers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::events::{Event, EventType};
use crate::handler::HandlerEntry;
use crate::identity::SubscriberId;
use crate::pending::Pending;
use crate::registry::{EventRegistry, RegistryInner};
use crate::signal::{Completion, Delivery, HandlerSignal, Operation};

impl EventRegistry {
    /// Deliver `event` to every handler of `E` not registered by `publisher`.
    ///
    /// The completion resolves to a [`Delivery`] once every eligible handler
    /// has been invoked and its signal obtained; the handlers themselves keep
    /// running independently. It fails only when nobody else can receive `E`:
    /// [`RegistryError::EventTypeNotRegistered`] or [`RegistryError::NoSubscribers`].
    pub fn publish<E: Event>(&self, publisher: SubscriberId, event: Pending<E>) -> Completion<Delivery> {
        let event_type = EventType::of::<E>();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.fan_out(publisher, event) });
        Completion::new(handle, Operation::Publish { event_type })
    }

    /// [`publish`](Self::publish) a plain value.
    pub fn publish_value<E: Event>(&self, publisher: SubscriberId, value: E) -> Completion<Delivery> {
        self.publish(publisher, Pending::ready(value))
    }
}

impl RegistryInner {
    fn fan_out<E: Event>(
        &self,
        publisher: SubscriberId,
        event: Pending<E>,
    ) -> Result<Delivery, RegistryError> {
        let event_type = EventType::of::<E>();
        self.stats.record_publish();

        let Some(group) = self.group(event_type) else {
            debug!(
                registry = %self.config.name,
                event_type = %event_type,
                publisher = %publisher,
                "Event type not registered"
            );
            return Err(RegistryError::EventTypeNotRegistered { event_type });
        };

        // Snapshot first so no shard lock is held while handlers are called.
        let subscribers: Vec<SubscriberId> = group
            .iter()
            .map(|entry| *entry.key())
            .filter(|subscriber| *subscriber != publisher)
            .collect();

        if subscribers.is_empty() {
            debug!(
                registry = %self.config.name,
                event_type = %event_type,
                publisher = %publisher,
                "No subscribers besides publisher"
            );
            return Err(RegistryError::NoSubscribers {
                event_type,
                publisher,
            });
        }

        let mut signals = Vec::with_capacity(subscribers.len());
        for subscriber in subscribers {
            let Some(handlers) = group.get(&subscriber).map(|h| h.value().clone()) else {
                warn!(
                    registry = %self.config.name,
                    event_type = %event_type,
                    subscriber = %subscriber,
                    "Subscriber vanished during fan-out"
                );
                self.stats.record_slot_failure();
                signals.push(HandlerSignal::failed(
                    subscriber,
                    RegistryError::SubscriberLookupFailure {
                        event_type,
                        subscriber,
                    },
                ));
                continue;
            };

            for handler in &handlers {
                signals.push(self.dispatch(subscriber, handler, event.clone()));
            }
        }

        debug!(
            registry = %self.config.name,
            event_type = %event_type,
            publisher = %publisher,
            handlers = signals.len(),
            "Event published"
        );
        Ok(Delivery::new(event_type, signals))
    }

    fn dispatch<E: Event>(
        &self,
        subscriber: SubscriberId,
        handler: &HandlerEntry,
        event: Pending<E>,
    ) -> HandlerSignal {
        let event_type = EventType::of::<E>();

        match handler.invoke(event) {
            Ok(fut) => {
                self.stats.record_dispatch();
                HandlerSignal::running(event_type, subscriber, tokio::spawn(fut))
            }
            Err(reason) => {
                warn!(
                    registry = %self.config.name,
                    event_type = %event_type,
                    subscriber = %subscriber,
                    reason = %reason,
                    "Handler failed on invocation"
                );
                self.stats.record_slot_failure();
                HandlerSignal::failed(
                    subscriber,
                    RegistryError::HandlerInvocationFailure {
                        event_type,
                        subscriber,
                        reason,
                    },
                )
            }
        }
    }
}
