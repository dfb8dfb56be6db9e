//! # Registry Errors
//!
//! Top-level failures (`EventTypeNotRegistered`, `NoSubscribers`) fail the
//! publish itself. Per-handler failures only ever appear inside a
//! [`HandlerSignal`](crate::HandlerSignal) slot of the delivery.

use thiserror::Error;

use crate::events::EventType;
use crate::identity::SubscriberId;

/// Errors from registry operations and handler slots.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Nobody has ever subscribed to this event type.
    #[error("Event type {event_type} is not registered")]
    EventTypeNotRegistered { event_type: EventType },

    /// The event type is known but every remaining subscriber is the publisher itself.
    #[error("No subscribers for {event_type} other than publisher {publisher}")]
    NoSubscribers {
        event_type: EventType,
        publisher: SubscriberId,
    },

    /// A subscriber disappeared between snapshot and handler lookup.
    #[error("Failed to get handlers of subscriber {subscriber} for {event_type}")]
    SubscriberLookupFailure {
        event_type: EventType,
        subscriber: SubscriberId,
    },

    /// The handler panicked when called, returned an error, or panicked
    /// while running. `reason` carries the error or panic message.
    #[error("Handler of subscriber {subscriber} for {event_type} failed on invocation: {reason}")]
    HandlerInvocationFailure {
        event_type: EventType,
        subscriber: SubscriberId,
        reason: String,
    },

    /// The subscription could not be stored.
    #[error("Failed to register subscriber {subscriber} for {event_type}: {reason}")]
    RegistrationFailure {
        event_type: EventType,
        subscriber: SubscriberId,
        reason: String,
    },

    /// Unsubscribe of a subscription that does not exist.
    #[error("Subscriber {subscriber} is not subscribed to {event_type}")]
    SubscriptionNotFound {
        event_type: EventType,
        subscriber: SubscriberId,
    },

    /// The tokio task backing an unsubscribe or publish was cancelled or
    /// panicked, e.g. because the runtime shut down. Registry logic never
    /// produces it; a failed subscribe task reports `RegistrationFailure`.
    #[error("Registry task for {operation} on {event_type} aborted: {reason}")]
    TaskAborted {
        operation: &'static str,
        event_type: EventType,
        reason: String,
    },
}

impl RegistryError {
    /// Event type the failure relates to.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::EventTypeNotRegistered { event_type }
            | Self::NoSubscribers { event_type, .. }
            | Self::SubscriberLookupFailure { event_type, .. }
            | Self::HandlerInvocationFailure { event_type, .. }
            | Self::RegistrationFailure { event_type, .. }
            | Self::SubscriptionNotFound { event_type, .. }
            | Self::TaskAborted { event_type, .. } => *event_type,
        }
    }

    /// True for failures confined to a single handler slot of a delivery.
    #[must_use]
    pub fn is_slot_failure(&self) -> bool {
        matches!(
            self,
            Self::SubscriberLookupFailure { .. }
                | Self::HandlerInvocationFailure { .. }
        )
    }
}

/// Render a panic payload the way `std` prints it.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
