//! # Event Handlers
//!
//! Handlers for every event type live in the same map, so they are stored
//! type-erased and downcast back to their concrete signature when a publish
//! of the matching type reaches them.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::panic_message;
use crate::events::{Event, EventType};
use crate::pending::Pending;

/// Error type handlers may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one handler run.
pub type HandlerResult = Result<(), HandlerError>;

pub(crate) type HandlerFuture = BoxFuture<'static, HandlerResult>;

type TypedHandler<E> = Arc<dyn Fn(Pending<E>) -> HandlerFuture + Send + Sync>;

/// Struct-based handler for events of type `E`.
///
/// Closures are accepted directly by `subscribe`; implement this trait when
/// the handler carries its own state.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync + 'static {
    /// Handle one published event.
    async fn handle(&self, event: Pending<E>) -> HandlerResult;
}

/// A registered handler with its concrete type erased.
#[derive(Clone)]
pub(crate) struct HandlerEntry {
    event_type: EventType,
    handler: Arc<dyn Any + Send + Sync>,
}

impl HandlerEntry {
    pub(crate) fn from_fn<E, F, Fut>(handler: F) -> Self
    where
        E: Event,
        F: Fn(Pending<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let typed: TypedHandler<E> = Arc::new(move |event| handler(event).boxed());
        Self {
            event_type: EventType::of::<E>(),
            handler: Arc::new(typed),
        }
    }

    pub(crate) fn from_handler<E, H>(handler: Arc<H>) -> Self
    where
        E: Event,
        H: EventHandler<E>,
    {
        Self::from_fn(move |event: Pending<E>| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(event).await }
        })
    }

    pub(crate) fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Call the handler and hand back the future it produced.
    ///
    /// A panic raised while calling it is caught and returned as the error
    /// message; it never unwinds into the publishing task.
    pub(crate) fn invoke<E: Event>(&self, event: Pending<E>) -> Result<HandlerFuture, String> {
        let Some(typed) = self.handler.downcast_ref::<TypedHandler<E>>() else {
            return Err(format!(
                "handler registered for {} cannot accept {}",
                self.event_type,
                EventType::of::<E>()
            ));
        };

        catch_unwind(AssertUnwindSafe(|| typed(event)))
            .map_err(|payload| panic_message(payload.as_ref()))
    }
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}
