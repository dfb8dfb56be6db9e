//! # Pending Event Values
//!
//! Handlers receive the published value as a [`Pending`] handle rather than
//! a resolved value. The handle is shared: every handler of one publish gets
//! a clone and all of them observe the same `Arc<E>` once it resolves.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, Shared};
use futures::FutureExt;

use crate::events::{Event, EventType};

/// A cloneable, possibly not yet resolved event value.
pub struct Pending<E: Event> {
    inner: Shared<BoxFuture<'static, Arc<E>>>,
}

impl<E: Event> Pending<E> {
    /// Wrap a computation that will eventually produce the event.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = E> + Send + 'static,
    {
        Self {
            inner: fut.map(Arc::new).boxed().shared(),
        }
    }

    /// An already-resolved handle around `value`.
    pub fn ready(value: E) -> Self {
        let inner = future::ready(Arc::new(value)).boxed().shared();
        // Drive the shared state to completion so `peek` sees the value.
        let _ = inner.clone().now_or_never();
        Self { inner }
    }

    /// The value if it has already been produced.
    #[must_use]
    pub fn peek(&self) -> Option<Arc<E>> {
        self.inner.peek().cloned()
    }

    /// Routing key of the carried event.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        EventType::of::<E>()
    }
}

impl<E: Event> Clone for Pending<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: Event> Future for Pending<E> {
    type Output = Arc<E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl<E: Event> fmt::Debug for Pending<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("event_type", &self.event_type())
            .field("resolved", &self.inner.peek().is_some())
            .finish()
    }
}

/// Wrap a plain value into an already-resolved [`Pending`] handle.
///
/// ```rust,ignore
/// participant.publish(Ping.into_pending());
/// ```
pub trait IntoPending: Event + Sized {
    /// Consume the value and return a resolved handle.
    fn into_pending(self) -> Pending<Self> {
        Pending::ready(self)
    }
}

impl<T: Event> IntoPending for T {}
