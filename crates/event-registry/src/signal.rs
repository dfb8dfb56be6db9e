//! # Completion Signals
//!
//! Every registry operation runs as its own tokio task and returns
//! immediately with a handle:
//!
//! ```text
//! subscribe()   ──► Completion<()>
//! unsubscribe() ──► Completion<()>
//! publish()     ──► Completion<Delivery>
//!                              │
//!                              └─► [HandlerSignal; one per handler]
//! ```
//!
//! Awaiting a handle is optional; dropping it does not cancel the work.
//!
//! A handler slot fails with `HandlerInvocationFailure` whether the handler
//! panicked while being called, returned an error, or panicked while running.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::join_all;
use tokio::task::{JoinError, JoinHandle};

use crate::error::{panic_message, RegistryError};
use crate::events::EventType;
use crate::handler::HandlerResult;
use crate::identity::SubscriberId;

/// Which operation a [`Completion`] belongs to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Operation {
    Subscribe {
        event_type: EventType,
        subscriber: SubscriberId,
    },
    Unsubscribe {
        event_type: EventType,
    },
    Publish {
        event_type: EventType,
    },
}

impl Operation {
    fn aborted(self, err: JoinError) -> RegistryError {
        let reason = join_error_reason(err);
        match self {
            Self::Subscribe {
                event_type,
                subscriber,
            } => RegistryError::RegistrationFailure {
                event_type,
                subscriber,
                reason,
            },
            Self::Unsubscribe { event_type } => RegistryError::TaskAborted {
                operation: "unsubscribe",
                event_type,
                reason,
            },
            Self::Publish { event_type } => RegistryError::TaskAborted {
                operation: "publish",
                event_type,
                reason,
            },
        }
    }
}

fn join_error_reason(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic().as_ref())
    } else {
        err.to_string()
    }
}

/// Eventual outcome of a subscribe, unsubscribe or publish.
#[must_use = "a Completion reports the outcome of the operation; await it or drop it explicitly"]
pub struct Completion<T> {
    handle: JoinHandle<Result<T, RegistryError>>,
    operation: Operation,
}

impl<T> Completion<T> {
    pub(crate) fn new(handle: JoinHandle<Result<T, RegistryError>>, operation: Operation) -> Self {
        Self { handle, operation }
    }

    /// True once the operation has finished, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, RegistryError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let operation = self.operation;
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) => Poll::Ready(Err(operation.aborted(err))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("operation", &self.operation)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

enum SlotState {
    Running(JoinHandle<HandlerResult>),
    Failed(RegistryError),
}

/// Outcome of one handler invocation within a [`Delivery`].
///
/// Resolves to `Ok(())` when the handler completed, or to the slot's error:
/// a pre-failed lookup/invocation, or the handler's own failure.
pub struct HandlerSignal {
    event_type: EventType,
    subscriber: SubscriberId,
    state: SlotState,
}

impl HandlerSignal {
    pub(crate) fn running(
        event_type: EventType,
        subscriber: SubscriberId,
        handle: JoinHandle<HandlerResult>,
    ) -> Self {
        Self {
            event_type,
            subscriber,
            state: SlotState::Running(handle),
        }
    }

    pub(crate) fn failed(subscriber: SubscriberId, error: RegistryError) -> Self {
        Self {
            event_type: error.event_type(),
            subscriber,
            state: SlotState::Failed(error),
        }
    }

    /// Subscriber whose handler this slot belongs to.
    #[must_use]
    pub fn subscriber(&self) -> SubscriberId {
        self.subscriber
    }

    /// Event type that was delivered.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The slot failed before the handler could run.
    #[must_use]
    pub fn failed_early(&self) -> Option<&RegistryError> {
        match &self.state {
            SlotState::Failed(err) => Some(err),
            SlotState::Running(_) => None,
        }
    }

    /// True once the outcome is available without waiting.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.state {
            SlotState::Running(handle) => handle.is_finished(),
            SlotState::Failed(_) => true,
        }
    }
}

impl Future for HandlerSignal {
    type Output = Result<(), RegistryError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let event_type = self.event_type;
        let subscriber = self.subscriber;
        let failed = |reason| RegistryError::HandlerInvocationFailure {
            event_type,
            subscriber,
            reason,
        };

        match &mut self.state {
            SlotState::Failed(err) => Poll::Ready(Err(err.clone())),
            SlotState::Running(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(Ok(()))) => Poll::Ready(Ok(())),
                Poll::Ready(Ok(Err(err))) => Poll::Ready(Err(failed(err.to_string()))),
                Poll::Ready(Err(err)) => Poll::Ready(Err(failed(join_error_reason(err)))),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

impl fmt::Debug for HandlerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSignal")
            .field("event_type", &self.event_type)
            .field("subscriber", &self.subscriber)
            .field("failed_early", &self.failed_early())
            .finish()
    }
}

/// Aggregate result of one publish.
///
/// Available once every eligible handler has been invoked and its signal
/// obtained. The handlers themselves may still be running.
#[derive(Debug)]
pub struct Delivery {
    event_type: EventType,
    signals: Vec<HandlerSignal>,
}

impl Delivery {
    pub(crate) fn new(event_type: EventType, signals: Vec<HandlerSignal>) -> Self {
        Self {
            event_type,
            signals,
        }
    }

    /// Event type that was published.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Number of handler slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// True if there are no handler slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Per-handler signals.
    #[must_use]
    pub fn signals(&self) -> &[HandlerSignal] {
        &self.signals
    }

    /// Take ownership of the per-handler signals.
    #[must_use]
    pub fn into_signals(self) -> Vec<HandlerSignal> {
        self.signals
    }

    /// Wait until every handler has finished and collect the outcomes in slot order.
    pub async fn wait_all(self) -> Vec<Result<(), RegistryError>> {
        join_all(self.signals).await
    }
}
