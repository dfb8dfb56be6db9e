//! # Event Registry - Type-Keyed Publish/Subscribe
//!
//! Components subscribe handlers for an event type, other components publish
//! values of that type, and every registered handler except the publisher's
//! own is invoked asynchronously.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Participant A│                    │ Participant B│
//! │              │  publish(Ping)     │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!        ↑               ▼                    ↑
//!        │         ┌──────────────┐           │
//!   Delivery ◄──── │EventRegistry │ ──────────┘
//!  (one signal     │              │  handler(Pending<Ping>)
//!   per handler)   └──────────────┘
//! ```
//!
//! ## Rules
//!
//! - **Self-exclusion:** a publisher never receives its own event
//! - **Isolation:** a failing or panicking handler only fails its own slot
//! - **No ordering:** handlers run concurrently on the tokio runtime
//! - **Strict unsubscribe:** removing a missing subscription is an error
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = EventRegistry::new();
//! let pinger = registry.participant();
//! let ponger = registry.participant();
//!
//! ponger.subscribe(|ping: Pending<Ping>| async move {
//!     let _ping = ping.await;
//!     Ok(())
//! }).await?;
//!
//! let delivery = pinger.publish(Ping.into_pending()).await?;
//! for outcome in delivery.wait_all().await {
//!     outcome?;
//! }
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod identity;
pub mod participant;
pub mod pending;
mod publisher;
pub mod registry;
pub mod signal;
mod stats;
mod subscriber;

// Re-export main types
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use events::{Event, EventType};
pub use handler::{EventHandler, HandlerError, HandlerResult};
pub use identity::SubscriberId;
pub use participant::Participant;
pub use pending::{IntoPending, Pending};
pub use registry::EventRegistry;
pub use signal::{Completion, Delivery, HandlerSignal};
pub use stats::StatsSnapshot;

/// Default initial capacity of the event-type map.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Default initial capacity of each subscriber map.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 16;
