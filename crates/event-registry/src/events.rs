//! # Event Types
//!
//! Any `Send + Sync + 'static` value can travel through the registry. The
//! concrete Rust type is the routing key: handlers subscribed for `Ping`
//! only ever see `Ping` values.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Marker for values that can be published through the registry.
///
/// Implemented automatically for every `Send + Sync + 'static` type.
pub trait Event: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Event for T {}

/// Routing key for one category of events.
///
/// Equality and hashing use the [`TypeId`] only; the type name is kept
/// for log fields and error messages.
#[derive(Debug, Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// The key for event type `E`.
    #[must_use]
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Fully qualified Rust type name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `Ping` for `demo::Ping`.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        // Generic arguments may contain `::` themselves.
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
