//! # Subscriber Identity
//!
//! Every participant that subscribes or publishes carries a [`SubscriberId`].
//! Handlers are grouped under it and a publisher never receives its own event.

use std::fmt;
use uuid::Uuid;

/// Opaque identity of a subscriber or publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Generate a fresh random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one assigned by the host application.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<Uuid> for SubscriberId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}
