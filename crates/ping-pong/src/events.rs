//! The two event types bounced between participants.

/// Sent by whoever wants a `Pong` back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    /// Exchange number, starting at 1.
    pub round: u32,
}

/// Answer to a [`Ping`] of the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pong {
    /// Exchange number, copied from the `Ping`.
    pub round: u32,
}
