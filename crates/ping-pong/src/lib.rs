//! # Ping-Pong
//!
//! Demonstration of `event-registry`: participants exchange `Ping` and
//! `Pong` events through one shared registry.
//!
//! ## Participants
//!
//! - `pinger` answers every `Ping` with a `Pong` of the same round
//! - `ponger` answers every `Pong` with the next `Ping` until the round budget is spent
//! - `echo` logs every `Pong` and leaves after the settle period
//!
//! The main entry point is the `main.rs` binary. The library exposes the
//! runtime so the exchange can be driven from tests.

#![warn(missing_docs)]

pub mod config;
pub mod events;
pub mod runtime;

pub use config::PingPongConfig;
pub use events::{Ping, Pong};
pub use runtime::{Counters, PingPongRuntime};
