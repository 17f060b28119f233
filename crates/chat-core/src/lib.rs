//! Travel chat core — session identity and turn orchestration.
//!
//! Platform adapters plug in through the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod identity;
pub mod controller;


pub use controller::{ChatSessionController, ChatSnapshot, Rejection, TurnOutcome};
pub use identity::SessionIdentity;
