//! # abacus-proto
//!
//! Shared types, error definitions, and the event bus for the Abacus
//! counting-machine bridge.
//!
//! This crate provides the foundational abstractions used across all Abacus
//! crates, including:
//! - The [`EventBus`] for pub/sub messaging between page scripts
//! - Inbound message and roll types
//! - Tutorial stage and status snapshots
//! - Common error types

mod error;
mod event;
pub mod event_bus;
mod roll;
mod stage;

pub use error::{Error, Result};
pub use event::InboundMessage;
pub use event_bus::{EventBus, Listener, MESSAGE_EVENT, listener};
pub use roll::Roll;
pub use stage::{Stage, TutorialStatus};
