//! # abacus-core
//!
//! Page-side glue between the counting-machine runtime and the host page.
//!
//! This crate provides:
//! - The outbound [`RuntimeBridge`] that serializes commands for the runtime
//! - The inbound [`MessageRouter`] that parses runtime messages and fans them
//!   out on the event bus
//! - The narrated three-stage tutorial and the task that runs it
//! - Configuration loading and validation

mod bridge;
mod config;
pub mod narration;
pub mod router;
pub mod tutorial;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeSink};
pub use config::{
    AbacusConfig, ConfigError, MAX_VALUE, RuntimeTarget, TutorialConfig, VoiceConfig,
};
pub use narration::{
    Cue, CueSink, Narrator, NullSurface, SpeechEngine, SpeechNarrator, Surface, Ticket, Utterance,
};
pub use router::{MessageRouter, TutorialControl, normalize, parse_message};
pub use tutorial::{
    TutorialHandle, TutorialInput, TutorialMachine, TutorialService, TutorialState, random_goal,
    spell_digits,
};
