//! Routing of inbound runtime messages.
//!
//! The runtime sends plain strings of the form `Verb` or `Verb:payload`:
//! ```text
//! ButtonUp
//! ValueChanged:0042
//! SetGoal:123:456
//! ```
//! Verbs are normalized through an alias table, republished on the
//! [`EventBus`], and a handful are forwarded to the tutorial while it runs.

use abacus_proto::{EventBus, InboundMessage, MESSAGE_EVENT};
use std::sync::Arc;
use tracing::{debug, trace};

/// Canonical event for a press on the up button.
pub const UP_CLICK: &str = "upClick";
/// Canonical event for a press on the down button.
pub const DOWN_CLICK: &str = "downClick";
/// Canonical event sent when the learner reached the goal.
pub const GOAL_COMPLETED: &str = "goalCompleted";
/// Canonical event for the validate button.
pub const VALIDATE: &str = "validate";
pub const VALUE_CHANGED: &str = "valueChanged";
pub const ROLL_CHANGED: &str = "rollChanged";

/// Raw runtime verbs and the canonical event each one maps to.
const ALIASES: &[(&str, &str)] = &[
    ("UpClicked", UP_CLICK),
    ("ButtonUp", UP_CLICK),
    ("DownClicked", DOWN_CLICK),
    ("ButtonDown", DOWN_CLICK),
    ("GoalCompleted", GOAL_COMPLETED),
    ("Correct", GOAL_COMPLETED),
    ("Validated", VALIDATE),
    ("Validate", VALIDATE),
    ("ValueChanged", VALUE_CHANGED),
    ("RollChanged", ROLL_CHANGED),
];

/// Maps a raw verb to its canonical event name. Unknown verbs pass through.
pub fn normalize(verb: &str) -> &str {
    ALIASES
        .iter()
        .find(|(raw, _)| *raw == verb)
        .map_or(verb, |(_, canonical)| *canonical)
}

/// Splits a raw message on its first colon and normalizes the verb.
pub fn parse_message(raw: &str) -> InboundMessage {
    let (raw_type, payload) = match raw.split_once(':') {
        Some((verb, rest)) => (verb, Some(rest.to_string())),
        None => (raw, None),
    };
    InboundMessage::new(raw_type, normalize(raw_type), payload)
}

/// The tutorial entry points the router drives.
pub trait TutorialControl: Send + Sync {
    fn is_active(&self) -> bool;
    fn on_up_click(&self);
    fn on_down_click(&self);
    fn on_goal_completed(&self);
    fn on_validate(&self, is_correct: bool);
}

/// Turns raw runtime strings into bus events and tutorial input.
pub struct MessageRouter {
    bus: Arc<EventBus>,
    tutorial: Option<Arc<dyn TutorialControl>>,
}

impl MessageRouter {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            tutorial: None,
        }
    }

    /// Forwards tutorial events to `tutorial` while it is active.
    #[must_use]
    pub fn with_tutorial(mut self, tutorial: Arc<dyn TutorialControl>) -> Self {
        self.tutorial = Some(tutorial);
        self
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Routes one raw runtime message and returns its parsed form.
    pub fn route(&self, raw: &str) -> InboundMessage {
        debug!(raw, "Message received from runtime");

        self.bus.emit(MESSAGE_EVENT, Some(raw));

        let message = parse_message(raw);
        self.bus.emit(&message.event, message.payload());

        if let Some(tutorial) = &self.tutorial
            && tutorial.is_active()
        {
            Self::forward(tutorial.as_ref(), &message.event);
        }

        message
    }

    fn forward(tutorial: &dyn TutorialControl, event: &str) {
        match event {
            UP_CLICK => tutorial.on_up_click(),
            DOWN_CLICK => tutorial.on_down_click(),
            GOAL_COMPLETED => tutorial.on_goal_completed(),
            VALIDATE => tutorial.on_validate(true),
            _ => return,
        }
        trace!(event, "Forwarded to tutorial");
    }
}
