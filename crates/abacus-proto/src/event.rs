//! Inbound message types.

use serde::{Deserialize, Serialize};

/// A raw runtime message split into its event type and payload.
///
/// Runtime messages take the form `Type` or `Type:payload`, where the
/// payload is everything after the first colon (further colons are kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// The verb exactly as the runtime sent it (before normalization).
    pub raw_type: String,

    /// The canonical event name published on the bus.
    pub event: String,

    /// Everything after the first colon, if any.
    pub payload: Option<String>,
}

impl InboundMessage {
    /// Creates a message with an explicit canonical name.
    pub fn new(
        raw_type: impl Into<String>,
        event: impl Into<String>,
        payload: Option<String>,
    ) -> Self {
        Self {
            raw_type: raw_type.into(),
            event: event.into(),
            payload,
        }
    }

    /// Returns the payload as a string slice.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Returns true if the verb was rewritten by the alias table.
    pub fn is_aliased(&self) -> bool {
        self.raw_type != self.event
    }
}

impl std::fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{} ({})", self.event, payload),
            None => write!(f, "{}", self.event),
        }
    }
}
