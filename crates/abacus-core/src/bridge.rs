//! Outbound commands to the embedded runtime.
//!
//! The runtime exposes a single string entry point. Every command is
//! formatted here and dropped silently while no runtime is attached.

use crate::config::MAX_VALUE;
use abacus_proto::{Roll, Stage};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// The embedded runtime's message entry point.
pub trait RuntimeSink: Send + Sync {
    /// Delivers one formatted command string.
    fn send_message(&self, message: &str);
}

/// A command understood by the embedded runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCommand {
    /// Shows a value on the rolls; formatted as four zero-padded digits.
    SetValue(u16),
    /// Replaces the goal list. Passed through verbatim (`544/1352/9871`).
    ChangeList(String),
    /// Locks or unlocks one roll.
    Lock { roll: Roll, locked: bool },
    TutorialStart(Stage),
    TutorialQuit,
    TutorialStage(Stage),
    TutorialStep { stage: Stage, step: u32 },
}

impl std::fmt::Display for RuntimeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeCommand::SetValue(value) => write!(f, "SetValue{:04}", value),
            RuntimeCommand::ChangeList(list) => write!(f, "ChangeList{}", list),
            RuntimeCommand::Lock { roll, locked } => {
                write!(f, "Lock{}:{}", roll.wire_name(), u8::from(*locked))
            }
            RuntimeCommand::TutorialStart(stage) => write!(f, "TutorialStart:{}", stage),
            RuntimeCommand::TutorialQuit => f.write_str("TutorialQuit"),
            RuntimeCommand::TutorialStage(stage) => write!(f, "TutorialStage:{}", stage),
            RuntimeCommand::TutorialStep { stage, step } => {
                write!(f, "TutorialStep:{}:{}", stage, step)
            }
        }
    }
}

/// Formats and forwards commands to the runtime, if one is attached.
///
/// Cloning is cheap; clones share the attached runtime.
#[derive(Clone, Default)]
pub struct RuntimeBridge {
    sink: Arc<RwLock<Option<Arc<dyn RuntimeSink>>>>,
}

impl std::fmt::Debug for RuntimeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeBridge")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl RuntimeBridge {
    /// Creates a bridge with no runtime attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bridge already attached to `sink`.
    pub fn attached(sink: Arc<dyn RuntimeSink>) -> Self {
        let bridge = Self::new();
        bridge.attach(sink);
        bridge
    }

    /// Attaches the runtime once it has finished loading.
    pub fn attach(&self, sink: Arc<dyn RuntimeSink>) {
        *self.sink.write().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(sink);
        debug!("Runtime attached to bridge");
    }

    /// Detaches the runtime; later commands are dropped.
    pub fn detach(&self) {
        *self.sink.write().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        debug!("Runtime detached from bridge");
    }

    pub fn is_attached(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    /// Sends a command. Returns false if it was dropped for lack of a runtime.
    pub fn send(&self, command: &RuntimeCommand) -> bool {
        let sink = self
            .sink
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        match sink {
            Some(sink) => {
                let message = command.to_string();
                debug!(%message, "Sending command to runtime");
                sink.send_message(&message);
                true
            }
            None => {
                debug!(?command, "No runtime attached, dropping command");
                false
            }
        }
    }

    /// Shows `value` on the rolls. Values above 9999 are dropped.
    pub fn set_current_value(&self, value: u16) -> bool {
        if value > MAX_VALUE {
            warn!(value, "Value does not fit on the rolls, ignoring");
            return false;
        }
        self.send(&RuntimeCommand::SetValue(value))
    }

    /// Replaces the runtime's goal list.
    pub fn set_goal_list(&self, list: impl Into<String>) -> bool {
        self.send(&RuntimeCommand::ChangeList(list.into()))
    }

    pub fn lock_roll(&self, roll: Roll, locked: bool) -> bool {
        self.send(&RuntimeCommand::Lock { roll, locked })
    }

    pub fn lock_thousand_roll(&self, locked: bool) -> bool {
        self.lock_roll(Roll::Thousand, locked)
    }

    pub fn lock_hundred_roll(&self, locked: bool) -> bool {
        self.lock_roll(Roll::Hundred, locked)
    }

    pub fn lock_ten_roll(&self, locked: bool) -> bool {
        self.lock_roll(Roll::Ten, locked)
    }

    pub fn lock_unit_roll(&self, locked: bool) -> bool {
        self.lock_roll(Roll::Unit, locked)
    }

    /// Leaves only the unit roll free.
    pub fn lock_all_except_unit(&self) {
        for roll in Roll::ALL {
            self.lock_roll(roll, roll != Roll::Unit);
        }
    }

    pub fn unlock_all_rolls(&self) {
        for roll in Roll::ALL {
            self.lock_roll(roll, false);
        }
    }

    pub fn notify_tutorial_start(&self, stage: Stage) -> bool {
        self.send(&RuntimeCommand::TutorialStart(stage))
    }

    pub fn notify_tutorial_quit(&self) -> bool {
        self.send(&RuntimeCommand::TutorialQuit)
    }

    pub fn notify_stage_change(&self, stage: Stage) -> bool {
        self.send(&RuntimeCommand::TutorialStage(stage))
    }

    pub fn notify_step_change(&self, stage: Stage, step: u32) -> bool {
        self.send(&RuntimeCommand::TutorialStep { stage, step })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Runtime double that records every message it receives.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub(crate) fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.messages.lock().unwrap())
        }
    }

    impl RuntimeSink for RecordingSink {
        fn send_message(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn attached_bridge() -> (RuntimeBridge, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (RuntimeBridge::attached(sink.clone()), sink)
    }

    #[test]
    fn test_command_wire_format() {
        assert_eq!(RuntimeCommand::SetValue(322).to_string(), "SetValue0322");
        assert_eq!(RuntimeCommand::SetValue(0).to_string(), "SetValue0000");
        assert_eq!(RuntimeCommand::SetValue(9999).to_string(), "SetValue9999");
        assert_eq!(
            RuntimeCommand::ChangeList("544/1352/9871".into()).to_string(),
            "ChangeList544/1352/9871"
        );
        assert_eq!(
            RuntimeCommand::Lock { roll: Roll::Hundred, locked: true }.to_string(),
            "LockHundred:1"
        );
        assert_eq!(
            RuntimeCommand::Lock { roll: Roll::Unit, locked: false }.to_string(),
            "LockUnit:0"
        );
        assert_eq!(
            RuntimeCommand::TutorialStart(Stage::Discovery).to_string(),
            "TutorialStart:1"
        );
        assert_eq!(RuntimeCommand::TutorialQuit.to_string(), "TutorialQuit");
        assert_eq!(
            RuntimeCommand::TutorialStage(Stage::Practice).to_string(),
            "TutorialStage:3"
        );
        assert_eq!(
            RuntimeCommand::TutorialStep { stage: Stage::Discovery, step: 2 }.to_string(),
            "TutorialStep:1:2"
        );
    }

    #[test]
    fn test_detached_bridge_drops_silently() {
        let bridge = RuntimeBridge::new();
        assert!(!bridge.is_attached());
        assert!(!bridge.set_current_value(5));
        assert!(!bridge.notify_tutorial_quit());
        bridge.unlock_all_rolls();
    }

    #[test]
    fn test_attach_and_detach() {
        let bridge = RuntimeBridge::new();
        let sink = Arc::new(RecordingSink::default());

        bridge.set_current_value(1);
        bridge.attach(sink.clone());
        bridge.set_current_value(2);
        bridge.detach();
        bridge.set_current_value(3);

        assert_eq!(sink.take(), vec!["SetValue0002"]);
    }

    #[test]
    fn test_value_above_range_is_dropped() {
        let (bridge, sink) = attached_bridge();
        assert!(!bridge.set_current_value(10_000));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_lock_helpers() {
        let (bridge, sink) = attached_bridge();

        bridge.lock_all_except_unit();
        assert_eq!(
            sink.take(),
            vec!["LockThousand:1", "LockHundred:1", "LockTen:1", "LockUnit:0"]
        );

        bridge.unlock_all_rolls();
        assert_eq!(
            sink.take(),
            vec!["LockThousand:0", "LockHundred:0", "LockTen:0", "LockUnit:0"]
        );

        bridge.lock_ten_roll(true);
        bridge.lock_thousand_roll(false);
        assert_eq!(sink.take(), vec!["LockTen:1", "LockThousand:0"]);
    }

    #[test]
    fn test_lifecycle_notifications() {
        let (bridge, sink) = attached_bridge();

        bridge.notify_tutorial_start(Stage::Discovery);
        bridge.notify_stage_change(Stage::Columns);
        bridge.notify_step_change(Stage::Discovery, 3);
        bridge.notify_tutorial_quit();

        assert_eq!(
            sink.take(),
            vec![
                "TutorialStart:1",
                "TutorialStage:2",
                "TutorialStep:1:3",
                "TutorialQuit"
            ]
        );
    }
}
