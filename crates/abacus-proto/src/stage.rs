use serde::{Deserialize, Serialize};

/// Tutorial stage. The numeric form is what the runtime receives in
/// `TutorialStage:<n>` notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Tutorial not running.
    #[default]
    Inactive,
    /// Button discovery: only the unit roll is free.
    Discovery,
    /// Column comprehension over the fixed goal sequence.
    Columns,
    /// Free practice with random goals, until quit.
    Practice,
}

impl Stage {
    /// Returns the stage number (0 to 3).
    pub fn number(self) -> u8 {
        match self {
            Stage::Inactive => 0,
            Stage::Discovery => 1,
            Stage::Columns => 2,
            Stage::Practice => 3,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Read-only snapshot of the tutorial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TutorialStatus {
    pub active: bool,
    pub stage: Stage,
    pub step: u32,
    pub current_goal: Option<u16>,
    pub goals_completed: u32,
}
