use abacus_proto::{Stage, TutorialStatus};

/// Mutable tutorial record. Only the machine's handlers touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialState {
    pub active: bool,
    pub stage: Stage,
    /// Stage-local step.
    pub step: u32,
    pub up_clicks: u32,
    pub down_clicks: u32,
    /// Last goal sent to the runtime. Kept across stage changes and quit.
    pub current_goal: Option<u16>,
    pub goals_completed: u32,
}

impl TutorialState {
    /// Clears the stage-local counters when entering `stage`.
    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.step = 0;
        match stage {
            Stage::Discovery => {
                self.up_clicks = 0;
                self.down_clicks = 0;
            }
            Stage::Columns => self.goals_completed = 0,
            Stage::Inactive | Stage::Practice => {}
        }
    }

    pub fn status(&self) -> TutorialStatus {
        TutorialStatus {
            active: self.active,
            stage: self.stage,
            step: self.step,
            current_goal: self.current_goal,
            goals_completed: self.goals_completed,
        }
    }
}
