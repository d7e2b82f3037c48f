//! The narrated three-stage tutorial.
//!
//! [`TutorialMachine`] holds the tutorial state and reacts to one
//! [`TutorialInput`] at a time. It never waits: when a narration has to
//! finish before the script continues, the machine records the
//! continuation against the narration's ticket and resumes when the
//! matching cue arrives. A cue for any other ticket is stale and ignored.
//!
//! [`TutorialService`] runs the machine on its own task and hands out
//! [`TutorialHandle`]s.

mod script;
mod service;
mod state;

pub use script::spell_digits;
pub use service::{TutorialHandle, TutorialService};
pub use state::TutorialState;

use crate::bridge::RuntimeBridge;
use crate::config::{MAX_VALUE, TutorialConfig};
use crate::narration::{Cue, Narrator, Surface, Ticket};
use abacus_proto::{Stage, TutorialStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the tutorial reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialInput {
    Start,
    Quit,
    UpClick,
    DownClick,
    Validate { is_correct: bool },
    GoalCompleted,
    /// A narration or delay finished.
    Cue(Cue),
}

/// What to do once the pending narration or delay completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    PromptUp,
    ExplainRule,
    SendColumnsGoal,
    EnterPractice,
    SendPracticeGoal,
    WaitForNextGoal,
    HideDialog,
}

/// Draws a free-practice goal in `1..=9999`.
pub fn random_goal<R: Rng>(rng: &mut R) -> u16 {
    rng.random_range(1..=MAX_VALUE)
}

/// The tutorial state machine.
pub struct TutorialMachine<N: Narrator> {
    config: TutorialConfig,
    bridge: RuntimeBridge,
    surface: Arc<dyn Surface>,
    narrator: N,
    rng: StdRng,
    state: TutorialState,
    pending: Option<(Ticket, Continuation)>,
}

impl<N: Narrator> TutorialMachine<N> {
    pub fn new(
        config: TutorialConfig,
        bridge: RuntimeBridge,
        surface: Arc<dyn Surface>,
        narrator: N,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            bridge,
            surface,
            narrator,
            rng,
            state: TutorialState::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> &TutorialState {
        &self.state
    }

    pub fn status(&self) -> TutorialStatus {
        self.state.status()
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    /// Handles one input.
    pub fn handle(&mut self, input: TutorialInput) {
        match input {
            TutorialInput::Start => self.start(),
            TutorialInput::Quit => self.quit(),
            TutorialInput::UpClick => self.on_up_click(),
            TutorialInput::DownClick => self.on_down_click(),
            TutorialInput::Validate { is_correct } => self.on_validate(is_correct),
            TutorialInput::GoalCompleted => self.on_goal_completed(),
            TutorialInput::Cue(cue) => self.on_cue(cue),
        }
    }

    /// Starts (or restarts) the tutorial at stage 1.
    pub fn start(&mut self) {
        info!("Tutorial started");
        self.state.active = true;
        self.surface.set_column_labels_visible(false);
        self.surface.set_quit_control_visible(false);
        self.bridge.notify_tutorial_start(Stage::Discovery);
        self.start_discovery();
    }

    /// Leaves the tutorial from whatever stage it is in.
    pub fn quit(&mut self) {
        info!(stage = %self.state.stage, "Tutorial quit");
        self.state.active = false;
        self.state.enter(Stage::Inactive);

        self.surface.hide_dialog();
        self.surface.set_column_labels_visible(false);
        self.surface.set_quit_control_visible(false);
        self.bridge.unlock_all_rolls();
        self.bridge.notify_tutorial_quit();

        self.narrator.cancel();
        self.pending = None;
        self.say(script::FAREWELL, Some(Continuation::HideDialog));
    }

    pub fn on_up_click(&mut self) {
        if !self.state.active || self.state.stage != Stage::Discovery {
            return;
        }
        self.state.up_clicks += 1;

        if self.state.up_clicks == 1 && self.state.step == 1 {
            self.say(script::STAGE1_KEEP_GOING, None);
        }
        if self.state.up_clicks >= self.config.up_clicks_required && self.state.step < 2 {
            self.set_step(2);
            self.say(script::STAGE1_PRESS_DOWN, None);
        }
    }

    pub fn on_down_click(&mut self) {
        if !self.state.active || self.state.stage != Stage::Discovery || self.state.step < 2 {
            return;
        }
        self.state.down_clicks += 1;

        if self.state.down_clicks >= self.config.down_clicks_required && self.state.step < 3 {
            self.set_step(3);
            self.say(script::STAGE1_DONE, None);
        }
    }

    pub fn on_validate(&mut self, is_correct: bool) {
        if !self.state.active {
            return;
        }
        match self.state.stage {
            Stage::Discovery => {
                if self.state.step >= 3 {
                    self.start_columns();
                }
            }
            Stage::Columns => {
                if is_correct {
                    self.columns_goal_reached();
                }
            }
            Stage::Practice => {
                if is_correct {
                    self.practice_goal_reached();
                }
            }
            Stage::Inactive => {}
        }
    }

    /// A completed goal counts as a correct validation.
    pub fn on_goal_completed(&mut self) {
        self.on_validate(true);
    }

    fn on_cue(&mut self, cue: Cue) {
        let continuation = match self.pending {
            Some((ticket, continuation)) if ticket == cue.ticket() => continuation,
            _ => {
                debug!(ticket = cue.ticket().id(), "Ignoring stale cue");
                return;
            }
        };
        self.pending = None;

        if !self.state.active && continuation != Continuation::HideDialog {
            return;
        }

        match continuation {
            Continuation::PromptUp => {
                self.set_step(1);
                self.say(script::STAGE1_PRESS_UP, None);
            }
            Continuation::ExplainRule => {
                self.say(script::STAGE2_RULE, Some(Continuation::SendColumnsGoal));
            }
            Continuation::SendColumnsGoal => self.send_columns_goal(),
            Continuation::EnterPractice => self.start_practice(),
            Continuation::SendPracticeGoal => self.send_practice_goal(),
            Continuation::WaitForNextGoal => {
                let ticket = self.narrator.defer(self.config.next_goal_delay());
                self.pending = Some((ticket, Continuation::SendPracticeGoal));
            }
            Continuation::HideDialog => self.surface.hide_dialog(),
        }
    }

    // ── Stage 1: button discovery ───────────────────────────────────────

    fn start_discovery(&mut self) {
        self.state.enter(Stage::Discovery);
        self.bridge.notify_stage_change(Stage::Discovery);
        self.bridge.lock_all_except_unit();
        self.bridge.set_current_value(0);
        self.say(script::STAGE1_INTRO, Some(Continuation::PromptUp));
    }

    // ── Stage 2: column comprehension ───────────────────────────────────

    fn start_columns(&mut self) {
        info!("Tutorial entering column stage");
        self.state.enter(Stage::Columns);
        self.bridge.notify_stage_change(Stage::Columns);
        self.bridge.unlock_all_rolls();
        self.bridge.set_current_value(0);
        self.surface.set_column_labels_visible(true);
        self.say(script::STAGE2_COLUMNS, Some(Continuation::ExplainRule));
    }

    fn send_columns_goal(&mut self) {
        let index = self.state.goals_completed as usize;
        let Some(&goal) = self.config.stage2_goals.get(index) else {
            self.finish_columns();
            return;
        };
        self.open_goal(goal);
        self.say(&script::stage2_goal(goal, index == 0), None);
    }

    fn columns_goal_reached(&mut self) {
        self.state.goals_completed += 1;
        debug!(completed = self.state.goals_completed, "Column goal reached");

        if (self.state.goals_completed as usize) < self.config.stage2_goals.len() {
            let praise = if self.state.goals_completed == 1 {
                script::STAGE2_FIRST_PRAISE
            } else {
                script::STAGE2_PRAISE
            };
            self.say(praise, Some(Continuation::SendColumnsGoal));
        } else {
            self.finish_columns();
        }
    }

    fn finish_columns(&mut self) {
        self.surface.set_column_labels_visible(false);
        self.say(script::STAGE2_DONE, Some(Continuation::EnterPractice));
    }

    // ── Stage 3: free practice ──────────────────────────────────────────

    fn start_practice(&mut self) {
        info!("Tutorial entering free practice");
        self.state.enter(Stage::Practice);
        self.bridge.notify_stage_change(Stage::Practice);
        self.surface.set_quit_control_visible(true);
        self.say(script::STAGE3_INTRO, Some(Continuation::SendPracticeGoal));
    }

    fn send_practice_goal(&mut self) {
        let goal = random_goal(&mut self.rng);
        self.open_goal(goal);
        self.say(&script::stage3_goal(goal), None);
    }

    fn practice_goal_reached(&mut self) {
        self.say(script::STAGE3_PRAISE, Some(Continuation::WaitForNextGoal));
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn open_goal(&mut self, goal: u16) {
        debug!(goal, stage = %self.state.stage, "Sending goal");
        self.state.current_goal = Some(goal);
        self.bridge.set_goal_list(goal.to_string());
        self.bridge.set_current_value(0);
    }

    fn set_step(&mut self, step: u32) {
        self.state.step = step;
        self.bridge.notify_step_change(self.state.stage, step);
    }

    /// Narrates `text`; `then` runs once this narration (and no later one) finishes.
    fn say(&mut self, text: &str, then: Option<Continuation>) {
        let ticket = self.narrator.narrate(text);
        self.pending = then.map(|continuation| (ticket, continuation));
    }
}
