//! Task that owns the tutorial machine.
//!
//! All inputs, including narration cues, go through one mailbox, so the
//! state is only ever touched from the service task.

use super::{TutorialInput, TutorialMachine};
use crate::bridge::RuntimeBridge;
use crate::config::AbacusConfig;
use crate::narration::{CueSink, NullSurface, SpeechEngine, SpeechNarrator, Surface};
use crate::router::TutorialControl;
use abacus_proto::{Stage, TutorialStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Builds and spawns the tutorial task.
pub struct TutorialService {
    config: AbacusConfig,
    bridge: RuntimeBridge,
    speech: Option<Arc<dyn SpeechEngine>>,
    surface: Arc<dyn Surface>,
}

impl TutorialService {
    pub fn new(config: AbacusConfig) -> Self {
        Self {
            config,
            bridge: RuntimeBridge::new(),
            speech: None,
            surface: Arc::new(NullSurface),
        }
    }

    #[must_use]
    pub fn with_bridge(mut self, bridge: RuntimeBridge) -> Self {
        self.bridge = bridge;
        self
    }

    #[must_use]
    pub fn with_speech(mut self, speech: Arc<dyn SpeechEngine>) -> Self {
        self.speech = Some(speech);
        self
    }

    #[must_use]
    pub fn with_surface(mut self, surface: Arc<dyn Surface>) -> Self {
        self.surface = surface;
        self
    }

    /// Spawns the task. It runs until every handle has been dropped.
    pub fn spawn(self) -> (TutorialHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let weak = tx.downgrade();
        let cues: CueSink = Arc::new(move |cue| {
            if let Some(tx) = weak.upgrade() {
                let _ = tx.send(TutorialInput::Cue(cue));
            }
        });

        let narrator = SpeechNarrator::new(
            self.speech,
            Arc::clone(&self.surface),
            self.config.voice.clone(),
            cues,
        );
        let mut machine =
            TutorialMachine::new(self.config.tutorial, self.bridge, self.surface, narrator);

        let (status_tx, status_rx) = watch::channel(machine.status());

        let task = tokio::spawn(async move {
            debug!("Tutorial task started");
            while let Some(input) = rx.recv().await {
                machine.handle(input);
                status_tx.send_replace(machine.status());
            }
            info!("Tutorial task stopped");
        });

        let handle = TutorialHandle {
            tx,
            active: Arc::new(AtomicBool::new(false)),
            status: status_rx,
        };
        (handle, task)
    }
}

/// Public entry points of a running tutorial.
///
/// Calls enqueue input for the tutorial task and return immediately.
#[derive(Clone)]
pub struct TutorialHandle {
    tx: mpsc::UnboundedSender<TutorialInput>,
    /// Mirrors start/quit in call order, ahead of the task.
    active: Arc<AtomicBool>,
    status: watch::Receiver<TutorialStatus>,
}

impl std::fmt::Debug for TutorialHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorialHandle")
            .field("active", &self.is_active())
            .field("status", &self.status())
            .finish()
    }
}

impl TutorialHandle {
    /// Enqueues `input`, failing if the task has stopped.
    pub fn send(&self, input: TutorialInput) -> abacus_proto::Result<()> {
        self.tx
            .send(input)
            .map_err(|_| abacus_proto::Error::MailboxClosed)
    }

    fn post(&self, input: TutorialInput) -> bool {
        match self.send(input) {
            Ok(()) => true,
            Err(e) => {
                warn!(?input, error = %e, "Tutorial input dropped");
                false
            }
        }
    }

    pub fn start(&self) {
        if self.post(TutorialInput::Start) {
            self.active.store(true, Ordering::SeqCst);
        }
    }

    pub fn quit(&self) {
        if self.post(TutorialInput::Quit) {
            self.active.store(false, Ordering::SeqCst);
        }
    }

    /// True between `start()` and `quit()`.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stage as of the last input the task handled.
    pub fn stage(&self) -> Stage {
        self.status.borrow().stage
    }

    /// Snapshot as of the last input the task handled.
    pub fn status(&self) -> TutorialStatus {
        *self.status.borrow()
    }

    /// Waits until the task publishes a status matching `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&TutorialStatus) -> bool,
    ) -> abacus_proto::Result<TutorialStatus> {
        let mut status = self.status.clone();
        let found = status
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| abacus_proto::Error::MailboxClosed)?;
        Ok(*found)
    }

    pub fn on_up_click(&self) {
        self.post(TutorialInput::UpClick);
    }

    pub fn on_down_click(&self) {
        self.post(TutorialInput::DownClick);
    }

    pub fn on_validate(&self, is_correct: bool) {
        self.post(TutorialInput::Validate { is_correct });
    }

    pub fn on_goal_completed(&self) {
        self.post(TutorialInput::GoalCompleted);
    }
}

impl TutorialControl for TutorialHandle {
    fn is_active(&self) -> bool {
        TutorialHandle::is_active(self)
    }

    fn on_up_click(&self) {
        TutorialHandle::on_up_click(self);
    }

    fn on_down_click(&self) {
        TutorialHandle::on_down_click(self);
    }

    fn on_goal_completed(&self) {
        TutorialHandle::on_goal_completed(self);
    }

    fn on_validate(&self, is_correct: bool) {
        TutorialHandle::on_validate(self, is_correct);
    }
}
