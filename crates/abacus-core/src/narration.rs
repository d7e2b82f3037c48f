//! Spoken narration and the dialog surface.
//!
//! Narrating shows the text on the dialog surface and starts spoken
//! playback. Completion is reported as a [`Cue`] tagged with the
//! [`Ticket`] returned by the request. Every new request cancels the
//! playback (and any pending delay) started before it, so only the latest
//! request can ever report completion.

use crate::config::VoiceConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Identifies one narration or delay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Completion notice for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Spoken playback of the ticket's text finished.
    Spoken(Ticket),
    /// The ticket's delay elapsed.
    Elapsed(Ticket),
}

impl Cue {
    pub fn ticket(self) -> Ticket {
        match self {
            Cue::Spoken(ticket) | Cue::Elapsed(ticket) => ticket,
        }
    }
}

/// A piece of text to speak with its voice parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: &VoiceConfig) -> Self {
        Self {
            text: text.into(),
            locale: voice.locale.clone(),
            rate: voice.rate,
            pitch: voice.pitch,
        }
    }
}

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speaks `utterance`, resolving when playback ends.
    async fn speak(&self, utterance: Utterance);

    /// Drops everything queued or playing.
    fn cancel_all(&self);
}

/// Visual elements the tutorial shows and hides.
///
/// Implementations silently ignore elements they do not have.
pub trait Surface: Send + Sync {
    fn show_dialog(&self, text: &str);
    fn hide_dialog(&self);
    fn set_column_labels_visible(&self, visible: bool);
    fn set_quit_control_visible(&self, visible: bool);
}

/// Surface with no elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn show_dialog(&self, _text: &str) {}
    fn hide_dialog(&self) {}
    fn set_column_labels_visible(&self, _visible: bool) {}
    fn set_quit_control_visible(&self, _visible: bool) {}
}

/// What the tutorial needs from narration.
pub trait Narrator: Send {
    /// Shows and speaks `text`, cancelling whatever was in progress.
    fn narrate(&mut self, text: &str) -> Ticket;

    /// Reports [`Cue::Elapsed`] after `delay`, cancelling whatever was in progress.
    fn defer(&mut self, delay: Duration) -> Ticket;

    /// Cancels speech and any pending delay.
    fn cancel(&mut self);
}

/// Callback receiving completion cues.
pub type CueSink = Arc<dyn Fn(Cue) + Send + Sync>;

/// [`Narrator`] backed by a [`SpeechEngine`] and a [`Surface`].
///
/// Playback and delays run on spawned tasks, so this must be used from
/// within a tokio runtime.
pub struct SpeechNarrator {
    engine: Option<Arc<dyn SpeechEngine>>,
    surface: Arc<dyn Surface>,
    voice: VoiceConfig,
    cues: CueSink,
    current: CancellationToken,
    next_ticket: u64,
}

impl SpeechNarrator {
    /// Creates a narrator. Without an engine, completion is simulated after
    /// the configured fallback delay.
    pub fn new(
        engine: Option<Arc<dyn SpeechEngine>>,
        surface: Arc<dyn Surface>,
        voice: VoiceConfig,
        cues: CueSink,
    ) -> Self {
        Self {
            engine,
            surface,
            voice,
            cues,
            current: CancellationToken::new(),
            next_ticket: 0,
        }
    }

    fn issue(&mut self) -> (Ticket, CancellationToken) {
        self.current.cancel();
        self.current = CancellationToken::new();
        self.next_ticket += 1;
        (Ticket(self.next_ticket), self.current.clone())
    }
}

impl Narrator for SpeechNarrator {
    fn narrate(&mut self, text: &str) -> Ticket {
        let (ticket, token) = self.issue();
        if let Some(engine) = &self.engine {
            engine.cancel_all();
        }
        self.surface.show_dialog(text);
        debug!(ticket = ticket.id(), text, "Narrating");

        let utterance = Utterance::new(text, &self.voice);
        let engine = self.engine.clone();
        let fallback = self.voice.fallback_delay();
        let cues = Arc::clone(&self.cues);

        tokio::spawn(async move {
            let playback = async move {
                match engine {
                    Some(engine) => engine.speak(utterance).await,
                    None => {
                        warn!("Text-to-speech unavailable, simulating playback");
                        tokio::time::sleep(fallback).await;
                    }
                }
            };
            tokio::select! {
                () = token.cancelled() => {
                    debug!(ticket = ticket.id(), "Narration cancelled");
                }
                () = playback => cues(Cue::Spoken(ticket)),
            }
        });

        ticket
    }

    fn defer(&mut self, delay: Duration) -> Ticket {
        let (ticket, token) = self.issue();
        let cues = Arc::clone(&self.cues);

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => cues(Cue::Elapsed(ticket)),
            }
        });

        ticket
    }

    fn cancel(&mut self) {
        self.current.cancel();
        if let Some(engine) = &self.engine {
            engine.cancel_all();
        }
    }
}

impl Drop for SpeechNarrator {
    fn drop(&mut self) {
        self.current.cancel();
    }
}
