//! Terminal stand-ins for the runtime, the page and the speech engine.

use abacus_core::{RuntimeSink, RuntimeTarget, SpeechEngine, Surface, Utterance};
use async_trait::async_trait;
use colored::Colorize;
use std::time::Duration;
use tracing::debug;

/// Prints every runtime command as the call the page would make.
pub struct StdoutRuntime {
    target: RuntimeTarget,
}

impl StdoutRuntime {
    pub fn new(target: RuntimeTarget) -> Self {
        Self { target }
    }
}

impl RuntimeSink for StdoutRuntime {
    fn send_message(&self, message: &str) {
        println!(
            "{} {}.{}({})",
            "runtime".cyan().bold(),
            self.target.game_object,
            self.target.method,
            message.yellow()
        );
    }
}

/// Prints dialog text and visibility changes.
#[derive(Default)]
pub struct ConsoleSurface;

impl Surface for ConsoleSurface {
    fn show_dialog(&self, text: &str) {
        println!("{} {}", "dialog".green().bold(), text);
    }

    fn hide_dialog(&self) {
        println!("{} (hidden)", "dialog".green().bold());
    }

    fn set_column_labels_visible(&self, visible: bool) {
        println!("{} column labels {}", "page".magenta().bold(), on_off(visible));
    }

    fn set_quit_control_visible(&self, visible: bool) {
        println!("{} quit button {}", "page".magenta().bold(), on_off(visible));
    }
}

fn on_off(visible: bool) -> &'static str {
    if visible { "shown" } else { "hidden" }
}

/// Pretends to speak, taking time proportional to the number of words.
pub struct SimulatedSpeech {
    per_word: Duration,
}

impl SimulatedSpeech {
    pub fn new(per_word: Duration) -> Self {
        Self { per_word }
    }

    fn duration_of(&self, text: &str) -> Duration {
        let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
        self.per_word.saturating_mul(words)
    }
}

#[async_trait]
impl SpeechEngine for SimulatedSpeech {
    async fn speak(&self, utterance: Utterance) {
        let duration = self.duration_of(&utterance.text);
        debug!(
            locale = %utterance.locale,
            rate = utterance.rate,
            ?duration,
            "Simulating speech"
        );
        tokio::time::sleep(duration).await;
    }

    fn cancel_all(&self) {
        debug!("Speech cancelled");
    }
}
