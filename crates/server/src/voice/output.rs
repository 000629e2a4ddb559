//! Speech output state machine.
//!
//! Two states keyed by the id of the message being read aloud. A new
//! utterance cancels the current one; end and error events carrying a stale
//! id are ignored.

use tracing::{debug, warn};

use super::VoiceError;

/// A text-to-speech engine.
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Queue `text` for speaking, tagged with `utterance_id`.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Engine` if the engine rejects the utterance.
    fn speak(&self, utterance_id: &str, text: &str) -> Result<(), VoiceError>;

    /// Cancel whatever is being spoken.
    fn cancel(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputState {
    Idle,
    Speaking { message_id: String },
}

/// Per-session speech output.
pub struct VoiceOutput<S> {
    synthesizer: S,
    state: OutputState,
    auto_read: bool,
}

impl<S: SpeechSynthesizer> VoiceOutput<S> {
    #[must_use]
    pub const fn new(synthesizer: S, auto_read: bool) -> Self {
        Self {
            synthesizer,
            state: OutputState::Idle,
            auto_read,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &OutputState {
        &self.state
    }

    #[must_use]
    pub const fn auto_read(&self) -> bool {
        self.auto_read
    }

    pub const fn set_auto_read(&mut self, enabled: bool) {
        self.auto_read = enabled;
    }

    #[must_use]
    pub const fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Id of the message being spoken.
    #[must_use]
    pub fn speaking(&self) -> Option<&str> {
        match &self.state {
            OutputState::Speaking { message_id } => Some(message_id),
            OutputState::Idle => None,
        }
    }

    /// Speak a message, cancelling any current utterance.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::SynthesisUnsupported` when no engine is
    /// available, or the engine's error; the machine is idle afterwards.
    pub fn speak(&mut self, message_id: &str, text: &str) -> Result<(), VoiceError> {
        if !self.synthesizer.is_supported() {
            return Err(VoiceError::SynthesisUnsupported);
        }

        if self.state != OutputState::Idle {
            self.synthesizer.cancel();
            self.state = OutputState::Idle;
        }

        self.synthesizer.speak(message_id, text)?;
        debug!(message_id, "Speaking message");
        self.state = OutputState::Speaking {
            message_id: message_id.to_string(),
        };
        Ok(())
    }

    /// Speak the message, or stop if it is the one being spoken.
    ///
    /// # Errors
    ///
    /// See [`VoiceOutput::speak`].
    pub fn toggle(&mut self, message_id: &str, text: &str) -> Result<(), VoiceError> {
        if self.speaking() == Some(message_id) {
            self.stop();
            Ok(())
        } else {
            self.speak(message_id, text)
        }
    }

    pub fn stop(&mut self) {
        if self.state != OutputState::Idle {
            self.synthesizer.cancel();
            self.state = OutputState::Idle;
        }
    }

    /// The engine finished an utterance.
    pub fn on_end(&mut self, message_id: &str) {
        if self.speaking() == Some(message_id) {
            self.state = OutputState::Idle;
        }
    }

    /// The engine failed an utterance.
    pub fn on_error(&mut self, message_id: &str, error: &str) {
        if self.speaking() == Some(message_id) {
            warn!(message_id, error, "Speech synthesis error");
            self.state = OutputState::Idle;
        }
    }

    /// Read a new assistant message aloud when auto-read is on.
    ///
    /// # Errors
    ///
    /// See [`VoiceOutput::speak`].
    pub fn on_assistant_message(&mut self, message_id: &str, text: &str) -> Result<(), VoiceError> {
        if self.auto_read {
            self.speak(message_id, text)
        } else {
            Ok(())
        }
    }
}
