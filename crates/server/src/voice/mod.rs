//! Voice input and output for chat sessions.
//!
//! Speech engines sit behind [`SpeechRecognizer`] and [`SpeechSynthesizer`];
//! [`VoiceInput`] and [`VoiceOutput`] hold the per-session state machines.
//! [`TranscriptionVoiceInput`] drives recognition through the server's
//! [`Transcriber`](crate::services::Transcriber) instead of a browser engine.

pub mod input;
pub mod output;
pub mod transcription;

use thiserror::Error;

pub use input::{
    InputOutcome, InputState, RECOGNITION_TIMEOUT, RecognitionErrorKind, RecognitionEvent,
    SpeechRecognizer, VoiceInput,
};
pub use output::{OutputState, SpeechSynthesizer, VoiceOutput};
pub use transcription::TranscriptionVoiceInput;

/// Errors surfaced by the voice adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Speech recognition not supported in this browser.")]
    RecognitionUnsupported,

    #[error("Speech synthesis not supported in this browser.")]
    SynthesisUnsupported,

    #[error("Failed to start speech recognition: {0}")]
    Start(String),

    #[error("Speech engine error: {0}")]
    Engine(String),
}
