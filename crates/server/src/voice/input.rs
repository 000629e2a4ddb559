//! Speech recognition state machine.
//!
//! ```text
//! Idle --start--> Listening --(final | error | end | stop | timeout)--> Idle
//! ```
//!
//! Starting while listening is a no-op. Interim transcripts only replace the
//! live preview; a final transcript is appended to the input buffer and
//! stops recognition.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::VoiceError;

/// Recognition is forced back to idle when no terminal event arrives in time.
pub const RECOGNITION_TIMEOUT: Duration = Duration::from_secs(10);

/// A speech-to-text engine.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether this engine can run in the current environment.
    fn is_supported(&self) -> bool;

    /// Begin capturing speech.
    async fn start(&self) -> Result<(), VoiceError>;

    /// Stop capturing. Must be safe to call when already stopped.
    async fn stop(&self);
}

/// Events reported by a recognizer while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Interim(String),
    Final(String),
    /// Engine error code, e.g. `no-speech` or `not-allowed`.
    Error(String),
    /// The engine stopped on its own.
    End,
}

/// Classified recognition error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    Network,
    Aborted,
    Other(String),
}

impl RecognitionErrorKind {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            "aborted" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }

    /// Status text for the user; `None` clears it.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoSpeech => Some("No speech detected. Please try again.".to_string()),
            Self::AudioCapture => Some(
                "No microphone detected. Please check your microphone connection.".to_string(),
            ),
            Self::NotAllowed => Some(
                "Microphone access denied. Please enable microphone permissions.".to_string(),
            ),
            Self::Network => {
                Some("Network error. Please check your internet connection.".to_string())
            }
            Self::Aborted => None,
            Self::Other(code) => Some(format!("Recognition error: {code}. Please try again.")),
        }
    }

    /// Fatal errors are alerted; network drops and aborts reset silently.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Network | Self::Aborted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Listening,
}

/// How the last listening period ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Result(String),
    Error(RecognitionErrorKind),
    Stopped,
    TimedOut,
}

/// Per-session speech input.
pub struct VoiceInput<R> {
    recognizer: R,
    state: InputState,
    buffer: String,
    preview: Option<String>,
    status: Option<String>,
    outcome: Option<InputOutcome>,
    started_at: Option<Instant>,
    timeout: Duration,
}

impl<R: SpeechRecognizer> VoiceInput<R> {
    #[must_use]
    pub const fn new(recognizer: R) -> Self {
        Self::with_timeout(recognizer, RECOGNITION_TIMEOUT)
    }

    #[must_use]
    pub const fn with_timeout(recognizer: R, timeout: Duration) -> Self {
        Self {
            recognizer,
            state: InputState::Idle,
            buffer: String::new(),
            preview: None,
            status: None,
            outcome: None,
            started_at: None,
            timeout,
        }
    }

    #[must_use]
    pub const fn state(&self) -> InputState {
        self.state
    }

    /// Accumulated final transcripts.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Latest interim transcript.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Transient status text for the user.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&InputOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Take the buffered text, leaving it empty.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Start listening.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::RecognitionUnsupported` when the engine is not
    /// available and `VoiceError::Start` when it fails to start; the machine
    /// stays idle in both cases.
    pub async fn start(&mut self) -> Result<(), VoiceError> {
        if self.state == InputState::Listening {
            return Ok(());
        }

        if !self.recognizer.is_supported() {
            let err = VoiceError::RecognitionUnsupported;
            self.status = Some(err.to_string());
            return Err(err);
        }

        if let Err(e) = self.recognizer.start().await {
            self.status = Some(e.to_string());
            return Err(e);
        }

        self.state = InputState::Listening;
        self.preview = None;
        self.outcome = None;
        self.status = Some("Listening... Speak now".to_string());
        self.started_at = Some(Instant::now());
        debug!("Speech recognition started");
        Ok(())
    }

    /// Stop listening at the user's request.
    pub async fn stop(&mut self) {
        if self.state == InputState::Listening {
            self.finish(InputOutcome::Stopped).await;
            self.status = None;
        }
    }

    /// Apply a recognizer event. Events while idle are ignored.
    pub async fn handle(&mut self, event: RecognitionEvent) {
        if self.state != InputState::Listening {
            return;
        }

        match event {
            RecognitionEvent::Interim(text) => {
                self.preview = Some(text.trim().to_string());
            }
            RecognitionEvent::Final(text) => {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    if !self.buffer.is_empty() {
                        self.buffer.push(' ');
                    }
                    self.buffer.push_str(&text);
                }
                self.status = None;
                self.finish(InputOutcome::Result(text)).await;
            }
            RecognitionEvent::Error(code) => {
                let kind = RecognitionErrorKind::from_code(&code);
                if kind.is_fatal() {
                    warn!(code = %code, "Speech recognition error");
                } else {
                    debug!(code = %code, "Speech recognition interrupted");
                }
                self.status = kind.message();
                self.finish(InputOutcome::Error(kind)).await;
            }
            RecognitionEvent::End => {
                self.status = None;
                self.finish(InputOutcome::Stopped).await;
            }
        }
    }

    /// Force idle when the listening period has exceeded the timeout.
    /// Returns whether the timeout fired.
    pub async fn check_timeout(&mut self, now: Instant) -> bool {
        let expired = self.state == InputState::Listening
            && self
                .started_at
                .is_some_and(|started| now.duration_since(started) >= self.timeout);
        if expired {
            warn!("Speech recognition timed out");
            self.status = None;
            self.finish(InputOutcome::TimedOut).await;
        }
        expired
    }

    /// Consume events until the listening period ends, enforcing the timeout.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<RecognitionEvent>) -> Option<InputOutcome> {
        while self.state == InputState::Listening {
            let deadline = self.started_at.unwrap_or_else(Instant::now) + self.timeout;
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Some(event)) => self.handle(event).await,
                Ok(None) => self.handle(RecognitionEvent::End).await,
                Err(_) => {
                    self.check_timeout(Instant::now()).await;
                }
            }
        }
        self.outcome.clone()
    }

    async fn finish(&mut self, outcome: InputOutcome) {
        self.recognizer.stop().await;
        self.state = InputState::Idle;
        self.preview = None;
        self.started_at = None;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Recognizer that records start/stop calls.
    #[derive(Default)]
    struct FakeRecognizer {
        unsupported: bool,
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    #[async_trait]
    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        async fn start(&self) -> Result<(), VoiceError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_unsupported_stays_idle() {
        let mut input = VoiceInput::new(FakeRecognizer {
            unsupported: true,
            ..FakeRecognizer::default()
        });
        assert_eq!(input.start().await, Err(VoiceError::RecognitionUnsupported));
        assert_eq!(input.state(), InputState::Idle);
        assert_eq!(
            input.status(),
            Some("Speech recognition not supported in this browser.")
        );
    }

    #[tokio::test]
    async fn test_start_while_listening_is_noop() {
        let mut input = VoiceInput::new(FakeRecognizer::default());
        input.start().await.unwrap();
        input.start().await.unwrap();
        assert_eq!(input.state(), InputState::Listening);
        assert_eq!(input.recognizer().starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_interim_then_final() {
        let mut input = VoiceInput::new(FakeRecognizer::default());
        input.buffer.push_str("Show me");
        input.start().await.unwrap();

        input.handle(RecognitionEvent::Interim("sales for".to_string())).await;
        assert_eq!(input.preview(), Some("sales for"));
        assert_eq!(input.buffer(), "Show me");

        input
            .handle(RecognitionEvent::Final("sales for this month".to_string()))
            .await;
        assert_eq!(input.state(), InputState::Idle);
        assert_eq!(input.buffer(), "Show me sales for this month");
        assert_eq!(input.preview(), None);
        assert_eq!(input.recognizer().stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_messages() {
        let mut input = VoiceInput::new(FakeRecognizer::default());
        input.start().await.unwrap();
        input.handle(RecognitionEvent::Error("not-allowed".to_string())).await;
        assert_eq!(input.state(), InputState::Idle);
        assert_eq!(
            input.status(),
            Some("Microphone access denied. Please enable microphone permissions.")
        );

        input.start().await.unwrap();
        input.handle(RecognitionEvent::Error("aborted".to_string())).await;
        assert_eq!(input.status(), None);

        input.start().await.unwrap();
        input.handle(RecognitionEvent::Error("bad-grammar".to_string())).await;
        assert_eq!(
            input.status(),
            Some("Recognition error: bad-grammar. Please try again.")
        );
    }

    #[test]
    fn test_error_fatality() {
        assert!(!RecognitionErrorKind::from_code("network").is_fatal());
        assert!(!RecognitionErrorKind::from_code("aborted").is_fatal());
        assert!(RecognitionErrorKind::from_code("no-speech").is_fatal());
        assert!(RecognitionErrorKind::from_code("audio-capture").is_fatal());
    }

    #[tokio::test]
    async fn test_events_ignored_when_idle() {
        let mut input = VoiceInput::new(FakeRecognizer::default());
        input.handle(RecognitionEvent::Final("stray".to_string())).await;
        assert_eq!(input.buffer(), "");
        assert_eq!(input.outcome(), None);
    }

    #[tokio::test]
    async fn test_timeout_forces_idle() {
        let mut input =
            VoiceInput::with_timeout(FakeRecognizer::default(), Duration::from_millis(20));
        input.start().await.unwrap();

        let (_tx, mut rx) = mpsc::channel(4);
        let outcome = input.run(&mut rx).await;
        assert_eq!(outcome, Some(InputOutcome::TimedOut));
        assert_eq!(input.state(), InputState::Idle);
    }

    #[tokio::test]
    async fn test_run_until_final() {
        let mut input = VoiceInput::new(FakeRecognizer::default());
        input.start().await.unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tx.send(RecognitionEvent::Interim("check".to_string())).await.unwrap();
        tx.send(RecognitionEvent::Final("check inventory".to_string()))
            .await
            .unwrap();

        let outcome = input.run(&mut rx).await;
        assert_eq!(
            outcome,
            Some(InputOutcome::Result("check inventory".to_string()))
        );
        assert_eq!(input.take_buffer(), "check inventory");
        assert_eq!(input.buffer(), "");
    }
}
