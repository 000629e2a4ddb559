//! Recognition through a server-side [`Transcriber`].
//!
//! Audio is buffered between `start` and [`TranscriptionVoiceInput::finish`];
//! the transcript, or an error code, is delivered on the event channel a
//! [`VoiceInput`](super::VoiceInput) consumes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::warn;

use super::{RecognitionEvent, SpeechRecognizer, VoiceError};
use crate::services::{AudioClip, Transcriber, TranscriptionRequest};

/// Error code sent when the transcriber fails.
pub const TRANSCRIPTION_FAILED: &str = "transcription-failed";

pub struct TranscriptionVoiceInput {
    transcriber: Arc<dyn Transcriber>,
    events: mpsc::Sender<RecognitionEvent>,
    recording: Mutex<Vec<u8>>,
    active: AtomicBool,
}

impl TranscriptionVoiceInput {
    #[must_use]
    pub fn new(transcriber: Arc<dyn Transcriber>, events: mpsc::Sender<RecognitionEvent>) -> Self {
        Self {
            transcriber,
            events,
            recording: Mutex::new(Vec::new()),
            active: AtomicBool::new(false),
        }
    }

    /// Append recorded audio. Ignored unless recognition is running.
    pub async fn push_audio(&self, chunk: &[u8]) {
        if self.active.load(Ordering::SeqCst) {
            self.recording.lock().await.extend_from_slice(chunk);
        }
    }

    /// Transcribe what was recorded and report the result as an event.
    ///
    /// An empty recording reports `no-speech`.
    pub async fn finish(&self) {
        let data = std::mem::take(&mut *self.recording.lock().await);

        let event = if data.is_empty() {
            RecognitionEvent::Error("no-speech".to_string())
        } else {
            let request = TranscriptionRequest {
                audio: Some(AudioClip {
                    file_name: None,
                    content_type: None,
                    data,
                }),
                manual_text: None,
            };
            match self.transcriber.transcribe(request).await {
                Ok(transcription) => RecognitionEvent::Final(transcription.text),
                Err(e) => {
                    warn!(error = %e, "Transcription failed");
                    RecognitionEvent::Error(TRANSCRIPTION_FAILED.to_string())
                }
            }
        };

        if self.events.send(event).await.is_err() {
            warn!("Voice input closed before transcript was delivered");
        }
    }
}

#[async_trait]
impl SpeechRecognizer for TranscriptionVoiceInput {
    fn is_supported(&self) -> bool {
        true
    }

    async fn start(&self) -> Result<(), VoiceError> {
        self.recording.lock().await.clear();
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::StubTranscriber;
    use crate::voice::{InputOutcome, VoiceInput};

    #[tokio::test]
    async fn test_recorded_audio_becomes_final_transcript() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut input = VoiceInput::new(TranscriptionVoiceInput::new(Arc::new(StubTranscriber), tx));

        input.start().await.unwrap();
        input.recognizer().push_audio(&[1, 2, 3]).await;
        input.recognizer().finish().await;

        let outcome = input.run(&mut rx).await.unwrap();
        assert!(matches!(outcome, InputOutcome::Result(text) if text.starts_with("Audio received")));
        assert!(input.buffer().starts_with("Audio received successfully."));
    }

    #[tokio::test]
    async fn test_empty_recording_reports_no_speech() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut input = VoiceInput::new(TranscriptionVoiceInput::new(Arc::new(StubTranscriber), tx));

        input.start().await.unwrap();
        input.recognizer().finish().await;

        let outcome = input.run(&mut rx).await.unwrap();
        assert_eq!(
            outcome,
            InputOutcome::Error(crate::voice::RecognitionErrorKind::NoSpeech)
        );
        assert_eq!(input.status(), Some("No speech detected. Please try again."));
    }

    #[tokio::test]
    async fn test_audio_ignored_when_stopped() {
        let (tx, _rx) = mpsc::channel(4);
        let recognizer = TranscriptionVoiceInput::new(Arc::new(StubTranscriber), tx);
        recognizer.push_audio(&[1, 2, 3]).await;
        assert!(recognizer.recording.lock().await.is_empty());
    }
}
