//! Speech-to-text behind a [`Transcriber`] seam.
//!
//! [`StubTranscriber`] does no speech processing: it echoes a supplied
//! manual transcript or acknowledges the upload with fixed text.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Confidence reported for manual or acknowledged transcripts.
pub const STUB_CONFIDENCE: f64 = 0.99;

/// Text returned for audio posted directly to the chat endpoint.
pub const CHAT_AUDIO_TRANSCRIPT: &str = "Show me the current inventory levels";

/// Confidence returned with [`CHAT_AUDIO_TRANSCRIPT`].
pub const CHAT_AUDIO_CONFIDENCE: f64 = 0.92;

const AUDIO_RECEIVED_TEXT: &str = "Audio received successfully. Please use the text input while we work on implementing a production-ready transcription service.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("No audio file found in request")]
    NoAudio,

    #[error("Failed to process audio")]
    Backend(String),
}

/// An uploaded audio file.
#[derive(Debug, Clone, Default)]
pub struct AudioClip {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Parsed body of a transcription request.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionRequest {
    pub audio: Option<AudioClip>,
    pub manual_text: Option<String>,
}

/// Transcription result as returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub text: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_audio_size: Option<usize>,
}

impl Transcription {
    #[must_use]
    pub fn text(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
            received: None,
            original_audio_size: None,
        }
    }
}

/// Speech-to-text capability.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a request; a non-empty manual transcript takes precedence
    /// over audio.
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError>;
}

/// Placeholder transcriber used until a speech service is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, TranscriptionError> {
        if let Some(text) = request.manual_text.filter(|t| !t.is_empty()) {
            return Ok(Transcription::text(text, STUB_CONFIDENCE));
        }

        let audio = request.audio.ok_or(TranscriptionError::NoAudio)?;
        info!(
            file_name = audio.file_name.as_deref().unwrap_or("unknown"),
            content_type = audio.content_type.as_deref().unwrap_or("unknown"),
            size = audio.data.len(),
            "Received audio file"
        );

        Ok(Transcription {
            text: AUDIO_RECEIVED_TEXT.to_string(),
            confidence: STUB_CONFIDENCE,
            received: Some(true),
            original_audio_size: Some(audio.data.len()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn clip(len: usize) -> AudioClip {
        AudioClip {
            file_name: Some("recording.webm".to_string()),
            content_type: Some("audio/webm".to_string()),
            data: vec![0; len],
        }
    }

    #[tokio::test]
    async fn test_manual_text_wins() {
        let result = StubTranscriber
            .transcribe(TranscriptionRequest {
                audio: Some(clip(10)),
                manual_text: Some("Show inventory levels".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(result, Transcription::text("Show inventory levels", 0.99));
    }

    #[tokio::test]
    async fn test_missing_audio() {
        let err = StubTranscriber
            .transcribe(TranscriptionRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, TranscriptionError::NoAudio);
        assert_eq!(err.to_string(), "No audio file found in request");
    }

    #[tokio::test]
    async fn test_audio_acknowledged() {
        let result = StubTranscriber
            .transcribe(TranscriptionRequest {
                audio: Some(clip(2048)),
                manual_text: None,
            })
            .await
            .unwrap();
        assert_eq!(result.original_audio_size, Some(2048));
        assert_eq!(result.received, Some(true));
        assert!(result.text.starts_with("Audio received successfully."));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["originalAudioSize"], 2048);
    }
}
