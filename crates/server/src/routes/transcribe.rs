//! Transcription endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::instrument;

use crate::error::AppError;
use crate::services::{AudioClip, Transcription, TranscriptionRequest};
use crate::state::AppState;

/// Largest accepted upload.
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// `POST /transcribe` - multipart with an `audio` file and/or `manualText`.
///
/// # Errors
///
/// Returns 400 when neither field is present and 415 for a non-multipart body.
#[instrument(skip_all)]
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Transcription>, AppError> {
    let mut multipart = multipart?;
    let mut request = TranscriptionRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?.to_vec();
                request.audio = Some(AudioClip {
                    file_name,
                    content_type,
                    data,
                });
            }
            "manualText" => request.manual_text = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(Json(state.transcriber().transcribe(request).await?))
}
