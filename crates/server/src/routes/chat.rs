//! Chat endpoint.
//!
//! JSON bodies go to the responder. Multipart bodies carry recorded audio
//! and get a fixed mock transcription. Anything else is 415.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::models::ChatRequest;
use crate::services::transcription::{CHAT_AUDIO_CONFIDENCE, CHAT_AUDIO_TRANSCRIPT};
use crate::services::Transcription;
use crate::state::AppState;

/// `POST /chat`
///
/// # Errors
///
/// Returns 415 for an unsupported content type, 400 for an invalid body and
/// 500 when the reply cannot be built.
#[instrument(skip_all)]
pub async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains("application/json") {
        let request: ChatRequest =
            serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let reply = state.chat().respond(request).await?;
        Ok(Json(reply).into_response())
    } else if content_type.contains("multipart/form-data") {
        Ok(Json(Transcription::text(CHAT_AUDIO_TRANSCRIPT, CHAT_AUDIO_CONFIDENCE)).into_response())
    } else {
        Err(AppError::UnsupportedMediaType)
    }
}
