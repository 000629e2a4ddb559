//! FAQ route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

use erp_assistant_core::FaqId;

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireApiToken;
use crate::models::{CreateFaqRequest, Faq};
use crate::services::FaqError;
use crate::state::AppState;

/// `GET /faqs`
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Faq>>, AppError> {
    Ok(Json(state.faqs().list().await?))
}

/// `POST /faqs`
///
/// # Errors
///
/// Returns 400 for a missing question, answer or department.
#[instrument(skip(state, request))]
pub async fn create(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFaqRequest>,
) -> Result<(StatusCode, Json<Faq>), AppError> {
    let faq = state.faqs().create(request).await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

/// `DELETE /faqs/{id}`
///
/// # Errors
///
/// Returns 404 when no FAQ has the id, including ids that are not numbers.
#[instrument(skip(state))]
pub async fn delete(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = id
        .parse::<i32>()
        .map(FaqId::new)
        .map_err(|_| FaqError::NotFound)?;
    state.faqs().delete(id).await?;
    Ok(Json(json!({ "message": "FAQ deleted successfully" })))
}
