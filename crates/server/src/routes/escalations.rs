//! Escalation log.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::models::Escalation;
use crate::state::AppState;

/// `GET /escalations` - newest first.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Escalation>>, AppError> {
    Ok(Json(state.repos().escalations.list().await?))
}
