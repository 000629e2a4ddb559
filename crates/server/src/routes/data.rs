//! Bulk data transfer.

use axum::{Json, extract::State};
use tracing::instrument;

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireApiToken;
use crate::models::{DataExport, DataImport, ImportSummary};
use crate::state::AppState;

/// `GET /data/export`
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn export(State(state): State<AppState>) -> Result<Json<DataExport>, AppError> {
    Ok(Json(state.data().export().await?))
}

/// `POST /data/import`
///
/// # Errors
///
/// Returns 400 for blank FAQ fields and 409 for duplicate ids or usernames.
#[instrument(skip_all)]
pub async fn import(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(data): ApiJson<DataImport>,
) -> Result<Json<ImportSummary>, AppError> {
    Ok(Json(state.data().import(data).await?))
}
