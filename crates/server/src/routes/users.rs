//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

use erp_assistant_core::Username;

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireApiToken;
use crate::models::{CreateUserRequest, User};
use crate::services::UserError;
use crate::state::AppState;

/// `GET /users` - users without passwords.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users().list().await?))
}

/// `POST /users`
///
/// # Errors
///
/// Returns 400 on validation failure and 409 for a taken username.
#[instrument(skip(state, request))]
pub async fn create(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.users().create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `DELETE /users/{username}`
///
/// Deleting `admin` is refused with 403 before the caller is even checked.
///
/// # Errors
///
/// Returns 403 for `admin`, 401 without a valid token and 404 for an
/// unknown user.
#[instrument(skip(auth, state))]
pub async fn delete(
    auth: Result<RequireApiToken, AppError>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    if Username::is_admin_name(&username) {
        return Err(UserError::ProtectedAdmin.into());
    }
    auth?;

    state.users().delete(&username).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
