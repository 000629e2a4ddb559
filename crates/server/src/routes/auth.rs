//! Username/password login.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use super::ApiJson;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /auth/login` - returns the user on success.
///
/// # Errors
///
/// Returns 401 for an unknown user or wrong password.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .auth()
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(user))
}
