//! Bearer-token gate for mutating routes.
//!
//! When `ERP_API_TOKEN` is configured, handlers that take [`RequireApiToken`]
//! reject requests without `Authorization: Bearer <token>`. Without a
//! configured token the extractor admits every request.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the configured API token.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_faq(
///     _auth: RequireApiToken,
///     State(state): State<AppState>,
/// ) -> Result<Json<Faq>, AppError> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireApiToken;

impl FromRequestParts<AppState> for RequireApiToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config().api_token.is_none() {
            return Ok(Self);
        }

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        if state.config().token_matches(presented) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected request with invalid API token");
            Err(AppError::Unauthorized("Invalid bearer token".to_string()))
        }
    }
}
