//! Unified error handling for the HTTP surface.

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::chat::ChatError;
use crate::services::{AuthError, DataError, FaqError, TranscriptionError, UserError};

/// Application-level error type.
///
/// Every variant renders as `{"error": message}`; server-side failures get a
/// generic message and are reported to Sentry.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Chat responder failed to build a reply.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// Caller lacks permission, or the resource is protected.
    #[error("{0}")]
    Forbidden(String),

    /// Validation failure; carries the first validator message.
    #[error("{0}")]
    BadRequest(String),

    /// Unique constraint violation.
    #[error("{0}")]
    Conflict(String),

    /// Request body has a content type the endpoint cannot handle.
    #[error("Unsupported content type")]
    UnsupportedMediaType,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Chat(ChatError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Chat(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Chat(ChatError::Validation(e)) => e.to_string(),
            Self::Chat(_) => "Failed to process request".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            Self::UnsupportedMediaType
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        if rejection.status() == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            Self::UnsupportedMediaType
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal(err.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(e) => e.into(),
            UserError::UsernameTaken => Self::Conflict(err.to_string()),
            UserError::ProtectedAdmin => Self::Forbidden(err.to_string()),
            UserError::NotFound => Self::NotFound(err.to_string()),
            UserError::Auth(e) => e.into(),
            UserError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        match err {
            FaqError::Validation(e) => e.into(),
            FaqError::NotFound => Self::NotFound(err.to_string()),
            FaqError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Validation(e) => e.into(),
            DataError::Auth(e) => e.into(),
            DataError::Duplicate(msg) => Self::Conflict(msg),
            DataError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<TranscriptionError> for AppError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::NoAudio => Self::BadRequest(err.to_string()),
            TranscriptionError::Backend(detail) => Self::Internal(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::chat::ProviderError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("FAQ not found".to_string());
        assert_eq!(err.to_string(), "FAQ not found");

        let err = AppError::BadRequest("question is required".to_string());
        assert_eq!(err.to_string(), "question is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("x".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(RepositoryError::Conflict("dup".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::UnsupportedMediaType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, body) = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unsupported_media_type_body() {
        let (status, body) = body_json(AppError::UnsupportedMediaType).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Unsupported content type");
    }

    #[tokio::test]
    async fn test_user_errors_map_to_status() {
        let (status, body) = body_json(UserError::ProtectedAdmin.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "The admin user cannot be deleted");

        let (status, _) = body_json(UserError::UsernameTaken.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = body_json(
            UserError::Validation(ValidationError::PasswordTooShort { min: 8 }).into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password must be at least 8 characters");
    }

    #[tokio::test]
    async fn test_chat_error_body() {
        let (status, body) =
            body_json(AppError::Chat(ChatError::Provider(ProviderError::Unavailable(
                "ledger offline".to_string(),
            ))))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process request");
    }
}
