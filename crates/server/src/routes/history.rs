//! Chat history lookup.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::models::ChatHistory;
use crate::state::AppState;

/// `GET /chat-history/{user_id}`
///
/// # Errors
///
/// Returns 404 when the user has never chatted.
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ChatHistory>, AppError> {
    state
        .repos()
        .chat_history
        .get(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Chat history for user {user_id} not found")))
}
