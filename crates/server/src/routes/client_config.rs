//! Settings handed to browser clients.

use axum::{Json, extract::State};

use crate::config::ClientConfig;
use crate::state::AppState;

/// `GET /api/config` - API base URL, identity provider settings and
/// feature flags. Contains no secrets.
pub async fn show(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.config().client.clone())
}
