//! Store diagnostics.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::error;

use crate::state::AppState;

const SAMPLE_SIZE: usize = 5;

/// `GET /diagnostic/faqs` - FAQ count and up to five samples.
///
/// A store failure is reported in the body with 503 rather than as an error.
pub async fn faqs(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = if state.pool().is_some() { "postgres" } else { "memory" };

    let result = async {
        let total = state.repos().faqs.count().await?;
        let mut samples = state.repos().faqs.list().await?;
        samples.truncate(SAMPLE_SIZE);
        Ok::<_, crate::db::RepositoryError>((total, samples))
    }
    .await;

    match result {
        Ok((total, samples)) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "store": store,
                "db_connected": true,
                "total_faqs": total,
                "samples": samples,
            })),
        ),
        Err(e) => {
            error!(error = %e, "FAQ diagnostic failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "store": store,
                    "db_connected": false,
                    "error": "Store unavailable",
                })),
            )
        }
    }
}
