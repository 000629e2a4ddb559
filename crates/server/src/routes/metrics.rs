//! Read-only metrics.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::models::{DepartmentMetric, QueryMetric};
use crate::state::AppState;

/// `GET /metrics/department-metrics` - FAQ count per department.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn department_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentMetric>>, AppError> {
    Ok(Json(state.repos().faqs.count_by_department().await?))
}

/// `GET /metrics/query-metrics` - chat queries per department.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn query_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<QueryMetric>>, AppError> {
    Ok(Json(state.repos().query_metrics.list().await?))
}
