//! `PostgreSQL` query metric repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use erp_assistant_core::Department;

use super::{QueryMetricRepository, RepositoryError};
use crate::models::QueryMetric;

#[derive(Debug, sqlx::FromRow)]
struct QueryMetricRow {
    department: Department,
    count: i64,
    last_updated: DateTime<Utc>,
}

/// Query counters over the `erp.query_metric` table.
pub struct PgQueryMetricRepository {
    pool: PgPool,
}

impl PgQueryMetricRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryMetricRepository for PgQueryMetricRepository {
    async fn increment(&self, department: Department) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO erp.query_metric (department, count, last_updated)
            VALUES ($1, 1, now())
            ON CONFLICT (department)
            DO UPDATE SET count = erp.query_metric.count + 1, last_updated = now()
            ",
        )
        .bind(department)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<QueryMetric>, RepositoryError> {
        let rows = sqlx::query_as::<_, QueryMetricRow>(
            "SELECT department, count, last_updated FROM erp.query_metric ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| QueryMetric {
                department: row.department,
                count: row.count,
                last_updated: row.last_updated,
            })
            .collect())
    }
}
