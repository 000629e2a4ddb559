//! `PostgreSQL` escalation repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use erp_assistant_core::{Department, EscalationId};

use super::{EscalationRepository, RepositoryError};
use crate::models::{Escalation, NewEscalation};

#[derive(Debug, sqlx::FromRow)]
struct EscalationRow {
    id: i32,
    query: String,
    department: Option<Department>,
    username: Option<String>,
    initial_response: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EscalationRow> for Escalation {
    fn from(row: EscalationRow) -> Self {
        Self {
            id: EscalationId::new(row.id),
            query: row.query,
            department: row.department,
            username: row.username,
            timestamp: row.created_at,
            initial_response: row.initial_response,
        }
    }
}

/// Escalation repository over the `erp.escalation` table.
pub struct PgEscalationRepository {
    pool: PgPool,
}

impl PgEscalationRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EscalationRepository for PgEscalationRepository {
    async fn list(&self) -> Result<Vec<Escalation>, RepositoryError> {
        let rows = sqlx::query_as::<_, EscalationRow>(
            r"
            SELECT id, query, department, username, initial_response, created_at
            FROM erp.escalation
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, escalation: NewEscalation) -> Result<Escalation, RepositoryError> {
        let row = sqlx::query_as::<_, EscalationRow>(
            r"
            INSERT INTO erp.escalation (query, department, username, initial_response)
            VALUES ($1, $2, $3, $4)
            RETURNING id, query, department, username, initial_response, created_at
            ",
        )
        .bind(&escalation.query)
        .bind(escalation.department)
        .bind(&escalation.username)
        .bind(&escalation.initial_response)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
