//! `PostgreSQL` FAQ repository.

use async_trait::async_trait;
use sqlx::PgPool;

use erp_assistant_core::{Department, FaqId};

use super::{FaqRepository, RepositoryError, conflict_on_unique};
use crate::models::{DepartmentMetric, Faq, NewFaq};

/// `PostgreSQL` `numeric_value_out_of_range`, raised when `max(id) + 1`
/// overflows `INTEGER`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

pub(crate) const FAQ_IDS_EXHAUSTED: &str = "No FAQ ids left above the current maximum";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct FaqRow {
    id: i32,
    question: String,
    answer: String,
    department: Department,
    tags: Vec<String>,
}

impl From<FaqRow> for Faq {
    fn from(row: FaqRow) -> Self {
        Self {
            id: FaqId::new(row.id),
            question: row.question,
            answer: row.answer,
            department: row.department,
            tags: row.tags,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentCountRow {
    department: Department,
    queries: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// FAQ repository over the `erp.faq` table.
pub struct PgFaqRepository {
    pool: PgPool,
}

impl PgFaqRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FaqRepository for PgFaqRepository {
    async fn list(&self) -> Result<Vec<Faq>, RepositoryError> {
        let rows = sqlx::query_as::<_, FaqRow>(
            "SELECT id, question, answer, department, tags FROM erp.faq ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Faq>, RepositoryError> {
        let rows = sqlx::query_as::<_, FaqRow>(
            r"
            SELECT id, question, answer, department, tags
            FROM erp.faq
            WHERE department = $1
            ORDER BY id
            ",
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, faq: NewFaq) -> Result<Faq, RepositoryError> {
        // Two concurrent inserts can compute the same id; the loser gets a
        // unique violation, reported as a conflict.
        let row = sqlx::query_as::<_, FaqRow>(
            r"
            INSERT INTO erp.faq (id, question, answer, department, tags)
            SELECT COALESCE(MAX(id), 0) + 1, $1, $2, $3, $4 FROM erp.faq
            RETURNING id, question, answer, department, tags
            ",
        )
        .bind(&faq.question)
        .bind(&faq.answer)
        .bind(faq.department)
        .bind(&faq.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) =>
            {
                RepositoryError::Conflict(FAQ_IDS_EXHAUSTED.to_string())
            }
            e => conflict_on_unique(e, "FAQ id already taken, please retry"),
        })?;

        Ok(row.into())
    }

    async fn delete(&self, id: FaqId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM erp.faq WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM erp.faq")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentMetric>, RepositoryError> {
        let rows = sqlx::query_as::<_, DepartmentCountRow>(
            r"
            SELECT department, COUNT(*) AS queries
            FROM erp.faq
            GROUP BY department
            ORDER BY department
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DepartmentMetric {
                department: row.department,
                queries: row.queries,
            })
            .collect())
    }
}
