//! `PostgreSQL` bulk replacement of FAQs and users.

use async_trait::async_trait;
use sqlx::PgPool;

use erp_assistant_core::Username;

use super::{DatasetRepository, RepositoryError, conflict_on_unique};
use crate::models::{Faq, User};

/// Replaces `erp.faq` and the non-admin rows of `erp.app_user` in one
/// transaction.
pub struct PgDatasetRepository {
    pool: PgPool,
}

impl PgDatasetRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetRepository for PgDatasetRepository {
    async fn replace_dataset(
        &self,
        faqs: &[Faq],
        users: &[(User, String)],
    ) -> Result<(), RepositoryError> {
        // Dropped without commit on any error, which rolls back both tables.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM erp.faq").execute(&mut *tx).await?;

        for faq in faqs {
            sqlx::query(
                r"
                INSERT INTO erp.faq (id, question, answer, department, tags)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(faq.id)
            .bind(&faq.question)
            .bind(&faq.answer)
            .bind(faq.department)
            .bind(&faq.tags)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, &format!("duplicate FAQ id {}", faq.id)))?;
        }

        sqlx::query("DELETE FROM erp.app_user WHERE lower(username) <> $1")
            .bind(Username::ADMIN)
            .execute(&mut *tx)
            .await?;

        for (user, password_hash) in users {
            sqlx::query(
                r"
                INSERT INTO erp.app_user (username, password_hash, department, role)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(&user.username)
            .bind(password_hash)
            .bind(user.department)
            .bind(user.role)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, &format!("duplicate username {}", user.username)))?;
        }

        tx.commit().await?;
        Ok(())
    }
}
