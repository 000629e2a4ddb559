//! `PostgreSQL` user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use erp_assistant_core::{Department, Role, Username};

use super::{RepositoryError, UserRepository, conflict_on_unique};
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    username: String,
    department: Department,
    role: Role,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    username: String,
    department: Department,
    role: Role,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            username,
            department: row.department,
            role: row.role,
        })
    }
}

/// User repository over the `erp.app_user` table.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT username, department, role FROM erp.app_user ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r"
            SELECT username, department, role, password_hash
            FROM erp.app_user
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let user = User::try_from(UserRow {
                username: row.username,
                department: row.department,
                role: row.role,
            })?;
            Ok((user, row.password_hash))
        })
        .transpose()
    }

    async fn create(&self, user: &User, password_hash: &str) -> Result<(), RepositoryError> {
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
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))?;

        Ok(())
    }

    async fn delete(&self, username: &Username) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM erp.app_user WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
