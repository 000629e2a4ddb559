//! `PostgreSQL` chat history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use erp_assistant_core::{ChatRole, ChatSource, Department};

use super::{ChatHistoryRepository, RepositoryError};
use crate::models::{ChatHistory, ChatMessage};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ChatHistoryRow {
    user_id: String,
    username: String,
    department: Option<Department>,
    last_updated: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    role: ChatRole,
    content: String,
    source: Option<ChatSource>,
    confidence: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            role: row.role,
            content: row.content,
            timestamp: row.created_at,
            source: row.source,
            confidence: row.confidence,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Chat histories over `erp.chat_history` and `erp.chat_message`.
pub struct PgChatHistoryRepository {
    pool: PgPool,
}

impl PgChatHistoryRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_message(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    message: &ChatMessage,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO erp.chat_message (user_id, role, content, source, confidence, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(user_id)
    .bind(message.role)
    .bind(&message.content)
    .bind(message.source)
    .bind(message.confidence)
    .bind(message.timestamp)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl ChatHistoryRepository for PgChatHistoryRepository {
    async fn get(&self, user_id: &str) -> Result<Option<ChatHistory>, RepositoryError> {
        let Some(history) = sqlx::query_as::<_, ChatHistoryRow>(
            r"
            SELECT user_id, username, department, last_updated
            FROM erp.chat_history
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let messages = sqlx::query_as::<_, ChatMessageRow>(
            r"
            SELECT role, content, source, confidence, created_at
            FROM erp.chat_message
            WHERE user_id = $1
            ORDER BY id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ChatHistory {
            user_id: history.user_id,
            username: history.username,
            department: history.department,
            messages: messages.into_iter().map(Into::into).collect(),
            last_updated: history.last_updated,
        }))
    }

    async fn append(
        &self,
        user_id: &str,
        username: &str,
        department: Option<Department>,
        welcome: ChatMessage,
        messages: Vec<ChatMessage>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let created: Option<String> = sqlx::query_scalar(
            r"
            INSERT INTO erp.chat_history (user_id, username, department, last_updated)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id) DO NOTHING
            RETURNING user_id
            ",
        )
        .bind(user_id)
        .bind(username)
        .bind(department)
        .fetch_optional(&mut *tx)
        .await?;

        if created.is_some() {
            insert_message(&mut tx, user_id, &welcome).await?;
        }

        for message in &messages {
            insert_message(&mut tx, user_id, message).await?;
        }

        sqlx::query("UPDATE erp.chat_history SET last_updated = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
