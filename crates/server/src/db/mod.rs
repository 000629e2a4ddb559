//! Persistence layer.
//!
//! Every collection sits behind an object-safe repository trait with two
//! implementations: `PostgreSQL` (sqlx) and an in-memory store used when no
//! database URL is configured and in tests.
//!
//! # Schema: `erp`
//!
//! - `faq` - FAQ entries with tags
//! - `app_user` - Users with argon2 password hashes
//! - `escalation` - Unanswered chat queries
//! - `chat_history` / `chat_message` - Per-user conversation logs
//! - `query_metric` - Chat query counter per department
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p erp-assistant-cli -- migrate
//! ```

pub mod chat_history;
pub mod dataset;
pub mod escalations;
pub mod faqs;
pub mod memory;
pub mod metrics;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use erp_assistant_core::{Department, FaqId, Username};

use crate::models::{
    ChatHistory, ChatMessage, DepartmentMetric, Escalation, Faq, NewEscalation, NewFaq,
    QueryMetric, User,
};

pub use chat_history::PgChatHistoryRepository;
pub use dataset::PgDatasetRepository;
pub use escalations::PgEscalationRepository;
pub use faqs::PgFaqRepository;
pub use memory::MemoryStore;
pub use metrics::PgQueryMetricRepository;
pub use users::PgUserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("{0}")]
    Conflict(String),
}

/// Map a unique-key violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict(message.to_string())
        }
        e => RepositoryError::Database(e),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// FAQ collection.
#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// All FAQs ordered by id.
    async fn list(&self) -> Result<Vec<Faq>, RepositoryError>;

    /// FAQs of one department ordered by id.
    async fn list_by_department(&self, department: Department)
    -> Result<Vec<Faq>, RepositoryError>;

    /// Insert with id `max(id) + 1`, or 1 when the collection is empty;
    /// `Conflict` when `max(id)` is `i32::MAX`.
    async fn create(&self, faq: NewFaq) -> Result<Faq, RepositoryError>;

    /// Delete by id; `NotFound` when absent.
    async fn delete(&self, id: FaqId) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;

    /// FAQ count grouped by department, departments without FAQs omitted.
    async fn count_by_department(&self) -> Result<Vec<DepartmentMetric>, RepositoryError>;
}

/// User collection. Password hashes only leave through `find_credentials`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// The user and its password hash.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Insert; `Conflict` when the username is taken.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), RepositoryError>;

    /// Delete by username; `NotFound` when absent.
    async fn delete(&self, username: &Username) -> Result<(), RepositoryError>;
}

/// Bulk replacement of FAQs and users as one unit.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Replace every FAQ and every user except the protected admin.
    ///
    /// Either both collections are replaced or neither is. Duplicate FAQ ids
    /// or usernames in the input fail with `Conflict`.
    async fn replace_dataset(
        &self,
        faqs: &[Faq],
        users: &[(User, String)],
    ) -> Result<(), RepositoryError>;
}

/// Escalation log.
#[async_trait]
pub trait EscalationRepository: Send + Sync {
    /// All escalations, newest first.
    async fn list(&self) -> Result<Vec<Escalation>, RepositoryError>;

    async fn create(&self, escalation: NewEscalation) -> Result<Escalation, RepositoryError>;
}

/// Per-user chat histories.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<ChatHistory>, RepositoryError>;

    /// Append messages to a history, creating it with `welcome` as the first
    /// message when it does not exist yet.
    async fn append(
        &self,
        user_id: &str,
        username: &str,
        department: Option<Department>,
        welcome: ChatMessage,
        messages: Vec<ChatMessage>,
    ) -> Result<(), RepositoryError>;
}

/// Chat query counters.
#[async_trait]
pub trait QueryMetricRepository: Send + Sync {
    async fn increment(&self, department: Department) -> Result<(), RepositoryError>;

    /// All counters ordered by department.
    async fn list(&self) -> Result<Vec<QueryMetric>, RepositoryError>;
}

/// The set of repositories the application runs on.
#[derive(Clone)]
pub struct Repositories {
    pub faqs: Arc<dyn FaqRepository>,
    pub users: Arc<dyn UserRepository>,
    pub escalations: Arc<dyn EscalationRepository>,
    pub chat_history: Arc<dyn ChatHistoryRepository>,
    pub query_metrics: Arc<dyn QueryMetricRepository>,
    pub dataset: Arc<dyn DatasetRepository>,
}

impl Repositories {
    /// Repositories backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            faqs: Arc::new(PgFaqRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            escalations: Arc::new(PgEscalationRepository::new(pool.clone())),
            chat_history: Arc::new(PgChatHistoryRepository::new(pool.clone())),
            query_metrics: Arc::new(PgQueryMetricRepository::new(pool.clone())),
            dataset: Arc::new(PgDatasetRepository::new(pool.clone())),
        }
    }

    /// Repositories backed by a fresh, empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            faqs: store.clone(),
            users: store.clone(),
            escalations: store.clone(),
            chat_history: store.clone(),
            query_metrics: store.clone(),
            dataset: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
