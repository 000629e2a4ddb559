//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::ServerConfig;
use crate::db::{self, Repositories};
use crate::services::{
    AuthService, ChatService, DataError, DataService, ErpProviders, FaqService, KnowledgeBase,
    StubTranscriber, Transcriber, UserService, seed_sample_data,
};

/// Error building application state at startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("seeding sample data failed: {0}")]
    Seed(#[from] DataError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Services are built once from the
/// repositories and share a single FAQ lookup cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: Option<PgPool>,
    repos: Repositories,
    auth: AuthService,
    chat: ChatService,
    data: DataService,
    faqs: FaqService,
    users: UserService,
    transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    /// Create application state over `repos`.
    ///
    /// `pool` is the connection pool behind `repos`, if any; it backs the
    /// readiness probe.
    #[must_use]
    pub fn new(config: ServerConfig, repos: Repositories, pool: Option<PgPool>) -> Self {
        Self::with_providers(config, repos, pool, ErpProviders::random(), Arc::new(StubTranscriber))
    }

    /// Connect the configured store and seed it.
    ///
    /// With a database URL, sample FAQs are added to an empty `faq` table.
    /// Without one, an in-memory store is seeded with sample FAQs and the
    /// demo users.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError` if the database is unreachable or seeding fails.
    pub async fn bootstrap(config: ServerConfig) -> Result<Self, BootstrapError> {
        let (repos, pool) = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url).await?;
                info!("Database pool created");
                (Repositories::postgres(&pool), Some(pool))
            }
            None => {
                info!("No database URL configured, using in-memory store");
                (Repositories::in_memory(), None)
            }
        };

        seed_sample_data(&repos, pool.is_none()).await?;

        Ok(Self::new(config, repos, pool))
    }

    /// Create application state with explicit data sources.
    #[must_use]
    pub fn with_providers(
        config: ServerConfig,
        repos: Repositories,
        pool: Option<PgPool>,
        providers: ErpProviders,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        let knowledge = KnowledgeBase::new(repos.faqs.clone());
        let chat = ChatService::new(
            repos.clone(),
            providers,
            knowledge.clone(),
            config.features().escalate_unmatched,
        );

        Self {
            inner: Arc::new(AppStateInner {
                auth: AuthService::new(repos.users.clone()),
                data: DataService::new(repos.clone(), knowledge.clone()),
                faqs: FaqService::new(repos.faqs.clone(), knowledge),
                users: UserService::new(repos.users.clone()),
                chat,
                config,
                pool,
                repos,
                transcriber,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the database connection pool, when running on `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn repos(&self) -> &Repositories {
        &self.inner.repos
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }

    #[must_use]
    pub fn data(&self) -> &DataService {
        &self.inner.data
    }

    #[must_use]
    pub fn faqs(&self) -> &FaqService {
        &self.inner.faqs
    }

    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }

    #[must_use]
    pub fn transcriber(&self) -> &dyn Transcriber {
        self.inner.transcriber.as_ref()
    }
}
