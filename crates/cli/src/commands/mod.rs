//! Command implementations.

pub mod chat;
pub mod data;
pub mod migrate;
pub mod user;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use erp_assistant_server::db::{self, Repositories};
use erp_assistant_server::services::{ChatError, DataError, UserError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    User(#[from] UserError),

    #[error("{0}")]
    Data(#[from] DataError),

    #[error("{0}")]
    Chat(#[from] ChatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read `ERP_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("ERP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("ERP_DATABASE_URL"))
}

/// Connect to the configured database.
async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(url.expose_secret()).await?)
}

/// Repositories over the configured database.
async fn repositories() -> Result<Repositories, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&url).await?;
    Ok(Repositories::postgres(&pool))
}
