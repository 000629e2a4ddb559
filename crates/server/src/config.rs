//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ERP_DATABASE_URL` - `PostgreSQL` connection string (fallback: `DATABASE_URL`).
//!   When neither is set the server runs on a seeded in-memory store.
//! - `ERP_HOST` - Bind address (default: 127.0.0.1)
//! - `ERP_PORT` - Listen port (default: 5000)
//! - `ERP_API_TOKEN` - Bearer token required for mutating routes (min 24 chars, high entropy)
//! - `ERP_ALLOWED_ORIGINS` - Comma-separated CORS origins (default: `*`)
//! - `ERP_LOG_JSON` - Emit JSON logs when set to `true`
//! - `ERP_PUBLIC_API_URL` - API base URL handed to clients (default: `http://localhost:5000/api`)
//! - `AUTH_DOMAIN`, `AUTH_CLIENT_ID`, `AUTH_AUDIENCE` - Identity provider settings for clients
//!
//! ## Optional (feature flags)
//! - `ERP_VOICE_ENABLED` - Voice input/output in the chat UI (default: true)
//! - `ERP_AUTO_READ` - Speak each assistant reply automatically (default: false)
//! - `ERP_SIDEBAR_ENABLED` - Show the chat sidebar (default: true)
//! - `ERP_ESCALATE_UNMATCHED` - Store an escalation for unanswerable queries (default: true)
//!
//! ## Optional (Sentry)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

const MIN_API_TOKEN_LENGTH: usize = 24;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PUBLIC_API_URL: &str = "http://localhost:5000/api";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL; `None` selects the in-memory store
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token guarding mutating routes; `None` leaves them open
    pub api_token: Option<SecretString>,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Settings handed to browser clients
    pub client: ClientConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Client-facing settings: API location, identity provider and feature flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL clients use to reach this API
    pub api_base_url: String,
    /// Identity provider settings (external collaborator)
    pub auth: Option<IdentityProviderConfig>,
    /// UI and responder feature flags
    pub features: FeatureFlags,
}

/// Identity provider settings for the login flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderConfig {
    pub domain: String,
    pub client_id: String,
    pub audience: Option<String>,
}

/// Feature flags for the chat UI and responder.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct FeatureFlags {
    /// Voice input and output controls
    pub voice_enabled: bool,
    /// Speak each assistant reply automatically
    pub auto_read: bool,
    /// Conversation sidebar
    pub sidebar_enabled: bool,
    /// Store an escalation when no answer is found
    pub escalate_unmatched: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            auto_read: false,
            sidebar_enabled: true,
            escalate_unmatched: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if variables are invalid or if the API token
    /// fails validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ERP_DATABASE_URL");
        let host = get_env_or_default("ERP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ERP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ERP_PORT", &DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ERP_PORT".to_string(), e.to_string()))?;

        let api_token = match get_optional_env("ERP_API_TOKEN") {
            Some(token) => {
                let token = SecretString::from(token);
                validate_api_token(&token, "ERP_API_TOKEN")?;
                Some(token)
            }
            None => None,
        };

        let allowed_origins = parse_origins(&get_env_or_default("ERP_ALLOWED_ORIGINS", "*"));
        let log_json = get_bool_env("ERP_LOG_JSON", false)?;
        let client = ClientConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            api_token,
            allowed_origins,
            log_json,
            client,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for local development and tests: in-memory store,
    /// no token gate, default feature flags.
    #[must_use]
    pub fn development() -> Self {
        Self {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            api_token: None,
            allowed_origins: Vec::new(),
            log_json: false,
            client: ClientConfig {
                api_base_url: DEFAULT_PUBLIC_API_URL.to_string(),
                auth: None,
                features: FeatureFlags::default(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the feature flags.
    #[must_use]
    pub const fn features(&self) -> &FeatureFlags {
        &self.client.features
    }

    /// Check a presented bearer token against the configured one.
    ///
    /// Always `false` when no token is configured.
    #[must_use]
    pub fn token_matches(&self, presented: &str) -> bool {
        self.api_token
            .as_ref()
            .is_some_and(|expected| constant_time_eq(expected.expose_secret(), presented))
    }
}

impl ClientConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let auth = match (
            get_optional_env("AUTH_DOMAIN"),
            get_optional_env("AUTH_CLIENT_ID"),
        ) {
            (Some(domain), Some(client_id)) => Some(IdentityProviderConfig {
                domain,
                client_id,
                audience: get_optional_env("AUTH_AUDIENCE"),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "AUTH_*".to_string(),
                    "Both AUTH_DOMAIN and AUTH_CLIENT_ID must be set together".to_string(),
                ));
            }
        };

        let defaults = FeatureFlags::default();
        let features = FeatureFlags {
            voice_enabled: get_bool_env("ERP_VOICE_ENABLED", defaults.voice_enabled)?,
            auto_read: get_bool_env("ERP_AUTO_READ", defaults.auto_read)?,
            sidebar_enabled: get_bool_env("ERP_SIDEBAR_ENABLED", defaults.sidebar_enabled)?,
            escalate_unmatched: get_bool_env(
                "ERP_ESCALATE_UNMATCHED",
                defaults.escalate_unmatched,
            )?,
        };

        Ok(Self {
            api_base_url: get_env_or_default("ERP_PUBLIC_API_URL", DEFAULT_PUBLIC_API_URL),
            auth,
            features,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
pub(crate) fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a boolean environment variable (`true/false/1/0/yes/no/on/off`).
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_bool(&value)
        .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("not a boolean: {value}")))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated origin list; `*` means any origin.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(String::from)
        .collect()
}

/// Validate that the API token is long enough, not a placeholder, and random-looking.
fn validate_api_token(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();
    if value.len() < MIN_API_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_API_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    validate_secret_strength(value, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Compare two strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
