//! Integration tests for the ERP assistant.
//!
//! Each test spawns the full router on `127.0.0.1:0` over a freshly seeded
//! in-memory store and talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p erp-assistant-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `faqs` - FAQ CRUD, department metrics and cache invalidation
//! - `users` - User CRUD, admin protection and login
//! - `chat` - Chat responder, history, escalations and query metrics
//! - `transcribe` - Transcription stub and chat audio mock
//! - `data` - Export/import and the bearer-token gate

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use erp_assistant_server::config::ServerConfig;
use erp_assistant_server::{AppState, app};

/// API token used by [`TestServer::with_token`].
pub const TEST_TOKEN: &str = "integration-test-token-7f3a9c2e51b84d06";

/// A running server bound to an ephemeral port.
///
/// The server task is aborted when this value is dropped.
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server with the development configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the store cannot be seeded.
    pub async fn spawn() -> Self {
        Self::spawn_with(ServerConfig::development()).await
    }

    /// Spawn a server whose mutating routes require [`TEST_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the store cannot be seeded.
    pub async fn with_token() -> Self {
        let mut config = ServerConfig::development();
        config.api_token = Some(SecretString::from(TEST_TOKEN));
        Self::spawn_with(config).await
    }

    /// Spawn a server with `config`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the store cannot be seeded.
    pub async fn spawn_with(config: ServerConfig) -> Self {
        let state = AppState::bootstrap(config)
            .await
            .expect("Failed to bootstrap application state");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// `GET path`, returning status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed");
        into_json(response).await
    }

    /// `POST path` with a JSON body, returning status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> (u16, serde_json::Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed");
        into_json(response).await
    }

    /// `DELETE path`, returning status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn delete(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("request failed");
        into_json(response).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Split a response into status and parsed JSON body.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn into_json(response: reqwest::Response) -> (u16, serde_json::Value) {
    let status = response.status().as_u16();
    let body = response.json().await.expect("response body is not JSON");
    (status, body)
}
