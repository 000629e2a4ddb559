//! HTTP route handlers.
//!
//! # Route Structure
//!
//! Every route except the health probes is served both at the root and
//! under `/api`.
//!
//! ```text
//! GET    /health                        - Liveness
//! GET    /health/ready                  - Readiness (store reachable)
//!
//! # FAQs
//! GET    /faqs                          - All FAQs
//! POST   /faqs                          - Create FAQ (token)
//! DELETE /faqs/{id}                     - Delete FAQ (token)
//!
//! # Users
//! GET    /users                         - All users, no passwords
//! POST   /users                         - Create user (token)
//! DELETE /users/{username}              - Delete user (token; admin always 403)
//! POST   /auth/login                    - Username/password login
//!
//! # Chat
//! POST   /chat                          - JSON chat, or multipart audio mock
//! POST   /transcribe                    - Multipart transcription stub
//! GET    /chat-history/{user_id}        - Conversation log
//! GET    /escalations                   - Unanswered queries, newest first
//!
//! # Metrics and data
//! GET    /metrics/department-metrics    - FAQ count per department
//! GET    /metrics/query-metrics         - Chat queries per department
//! GET    /data/export                   - Users, FAQs, escalations
//! POST   /data/import                   - Replace FAQs and non-admin users (token)
//! GET    /diagnostic/faqs               - FAQ count and samples
//! GET    /config                        - Client configuration
//! ```

pub mod auth;
pub mod chat;
pub mod client_config;
pub mod data;
pub mod diagnostic;
pub mod escalations;
pub mod faqs;
pub mod health;
pub mod history;
pub mod metrics;
pub mod transcribe;
pub mod users;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest},
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{delete, get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// JSON body extractor whose rejections render as `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the metrics routes router.
pub fn metric_routes() -> Router<AppState> {
    Router::new()
        .route("/department-metrics", get(metrics::department_metrics))
        .route("/query-metrics", get(metrics::query_metrics))
}

/// Routes mounted at both `/` and `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // FAQs
        .route("/faqs", get(faqs::index).post(faqs::create))
        .route("/faqs/{id}", delete(faqs::delete))
        // Users
        .route("/users", get(users::index).post(users::create))
        .route("/users/{username}", delete(users::delete))
        .route("/auth/login", post(auth::login))
        // Chat
        .route(
            "/chat",
            post(chat::send).layer(DefaultBodyLimit::max(transcribe::MAX_AUDIO_BYTES)),
        )
        .route(
            "/transcribe",
            post(transcribe::transcribe).layer(DefaultBodyLimit::max(transcribe::MAX_AUDIO_BYTES)),
        )
        .route("/chat-history/{user_id}", get(history::show))
        .route("/escalations", get(escalations::index))
        // Metrics and data
        .nest("/metrics", metric_routes())
        .route("/data/export", get(data::export))
        .route("/data/import", post(data::import))
        .route("/diagnostic/faqs", get(diagnostic::faqs))
        .route("/config", get(client_config::show))
}

/// Build the application router with tracing, request ids and CORS.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// CORS for the browser clients. An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::db::Repositories;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::services::seed_sample_data;

    const TOKEN: &str = "k3Jq9vXz2LmP8wRt5YbN7cHd";

    async fn test_app(token: Option<&str>) -> Router {
        let mut config = ServerConfig::development();
        config.api_token = token.map(|t| SecretString::from(t.to_string()));
        let repos = Repositories::in_memory();
        seed_sample_data(&repos, false).await.unwrap();
        app(AppState::new(config, repos, None))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete_req(uri: &str) -> Request<Body> {
        Request::delete(uri).body(Body::empty()).unwrap()
    }

    fn multipart_req(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str("--BOUNDARY\r\n");
            match file_name {
                Some(file) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\nContent-Type: audio/webm\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str("--BOUNDARY--\r\n");

        Request::post(uri)
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    fn faq_body(question: &str) -> Value {
        json!({
            "question": question,
            "answer": "Raise a ticket with IT.",
            "department": "IT",
            "tags": ["access"]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(None).await;
        let response = app.clone().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_req("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_routes_mirrored_under_api() {
        let app = test_app(None).await;
        let (status, root) = send(&app, get_req("/faqs")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, api) = send(&app, get_req("/api/faqs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(root, api);
        assert_eq!(root.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_faq_ids_increase() {
        let app = test_app(None).await;
        let (status, first) =
            send(&app, json_req(Method::POST, "/faqs", &faq_body("How do I get VPN access?"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["id"], 5);

        let (_, second) =
            send(&app, json_req(Method::POST, "/api/faqs", &faq_body("Who resets passwords?"))).await;
        assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn test_create_faq_validation() {
        let app = test_app(None).await;
        let (status, body) = send(
            &app,
            json_req(Method::POST, "/faqs", &json!({"answer": "x", "department": "IT"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "question is required");

        let (status, _) = send(
            &app,
            json_req(
                Method::POST,
                "/faqs",
                &json!({"question": "q", "answer": "a", "department": "Legal"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_faq() {
        let app = test_app(None).await;
        let (status, body) = send(&app, delete_req("/faqs/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "FAQ not found");

        let (status, body) = send(&app, delete_req("/faqs/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "FAQ deleted successfully");
    }

    #[tokio::test]
    async fn test_delete_admin_forbidden_without_token() {
        let app = test_app(Some(TOKEN)).await;
        let (status, body) = send(&app, delete_req("/users/admin")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "The admin user cannot be deleted");

        let request = Request::delete("/api/users/admin")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let app = test_app(None).await;
        let (status, body) = send(
            &app,
            json_req(
                Method::POST,
                "/users",
                &json!({"username": "ops_user", "password": "short", "department": "IT"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "password must be at least 8 characters");

        let (_, users) = send(&app, get_req("/users")).await;
        assert_eq!(users, json!([]));
    }

    #[tokio::test]
    async fn test_token_gate() {
        let app = test_app(Some(TOKEN)).await;

        let (status, _) =
            send(&app, json_req(Method::POST, "/faqs", &faq_body("Where is the printer?"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let mut request = json_req(Method::POST, "/faqs", &faq_body("Where is the printer?"));
        request.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {TOKEN}")).unwrap(),
        );
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        // Reads stay open
        let (status, _) = send(&app, get_req("/faqs")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_inventory() {
        let app = test_app(None).await;
        let (status, body) = send(
            &app,
            json_req(Method::POST, "/chat", &json!({"message": "Show current inventory"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "erp");
        let lines = body["response"]
            .as_str()
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("- "))
            .count();
        assert_eq!(lines, 3);
    }

    #[tokio::test]
    async fn test_chat_content_types() {
        let app = test_app(None).await;
        let request = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Unsupported content type");

        let (status, body) =
            send(&app, multipart_req("/api/chat", &[("audio", Some("a.webm"), "RIFF")])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Show me the current inventory levels");
        assert_eq!(body["confidence"], 0.92);
    }

    #[tokio::test]
    async fn test_chat_history_created() {
        let app = test_app(None).await;
        let (status, _) = send(&app, get_req("/chat-history/bob_it")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, reply) = send(
            &app,
            json_req(
                Method::POST,
                "/chat",
                &json!({"message": "help", "department": "IT", "username": "Bob"}),
            ),
        )
        .await;
        assert_eq!(reply["chat_history_id"], "bob_it");

        let (status, history) = send(&app, get_req("/api/chat-history/bob_it")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["messages"].as_array().unwrap().len(), 3);

        let (_, metrics) = send(&app, get_req("/metrics/query-metrics")).await;
        assert_eq!(metrics[0]["department"], "IT");
        assert_eq!(metrics[0]["count"], 1);
    }

    #[tokio::test]
    async fn test_transcribe() {
        let app = test_app(None).await;
        let (status, body) = send(
            &app,
            multipart_req("/api/transcribe", &[("manualText", None, "Show inventory levels")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Show inventory levels");
        assert_eq!(body["confidence"], 0.99);

        let (status, body) =
            send(&app, multipart_req("/transcribe", &[("language", None, "en")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No audio file found in request");

        let (status, body) =
            send(&app, multipart_req("/transcribe", &[("audio", Some("clip.webm"), "12345")])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"], true);
        assert_eq!(body["originalAudioSize"], 5);
    }

    #[tokio::test]
    async fn test_department_metrics() {
        let app = test_app(None).await;
        let (status, body) = send(&app, get_req("/metrics/department-metrics")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            body.as_array()
                .unwrap()
                .contains(&json!({"department": "Finance", "queries": 2}))
        );
    }

    #[tokio::test]
    async fn test_client_config_and_diagnostic() {
        let app = test_app(None).await;
        let (status, config) = send(&app, get_req("/api/config")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(config["features"]["voiceEnabled"], true);
        assert_eq!(config["features"]["autoRead"], false);

        let (status, diagnostic) = send(&app, get_req("/diagnostic/faqs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(diagnostic["total_faqs"], 4);
        assert_eq!(diagnostic["samples"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let app = test_app(None).await;
        let request = Request::get("/health")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }
}
