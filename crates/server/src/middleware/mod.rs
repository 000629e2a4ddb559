//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded on the span, echoed in `x-request-id`)
//! 4. CORS

pub mod auth;
pub mod request_id;

pub use auth::RequireApiToken;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
