//! ERP Assistant server library.
//!
//! REST CRUD for FAQs, users and metrics, the keyword chat responder, the
//! transcription stub and the voice I/O state machines. The binary in
//! `main.rs` wires this library to configuration, tracing and Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod voice;

pub use routes::app;
pub use state::AppState;
