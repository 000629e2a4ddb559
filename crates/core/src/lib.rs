//! ERP Assistant Core - Shared types library.
//!
//! This crate provides common types used across all ERP assistant components:
//! - `server` - REST API, chat responder and transcription endpoints
//! - `cli` - Command-line tools for migrations, users and data transfer
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, departments, roles and chat tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
