//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Argon2 password hashing and username/password login
//! - `chat` - Keyword chat responder, FAQ lookup and escalation
//! - `data` - Bulk export and import
//! - `faqs` - FAQ management
//! - `seed` - Sample data for a fresh store
//! - `transcription` - Speech-to-text seam with a stub implementation
//! - `users` - User management

pub mod auth;
pub mod chat;
pub mod data;
pub mod faqs;
pub mod seed;
pub mod transcription;
pub mod users;

pub use auth::{AuthError, AuthService, hash_password};
pub use chat::{ChatError, ChatService, ErpProviders, KnowledgeBase};
pub use data::{DataError, DataService};
pub use faqs::{FaqError, FaqService};
pub use seed::seed_sample_data;
pub use transcription::{
    AudioClip, StubTranscriber, Transcriber, Transcription, TranscriptionError,
    TranscriptionRequest,
};
pub use users::{UserError, UserService};
