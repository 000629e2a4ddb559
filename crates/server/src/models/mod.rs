//! Domain models and request validation.

pub mod chat;
pub mod data;
pub mod escalation;
pub mod faq;
pub mod metric;
pub mod user;

use thiserror::Error;

use erp_assistant_core::{DepartmentError, UsernameError};

pub use chat::{ChatHistory, ChatMessage, ChatReply, ChatRequest};
pub use data::{DataExport, DataImport, ImportSummary};
pub use escalation::{Escalation, NewEscalation};
pub use faq::{CreateFaqRequest, Faq, NewFaq};
pub use metric::{DepartmentMetric, QueryMetric};
pub use user::{CreateUserRequest, NewUser, User};

/// Validation failure for an incoming request body.
///
/// The `Display` text is returned to the client verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    #[error(transparent)]
    Department(#[from] DepartmentError),

    #[error(transparent)]
    Username(#[from] UsernameError),

    /// Password shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{0}")]
    Role(String),

    /// Stored ids start at 1.
    #[error("FAQ id must be a positive integer, got {0}")]
    NonPositiveId(i32),

    /// A case variant of the protected administrator name.
    #[error("username {0} is reserved")]
    ReservedUsername(String),
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Required(field)),
    }
}
