//! Role and tag enums for users and chat messages.

use serde::{Deserialize, Serialize};

/// User role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "erp.user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user: can chat and read FAQs.
    #[default]
    User,
    /// Administrator: manages FAQs, users and data.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("role must be 'user' or 'admin' (got '{s}')")),
        }
    }
}

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "erp.chat_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Label on a chat response naming what produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "erp.chat_source", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ChatSource {
    /// Answered from a stored FAQ.
    KnowledgeBase,
    /// Answered by the ERP keyword router.
    Erp,
    /// Not answerable; an escalation record was stored.
    Escalated,
    /// Answered by a language model.
    Llm,
    /// Request failed.
    Error,
    /// Generated by the system itself (welcome messages).
    System,
}

impl ChatSource {
    /// Wire name of the source tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => "knowledge_base",
            Self::Erp => "erp",
            Self::Escalated => "escalated",
            Self::Llm => "llm",
            Self::Error => "error",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for ChatSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
