//! Chat requests, replies and per-user history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erp_assistant_core::{ChatRole, ChatSource, Department};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub department: Option<String>,
    pub username: Option<String>,
}

/// Reply returned by the chat responder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub source: ChatSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_history_id: Option<String>,
}

impl ChatReply {
    #[must_use]
    pub const fn new(response: String, source: ChatSource) -> Self {
        Self {
            response,
            source,
            confidence: None,
            chat_history_id: None,
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ChatSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ChatMessage {
    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            source: None,
            confidence: None,
        }
    }

    /// The assistant's side of a reply.
    #[must_use]
    pub fn assistant(reply: &ChatReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.response.clone(),
            timestamp: Utc::now(),
            source: Some(reply.source),
            confidence: reply.confidence,
        }
    }

    /// Greeting that opens every new history.
    #[must_use]
    pub fn welcome(username: &str, department: Option<Department>) -> Self {
        let department = department.map_or("your team", |d| d.as_str());
        Self {
            role: ChatRole::Assistant,
            content: format!(
                "Hello {username}! I'm your AI assistant for {department}. How can I help you today?"
            ),
            timestamp: Utc::now(),
            source: Some(ChatSource::System),
            confidence: None,
        }
    }
}

/// Conversation log for one user in one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatHistory {
    pub user_id: String,
    pub username: String,
    pub department: Option<Department>,
    pub messages: Vec<ChatMessage>,
    pub last_updated: DateTime<Utc>,
}

impl ChatHistory {
    /// History key: `lower(username)_lower(department)`, with `general`
    /// standing in for a missing department.
    #[must_use]
    pub fn user_id_for(username: &str, department: Option<Department>) -> String {
        let department = department.map_or_else(|| "general".to_string(), |d| d.as_str().to_lowercase());
        format!("{}_{department}", username.trim().to_lowercase())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_is_lowercased() {
        assert_eq!(
            ChatHistory::user_id_for("HR_User", Some(Department::Hr)),
            "hr_user_hr"
        );
        assert_eq!(ChatHistory::user_id_for("Bob", None), "bob_general");
    }

    #[test]
    fn test_welcome_message() {
        let msg = ChatMessage::welcome("alice", Some(Department::Finance));
        assert_eq!(
            msg.content,
            "Hello alice! I'm your AI assistant for Finance. How can I help you today?"
        );
        assert_eq!(msg.source, Some(ChatSource::System));
    }

    #[test]
    fn test_reply_omits_empty_optionals() {
        let reply = ChatReply::new("hi".to_string(), ChatSource::Erp);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["source"], "erp");
        assert!(json.get("confidence").is_none());
        assert!(json.get("chat_history_id").is_none());
    }
}
