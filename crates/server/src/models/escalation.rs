//! Escalated queries the assistant could not answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erp_assistant_core::{Department, EscalationId};

/// A stored escalation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Escalation {
    pub id: EscalationId,
    pub query: String,
    pub department: Option<Department>,
    pub username: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub initial_response: Option<String>,
}

/// An escalation awaiting an id.
#[derive(Debug, Clone)]
pub struct NewEscalation {
    pub query: String,
    pub department: Option<Department>,
    pub username: Option<String>,
    pub initial_response: Option<String>,
}

impl NewEscalation {
    /// Attach the id and timestamp assigned by the store.
    #[must_use]
    pub fn into_escalation(self, id: EscalationId, timestamp: DateTime<Utc>) -> Escalation {
        Escalation {
            id,
            query: self.query,
            department: self.department,
            username: self.username,
            timestamp,
            initial_response: self.initial_response,
        }
    }
}
