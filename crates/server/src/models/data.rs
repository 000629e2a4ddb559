//! Bulk export and import payloads.

use serde::{Deserialize, Serialize};

use super::{Escalation, Faq, User};

/// Snapshot of the store without password hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataExport {
    pub users: Vec<User>,
    pub faqs: Vec<Faq>,
    pub escalations: Vec<Escalation>,
}

/// Payload accepted by the importer. Escalations are ignored on import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataImport {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: usize,
    pub faqs: usize,
}
