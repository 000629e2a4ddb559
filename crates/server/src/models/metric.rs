//! Read-only metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erp_assistant_core::Department;

/// FAQ count for one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentMetric {
    pub department: Department,
    pub queries: i64,
}

/// Number of chat queries that named a department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetric {
    pub department: Department,
    pub count: i64,
    pub last_updated: DateTime<Utc>,
}
