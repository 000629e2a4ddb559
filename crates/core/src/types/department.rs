//! Organizational departments.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a department name is not one of the fixed set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("department must be one of: HR, Sales, Finance, IT, Marketing, Admin (got '{0}')")]
pub struct DepartmentError(pub String);

/// An organizational category used to scope FAQs, users and metrics.
///
/// Parsing is case-insensitive; the canonical spelling is used for display
/// and serialization.
///
/// ```
/// use erp_assistant_core::Department;
///
/// assert_eq!(Department::parse("hr").unwrap(), Department::Hr);
/// assert_eq!(Department::Finance.to_string(), "Finance");
/// assert!(Department::parse("Legal").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "erp.department"))]
#[serde(try_from = "String", into = "String")]
pub enum Department {
    #[cfg_attr(feature = "postgres", sqlx(rename = "HR"))]
    Hr,
    #[cfg_attr(feature = "postgres", sqlx(rename = "Sales"))]
    Sales,
    #[cfg_attr(feature = "postgres", sqlx(rename = "Finance"))]
    Finance,
    #[cfg_attr(feature = "postgres", sqlx(rename = "IT"))]
    It,
    #[cfg_attr(feature = "postgres", sqlx(rename = "Marketing"))]
    Marketing,
    #[cfg_attr(feature = "postgres", sqlx(rename = "Admin"))]
    Admin,
}

impl Department {
    /// Every department, in display order.
    pub const ALL: [Self; 6] = [
        Self::Hr,
        Self::Sales,
        Self::Finance,
        Self::It,
        Self::Marketing,
        Self::Admin,
    ];

    /// Parse a department name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DepartmentError` if the name is not a known department.
    pub fn parse(s: &str) -> Result<Self, DepartmentError> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DepartmentError(s.to_owned()))
    }

    /// Canonical name of the department.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::Sales => "Sales",
            Self::Finance => "Finance",
            Self::It => "IT",
            Self::Marketing => "Marketing",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Department {
    type Err = DepartmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Department {
    type Error = DepartmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Department::parse("SALES").unwrap(), Department::Sales);
        assert_eq!(Department::parse(" it ").unwrap(), Department::It);
        assert_eq!(Department::parse("marketing").unwrap(), Department::Marketing);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = Department::parse("Legal").unwrap_err();
        assert!(err.to_string().contains("Legal"));
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Department::Hr).unwrap();
        assert_eq!(json, "\"HR\"");

        let parsed: Department = serde_json::from_str("\"finance\"").unwrap();
        assert_eq!(parsed, Department::Finance);

        assert!(serde_json::from_str::<Department>("\"Legal\"").is_err());
    }
}
