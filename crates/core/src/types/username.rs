//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input is shorter than the minimum length.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input is longer than the maximum length.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("username cannot contain whitespace")]
    Whitespace,
}

/// A login name.
///
/// ## Constraints
///
/// - Length: 3-64 characters
/// - No whitespace
///
/// ## Examples
///
/// ```
/// use erp_assistant_core::Username;
///
/// assert!(Username::parse("hr_user").is_ok());
/// assert!(Username::parse("ab").is_err());
/// assert!(Username::parse("two words").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// The built-in administrator, which can never be deleted.
    pub const ADMIN: &'static str = "admin";

    /// Whether `name` refers to the protected administrator, ignoring ASCII
    /// case and surrounding whitespace.
    #[must_use]
    pub fn is_admin_name(name: &str) -> bool {
        name.trim().eq_ignore_ascii_case(Self::ADMIN)
    }

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is too short, too long, or contains whitespace.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let len = s.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if len > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(UsernameError::Whitespace);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this is the protected administrator account.
    #[must_use]
    pub fn is_protected_admin(&self) -> bool {
        Self::is_admin_name(&self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Username {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Username {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Username {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("admin").is_ok());
        assert!(Username::parse("hr_user").is_ok());
        assert!(Username::parse("abc").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { min: 3 })
        ));
        assert!(matches!(
            Username::parse(""),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_parse_whitespace() {
        assert!(matches!(
            Username::parse("john doe"),
            Err(UsernameError::Whitespace)
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Username = serde_json::from_str("\"sales_user\"").unwrap();
        assert_eq!(ok.as_str(), "sales_user");
        assert!(serde_json::from_str::<Username>("\"x\"").is_err());
    }

    #[test]
    fn test_protected_admin() {
        assert!(Username::parse("admin").unwrap().is_protected_admin());
        assert!(!Username::parse("admin2").unwrap().is_protected_admin());
        assert!(Username::parse("Admin").unwrap().is_protected_admin());
        assert!(Username::is_admin_name(" ADMIN "));
        assert!(!Username::is_admin_name("administrator"));
    }
}
