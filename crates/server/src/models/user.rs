//! Application users.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use erp_assistant_core::{Department, Role, Username};

use super::{ValidationError, required};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A user as exposed over the API. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    pub department: Department,
    #[serde(default)]
    pub role: Role,
}

/// Body of `POST /users` before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// A validated user with the plaintext password still to be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user: User,
    pub password: SecretString,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = ValidationError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        let username = Username::parse(req.username.as_deref().map_or("", str::trim))?;
        if username.is_protected_admin() && username.as_str() != Username::ADMIN {
            return Err(ValidationError::ReservedUsername(username.into_inner()));
        }

        let password = req.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let department = Department::parse(&required("department", req.department.as_deref())?)?;

        let role = match req.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(r) => r.parse().map_err(ValidationError::Role)?,
        };

        Ok(Self {
            user: User {
                username,
                department,
                role,
            },
            password: SecretString::from(password),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use erp_assistant_core::UsernameError;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            username: Some("finance_user".to_string()),
            password: Some("password123".to_string()),
            department: Some("Finance".to_string()),
            role: None,
        }
    }

    #[test]
    fn test_valid_request_defaults_to_user_role() {
        let new_user = NewUser::try_from(request()).unwrap();
        assert_eq!(new_user.user.username.as_str(), "finance_user");
        assert_eq!(new_user.user.role, Role::User);
    }

    #[test]
    fn test_short_username_rejected() {
        let mut req = request();
        req.username = Some("ab".to_string());
        assert_eq!(
            NewUser::try_from(req).unwrap_err(),
            ValidationError::Username(UsernameError::TooShort { min: 3 })
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request();
        req.password = Some("short".to_string());
        let err = NewUser::try_from(req).unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_bad_role_rejected() {
        let mut req = request();
        req.role = Some("owner".to_string());
        assert!(matches!(
            NewUser::try_from(req).unwrap_err(),
            ValidationError::Role(_)
        ));
    }

    #[test]
    fn test_user_json_has_no_password() {
        let new_user = NewUser::try_from(request()).unwrap();
        let json = serde_json::to_value(&new_user.user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_admin_case_variant_reserved() {
        let mut req = request();
        req.username = Some("Admin".to_string());
        assert_eq!(
            NewUser::try_from(req).unwrap_err(),
            ValidationError::ReservedUsername("Admin".to_string())
        );

        let mut req = request();
        req.username = Some("admin".to_string());
        assert!(NewUser::try_from(req).is_ok());
    }
}
