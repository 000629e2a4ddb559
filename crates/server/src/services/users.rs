//! User management.

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, instrument};

use erp_assistant_core::Username;

use crate::db::{RepositoryError, UserRepository};
use crate::models::{CreateUserRequest, NewUser, User, ValidationError};
use crate::services::auth::{AuthError, hash_password};

/// Errors from user management.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("The admin user cannot be deleted")]
    ProtectedAdmin,

    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// User CRUD on top of a [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// All users, without passwords.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list().await?)
    }

    /// Validate and store a new user. Nothing is written when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Validation` for a bad body and
    /// `UserError::UsernameTaken` for a duplicate username.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, UserError> {
        let NewUser { user, password } = NewUser::try_from(request)?;
        let password_hash = hash_password(password.expose_secret())?;

        match self.users.create(&user, &password_hash).await {
            Ok(()) => {
                info!(username = %user.username, department = %user.department, "User created");
                Ok(user)
            }
            Err(RepositoryError::Conflict(_)) => Err(UserError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a user. The `admin` user is refused before any lookup.
    ///
    /// # Errors
    ///
    /// Returns `UserError::ProtectedAdmin` for `admin` and
    /// `UserError::NotFound` when no such user exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str) -> Result<(), UserError> {
        if Username::is_admin_name(username) {
            return Err(UserError::ProtectedAdmin);
        }

        // A name that cannot be a username cannot exist either.
        let username = Username::parse(username.trim()).map_err(|_| UserError::NotFound)?;

        match self.users.delete(&username).await {
            Ok(()) => {
                info!(username = %username, "User deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(UserError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::default()))
    }

    fn request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            department: Some("Sales".to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_short_password_rejected_before_write() {
        let users = service();
        let err = users.create(request("sales_user", "short")).await.unwrap_err();
        assert!(matches!(
            err,
            UserError::Validation(ValidationError::PasswordTooShort { min: 8 })
        ));
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let users = service();
        users.create(request("sales_user", "password123")).await.unwrap();
        let err = users
            .create(request("sales_user", "password456"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_delete() {
        let users = service();
        users.create(request("sales_user", "password123")).await.unwrap();
        users.delete("sales_user").await.unwrap();
        assert!(matches!(
            users.delete("sales_user").await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(users.delete("x").await, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_admin_never_deleted() {
        let users = service();
        assert!(matches!(
            users.delete("admin").await,
            Err(UserError::ProtectedAdmin)
        ));
        assert!(matches!(
            users.delete("ADMIN").await,
            Err(UserError::ProtectedAdmin)
        ));
    }

    #[tokio::test]
    async fn test_admin_case_variant_cannot_be_created() {
        let users = service();
        let err = users
            .create(request("Admin", "long enough pw"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UserError::Validation(ValidationError::ReservedUsername(_))
        ));
        assert!(users.list().await.unwrap().is_empty());
    }
}
