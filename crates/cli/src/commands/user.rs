//! User management commands.

use erp_assistant_server::models::CreateUserRequest;
use erp_assistant_server::services::UserService;

use super::{CliError, repositories};

/// Create a user with the same validation as `POST /users`.
pub async fn create(
    username: String,
    password: String,
    department: String,
    role: String,
) -> Result<(), CliError> {
    let repos = repositories().await?;
    let users = UserService::new(repos.users);

    let user = users
        .create(CreateUserRequest {
            username: Some(username),
            password: Some(password),
            department: Some(department),
            role: Some(role),
        })
        .await?;

    tracing::info!(
        "Created user {} ({}, {})",
        user.username,
        user.department,
        user.role
    );
    Ok(())
}
