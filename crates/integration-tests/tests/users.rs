//! User CRUD and login over HTTP.

#![allow(clippy::unwrap_used)]

use erp_assistant_integration_tests::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_users_listed_without_passwords() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get_json("/users").await;
    assert_eq!(status, 200);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 4);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn test_create_login_delete() {
    let server = TestServer::spawn().await;

    let (status, created) = server
        .post_json(
            "/users",
            &json!({
                "username": "it_user",
                "password": "long enough pw",
                "department": "IT"
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(created["role"], "user");

    let (status, body) = server
        .post_json(
            "/users",
            &json!({"username": "it_user", "password": "long enough pw", "department": "IT"}),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "Username already exists");

    let (status, user) = server
        .post_json("/auth/login", &json!({"username": "it_user", "password": "long enough pw"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(user["department"], "IT");

    let (status, body) = server.delete("/api/users/it_user").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = server.delete("/users/it_user").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_admin_cannot_be_deleted() {
    let server = TestServer::spawn().await;
    for path in ["/users/admin", "/api/users/ADMIN"] {
        let (status, body) = server.delete(path).await;
        assert_eq!(status, 403);
        assert_eq!(body["error"], "The admin user cannot be deleted");
    }
}

#[tokio::test]
async fn test_admin_case_variant_reserved() {
    let server = TestServer::spawn().await;
    let (status, body) = server
        .post_json(
            "/users",
            &json!({"username": "Admin", "password": "long enough pw", "department": "IT"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "username Admin is reserved");
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let server = TestServer::spawn().await;
    let (status, body) = server
        .post_json("/auth/login", &json!({"username": "admin", "password": "wrong"}))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, user) = server
        .post_json("/auth/login", &json!({"username": "admin", "password": "admin123"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(user["role"], "admin");
}
