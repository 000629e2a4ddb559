//! FAQ CRUD over HTTP.

#![allow(clippy::unwrap_used)]

use erp_assistant_integration_tests::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_seeded_faqs_listed() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get_json("/faqs").await;
    assert_eq!(status, 200);

    let faqs = body.as_array().unwrap();
    assert_eq!(faqs.len(), 4);
    assert_eq!(faqs[0]["id"], 1);
    assert_eq!(faqs[0]["question"], "How do I request vacation time?");
    assert_eq!(faqs[0]["department"], "HR");
}

#[tokio::test]
async fn test_create_then_delete() {
    let server = TestServer::spawn().await;

    let (status, created) = server
        .post_json(
            "/api/faqs",
            &json!({
                "question": "Where is the VPN guide?",
                "answer": "On the IT wiki under Remote Access.",
                "department": "IT",
                "tags": ["vpn"]
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(created["id"], 5);

    let (status, body) = server.delete("/faqs/5").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "FAQ deleted successfully");

    let (status, body) = server.delete("/faqs/5").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "FAQ not found");
}

#[tokio::test]
async fn test_create_requires_fields() {
    let server = TestServer::spawn().await;
    let (status, body) = server
        .post_json("/faqs", &json!({"question": "   ", "answer": "x", "department": "HR"}))
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("question"));
}

#[tokio::test]
async fn test_new_faq_answers_chat() {
    let server = TestServer::spawn().await;
    let question = "Where is the VPN guide?";

    let (_, reply) = server
        .post_json("/chat", &json!({"message": question, "department": "IT"}))
        .await;
    assert_eq!(reply["source"], "escalated");

    server
        .post_json(
            "/faqs",
            &json!({
                "question": question,
                "answer": "On the IT wiki under Remote Access.",
                "department": "IT"
            }),
        )
        .await;

    // The cached miss is dropped by the write
    let (_, reply) = server
        .post_json("/chat", &json!({"message": question, "department": "IT"}))
        .await;
    assert_eq!(reply["source"], "knowledge_base");
    assert_eq!(reply["response"], "On the IT wiki under Remote Access.");
    assert_eq!(reply["confidence"], 1.0);
}

#[tokio::test]
async fn test_department_metrics_follow_faqs() {
    let server = TestServer::spawn().await;
    let (status, body) = server.get_json("/api/metrics/department-metrics").await;
    assert_eq!(status, 200);

    let finance = body
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["department"] == "Finance")
        .unwrap();
    assert_eq!(finance["queries"], 2);
}
