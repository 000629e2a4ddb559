//! One-shot local chat.

use std::io::Write;

use erp_assistant_server::db::Repositories;
use erp_assistant_server::models::ChatRequest;
use erp_assistant_server::services::{ChatService, ErpProviders, KnowledgeBase, seed_sample_data};

use super::CliError;

/// Answer `message` with an in-memory responder seeded with the sample FAQs.
pub async fn run(message: String, department: Option<String>) -> Result<(), CliError> {
    let repos = Repositories::in_memory();
    seed_sample_data(&repos, false).await?;

    let knowledge = KnowledgeBase::new(repos.faqs.clone());
    let chat = ChatService::new(repos, ErpProviders::random(), knowledge, false);

    let reply = chat
        .respond(ChatRequest {
            message,
            department,
            username: None,
        })
        .await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", reply.response)?;
    match reply.confidence {
        Some(confidence) => writeln!(out, "\n[source: {}, confidence: {confidence:.2}]", reply.source)?,
        None => writeln!(out, "\n[source: {}]", reply.source)?,
    }
    Ok(())
}
