//! FAQ management. Every write clears the knowledge-base cache.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use erp_assistant_core::FaqId;

use crate::db::{FaqRepository, RepositoryError};
use crate::models::{CreateFaqRequest, Faq, NewFaq, ValidationError};
use crate::services::chat::KnowledgeBase;

/// Errors from FAQ management.
#[derive(Debug, Error)]
pub enum FaqError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("FAQ not found")]
    NotFound,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct FaqService {
    faqs: Arc<dyn FaqRepository>,
    knowledge: KnowledgeBase,
}

impl FaqService {
    #[must_use]
    pub fn new(faqs: Arc<dyn FaqRepository>, knowledge: KnowledgeBase) -> Self {
        Self { faqs, knowledge }
    }

    /// All FAQs ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `FaqError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Faq>, FaqError> {
        Ok(self.faqs.list().await?)
    }

    /// Validate and store a FAQ under the next free id.
    ///
    /// # Errors
    ///
    /// Returns `FaqError::Validation` for a bad body.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateFaqRequest) -> Result<Faq, FaqError> {
        let faq = NewFaq::try_from(request)?;
        let faq = self.faqs.create(faq).await?;
        self.knowledge.invalidate();
        info!(faq_id = %faq.id, department = %faq.department, "FAQ created");
        Ok(faq)
    }

    /// # Errors
    ///
    /// Returns `FaqError::NotFound` when no FAQ has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: FaqId) -> Result<(), FaqError> {
        match self.faqs.delete(id).await {
            Ok(()) => {
                self.knowledge.invalidate();
                info!(faq_id = %id, "FAQ deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(FaqError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use erp_assistant_core::Department;

    fn service() -> FaqService {
        let store = Arc::new(MemoryStore::default());
        FaqService::new(store.clone(), KnowledgeBase::new(store))
    }

    fn request(question: &str) -> CreateFaqRequest {
        CreateFaqRequest {
            question: Some(question.to_string()),
            answer: Some("Ask your manager.".to_string()),
            department: Some("HR".to_string()),
            tags: vec!["leave".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let faqs = service();
        let first = faqs.create(request("How do I apply for leave?")).await.unwrap();
        let second = faqs.create(request("Who approves leave?")).await.unwrap();
        assert_eq!(first.id, FaqId::new(1));
        assert!(second.id > first.id);
        assert_eq!(second.department, Department::Hr);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_question() {
        let faqs = service();
        let err = faqs.create(request("   ")).await.unwrap_err();
        assert!(matches!(
            err,
            FaqError::Validation(ValidationError::Required("question"))
        ));
        assert!(faqs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let faqs = service();
        assert!(matches!(
            faqs.delete(FaqId::new(42)).await,
            Err(FaqError::NotFound)
        ));
    }
}
