//! Bulk export and import of users and FAQs.

use std::collections::HashSet;

use tracing::{info, instrument};

use thiserror::Error;

use crate::db::{Repositories, RepositoryError};
use crate::models::{DataExport, DataImport, ImportSummary, ValidationError};
use crate::services::auth::{AuthError, hash_password};
use crate::services::chat::KnowledgeBase;

/// Password given to every imported user; exports never carry passwords.
pub const DEFAULT_IMPORT_PASSWORD: &str = "password123";

/// Errors from export or import.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The payload repeats a FAQ id or username.
    #[error("{0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct DataService {
    repos: Repositories,
    knowledge: KnowledgeBase,
}

impl DataService {
    #[must_use]
    pub const fn new(repos: Repositories, knowledge: KnowledgeBase) -> Self {
        Self { repos, knowledge }
    }

    /// Snapshot of users, FAQs and escalations.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Repository` if any collection cannot be read.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<DataExport, DataError> {
        Ok(DataExport {
            users: self.repos.users.list().await?,
            faqs: self.repos.faqs.list().await?,
            escalations: self.repos.escalations.list().await?,
        })
    }

    /// Replace FAQs and every non-admin user with the payload.
    ///
    /// An `admin` entry in the payload (any letter case) is skipped; the
    /// stored admin is kept with its password. The payload is checked in full
    /// before anything is written, and both collections are replaced together.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Validation` when a FAQ has a blank question or
    /// answer or a non-positive id, `DataError::Duplicate` when the payload
    /// repeats a FAQ id or username, and `Repository` errors from the store.
    #[instrument(skip(self, data), fields(users = data.users.len(), faqs = data.faqs.len()))]
    pub async fn import(&self, data: DataImport) -> Result<ImportSummary, DataError> {
        let mut faq_ids = HashSet::new();
        for faq in &data.faqs {
            if faq.id.as_i32() <= 0 {
                return Err(ValidationError::NonPositiveId(faq.id.as_i32()).into());
            }
            if faq.question.trim().is_empty() {
                return Err(ValidationError::Required("question").into());
            }
            if faq.answer.trim().is_empty() {
                return Err(ValidationError::Required("answer").into());
            }
            if !faq_ids.insert(faq.id) {
                return Err(DataError::Duplicate(format!("duplicate FAQ id {}", faq.id)));
            }
        }

        let imported: Vec<_> = data
            .users
            .into_iter()
            .filter(|user| !user.username.is_protected_admin())
            .collect();
        let mut usernames = HashSet::new();
        for user in &imported {
            if !usernames.insert(user.username.as_str()) {
                return Err(DataError::Duplicate(format!(
                    "duplicate username {}",
                    user.username
                )));
            }
        }

        let password_hash = hash_password(DEFAULT_IMPORT_PASSWORD)?;
        let users: Vec<_> = imported
            .into_iter()
            .map(|user| (user, password_hash.clone()))
            .collect();

        self.repos.dataset.replace_dataset(&data.faqs, &users).await?;
        self.knowledge.invalidate();

        let summary = ImportSummary {
            users: users.len(),
            faqs: data.faqs.len(),
        };
        info!(users = summary.users, faqs = summary.faqs, "Data imported");
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Faq, User};
    use erp_assistant_core::{Department, FaqId, Role, Username};

    fn user(name: &str, role: Role) -> User {
        User {
            username: Username::parse(name).unwrap(),
            department: Department::Admin,
            role,
        }
    }

    fn faq(id: i32, question: &str) -> Faq {
        Faq {
            id: FaqId::new(id),
            question: question.to_string(),
            answer: "See the finance portal.".to_string(),
            department: Department::Finance,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_import_replaces_and_keeps_admin() {
        let repos = Repositories::in_memory();
        repos
            .users
            .create(&user("admin", Role::Admin), "admin-hash")
            .await
            .unwrap();
        repos
            .users
            .create(&user("old_user", Role::User), "old-hash")
            .await
            .unwrap();

        let data = DataService::new(repos.clone(), KnowledgeBase::new(repos.faqs.clone()));
        let summary = data
            .import(DataImport {
                users: vec![user("admin", Role::User), user("new_user", Role::User)],
                faqs: vec![faq(7, "How are invoices approved?")],
            })
            .await
            .unwrap();
        assert_eq!(summary, ImportSummary { users: 1, faqs: 1 });

        let export = data.export().await.unwrap();
        let names: Vec<&str> = export.users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["admin", "new_user"]);
        assert_eq!(export.users[0].role, Role::Admin);
        assert_eq!(export.faqs[0].id, FaqId::new(7));

        let (_, admin_hash) = repos
            .users
            .find_credentials(&Username::parse("admin").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin_hash, "admin-hash");
    }

    #[tokio::test]
    async fn test_import_rejects_blank_answer() {
        let repos = Repositories::in_memory();
        let data = DataService::new(repos.clone(), KnowledgeBase::new(repos.faqs.clone()));
        let mut bad = faq(1, "Question?");
        bad.answer = " ".to_string();

        let err = data
            .import(DataImport {
                users: Vec::new(),
                faqs: vec![bad],
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation(ValidationError::Required("answer"))
        ));
    }

    #[tokio::test]
    async fn test_failed_import_leaves_store_unchanged() {
        let repos = Repositories::in_memory();
        let data = DataService::new(repos.clone(), KnowledgeBase::new(repos.faqs.clone()));
        data.import(DataImport {
            users: vec![user("kept_user", Role::User)],
            faqs: vec![faq(1, "Original")],
        })
        .await
        .unwrap();

        let err = data
            .import(DataImport {
                users: vec![user("dup_user", Role::User), user("dup_user", Role::User)],
                faqs: vec![faq(9, "Replacement")],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Duplicate(_)));

        let export = data.export().await.unwrap();
        let questions: Vec<&str> = export.faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(questions, vec!["Original"]);
        assert_eq!(export.users[0].username.as_str(), "kept_user");

        let err = data
            .import(DataImport {
                users: Vec::new(),
                faqs: vec![faq(2, "First"), faq(2, "Second")],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Duplicate(_)));
        assert_eq!(data.export().await.unwrap().faqs.len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_non_positive_id() {
        let repos = Repositories::in_memory();
        let data = DataService::new(repos.clone(), KnowledgeBase::new(repos.faqs.clone()));
        for id in [0, -4] {
            let err = data
                .import(DataImport {
                    users: Vec::new(),
                    faqs: vec![faq(id, "Question?")],
                })
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DataError::Validation(ValidationError::NonPositiveId(n)) if n == id
            ));
        }
    }

    #[tokio::test]
    async fn test_import_skips_admin_case_variants() {
        let repos = Repositories::in_memory();
        let data = DataService::new(repos.clone(), KnowledgeBase::new(repos.faqs.clone()));
        let summary = data
            .import(DataImport {
                users: vec![user("Admin", Role::User), user("ops_user", Role::User)],
                faqs: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(summary.users, 1);
    }
}
