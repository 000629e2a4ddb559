//! In-memory store implementing every repository trait.
//!
//! Each collection is guarded by its own `RwLock`. FAQ ids are assigned under
//! the write lock, so concurrent creates never collide. Dataset replacement
//! takes the FAQ lock before the user lock.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use erp_assistant_core::{Department, EscalationId, FaqId, Username};

use super::faqs::FAQ_IDS_EXHAUSTED;
use super::{
    ChatHistoryRepository, DatasetRepository, EscalationRepository, FaqRepository,
    QueryMetricRepository, RepositoryError, UserRepository,
};
use crate::models::{
    ChatHistory, ChatMessage, DepartmentMetric, Escalation, Faq, NewEscalation, NewFaq,
    QueryMetric, User,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    faqs: RwLock<BTreeMap<FaqId, Faq>>,
    users: RwLock<BTreeMap<Username, StoredUser>>,
    escalations: RwLock<Vec<Escalation>>,
    histories: RwLock<HashMap<String, ChatHistory>>,
    query_metrics: RwLock<BTreeMap<Department, QueryMetric>>,
}

#[async_trait]
impl FaqRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Faq>, RepositoryError> {
        Ok(self.faqs.read().await.values().cloned().collect())
    }

    async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Faq>, RepositoryError> {
        Ok(self
            .faqs
            .read()
            .await
            .values()
            .filter(|faq| faq.department == department)
            .cloned()
            .collect())
    }

    async fn create(&self, faq: NewFaq) -> Result<Faq, RepositoryError> {
        let mut faqs = self.faqs.write().await;
        let id = match faqs.keys().next_back() {
            None => FaqId::new(1),
            Some(max) => max
                .checked_next()
                .ok_or_else(|| RepositoryError::Conflict(FAQ_IDS_EXHAUSTED.to_string()))?,
        };
        match faqs.entry(id) {
            Entry::Vacant(slot) => Ok(slot.insert(faq.with_id(id)).clone()),
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "FAQ id {id} already taken"
            ))),
        }
    }

    async fn delete(&self, id: FaqId) -> Result<(), RepositoryError> {
        self.faqs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let len = self.faqs.read().await.len();
        i64::try_from(len).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentMetric>, RepositoryError> {
        let mut counts: BTreeMap<Department, i64> = BTreeMap::new();
        for faq in self.faqs.read().await.values() {
            *counts.entry(faq.department).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(department, queries)| DepartmentMetric {
                department,
                queries,
            })
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .get(username)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone())))
    }

    async fn create(&self, user: &User, password_hash: &str) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::Conflict("Username already exists".to_string()));
        }
        users.insert(
            user.username.clone(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, username: &Username) -> Result<(), RepositoryError> {
        self.users
            .write()
            .await
            .remove(username)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl EscalationRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Escalation>, RepositoryError> {
        Ok(self.escalations.read().await.iter().rev().cloned().collect())
    }

    async fn create(&self, escalation: NewEscalation) -> Result<Escalation, RepositoryError> {
        let mut escalations = self.escalations.write().await;
        let id = match escalations.last() {
            None => EscalationId::new(1),
            Some(last) => last.id.checked_next().ok_or_else(|| {
                RepositoryError::Conflict("No escalation ids left".to_string())
            })?,
        };
        let escalation = escalation.into_escalation(id, Utc::now());
        escalations.push(escalation.clone());
        Ok(escalation)
    }
}

#[async_trait]
impl ChatHistoryRepository for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<ChatHistory>, RepositoryError> {
        Ok(self.histories.read().await.get(user_id).cloned())
    }

    async fn append(
        &self,
        user_id: &str,
        username: &str,
        department: Option<Department>,
        welcome: ChatMessage,
        messages: Vec<ChatMessage>,
    ) -> Result<(), RepositoryError> {
        let mut histories = self.histories.write().await;
        let history = histories
            .entry(user_id.to_string())
            .or_insert_with(|| ChatHistory {
                user_id: user_id.to_string(),
                username: username.to_string(),
                department,
                messages: vec![welcome],
                last_updated: Utc::now(),
            });
        history.messages.extend(messages);
        history.last_updated = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl QueryMetricRepository for MemoryStore {
    async fn increment(&self, department: Department) -> Result<(), RepositoryError> {
        let mut metrics = self.query_metrics.write().await;
        let metric = metrics.entry(department).or_insert_with(|| QueryMetric {
            department,
            count: 0,
            last_updated: Utc::now(),
        });
        metric.count += 1;
        metric.last_updated = Utc::now();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<QueryMetric>, RepositoryError> {
        Ok(self.query_metrics.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl DatasetRepository for MemoryStore {
    async fn replace_dataset(
        &self,
        faqs: &[Faq],
        users: &[(User, String)],
    ) -> Result<(), RepositoryError> {
        let mut faq_store = self.faqs.write().await;
        let mut user_store = self.users.write().await;

        let mut new_faqs = BTreeMap::new();
        for faq in faqs {
            if new_faqs.insert(faq.id, faq.clone()).is_some() {
                return Err(RepositoryError::Conflict(format!("duplicate FAQ id {}", faq.id)));
            }
        }

        let mut new_users: BTreeMap<Username, StoredUser> = user_store
            .iter()
            .filter(|(username, _)| username.is_protected_admin())
            .map(|(username, stored)| (username.clone(), stored.clone()))
            .collect();
        for (user, password_hash) in users {
            let stored = StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            };
            if new_users.insert(user.username.clone(), stored).is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "duplicate username {}",
                    user.username
                )));
            }
        }

        // Both replacements are built before either store changes.
        *faq_store = new_faqs;
        *user_store = new_users;
        Ok(())
    }
}
