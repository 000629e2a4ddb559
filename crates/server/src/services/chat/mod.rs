//! Chat responder.
//!
//! A message is classified by [`router::classify`]. ERP topics are answered
//! from the provider traits in [`providers`]; anything else is looked up in
//! the department's FAQs and, failing that, escalated. When the request names
//! a user, both sides of the exchange are appended to that user's history.

pub mod format;
pub mod knowledge;
pub mod mock;
pub mod providers;
pub mod router;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use erp_assistant_core::{ChatSource, Department};

use crate::db::{Repositories, RepositoryError};
use crate::models::{ChatHistory, ChatMessage, ChatReply, ChatRequest, NewEscalation, ValidationError};

pub use knowledge::{FaqMatch, KnowledgeBase};
pub use mock::RandomErpData;
pub use providers::{
    FinanceProvider, InventoryProvider, ProviderError, PurchaseOrderProvider, SalesProvider,
    TaxProvider,
};
pub use router::{Topic, classify};

/// Number of items in an inventory snapshot.
const INVENTORY_SNAPSHOT_SIZE: usize = 3;

/// Number of purchase orders listed.
const PURCHASE_ORDER_COUNT: usize = 5;

/// Errors that can occur while building a chat reply.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request itself is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The ERP data sources the responder reads from.
#[derive(Clone)]
pub struct ErpProviders {
    pub inventory: Arc<dyn InventoryProvider>,
    pub sales: Arc<dyn SalesProvider>,
    pub tax: Arc<dyn TaxProvider>,
    pub purchase_orders: Arc<dyn PurchaseOrderProvider>,
    pub finance: Arc<dyn FinanceProvider>,
}

impl ErpProviders {
    /// Every capability backed by [`RandomErpData`].
    #[must_use]
    pub fn random() -> Self {
        let data = Arc::new(RandomErpData);
        Self {
            inventory: data.clone(),
            sales: data.clone(),
            tax: data.clone(),
            purchase_orders: data.clone(),
            finance: data,
        }
    }
}

/// Chat responder wired to its stores and data sources.
#[derive(Clone)]
pub struct ChatService {
    repos: Repositories,
    providers: ErpProviders,
    knowledge: KnowledgeBase,
    escalate_unmatched: bool,
}

impl ChatService {
    #[must_use]
    pub const fn new(
        repos: Repositories,
        providers: ErpProviders,
        knowledge: KnowledgeBase,
        escalate_unmatched: bool,
    ) -> Self {
        Self {
            repos,
            providers,
            knowledge,
            escalate_unmatched,
        }
    }

    /// Answer a chat request.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Validation` for an empty message or an unknown
    /// department, and `Repository`/`Provider` errors when a collaborator fails.
    #[instrument(skip(self, request), fields(department, username))]
    pub async fn respond(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ValidationError::Required("message").into());
        }

        let department = request
            .department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(Department::parse)
            .transpose()
            .map_err(ValidationError::from)?;
        let username = request
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let span = tracing::Span::current();
        if let Some(department) = department {
            span.record("department", department.as_str());
        }
        if let Some(username) = username {
            span.record("username", username);
        }

        if let Some(department) = department {
            self.repos.query_metrics.increment(department).await?;
        }

        let mut reply = self.answer(message, department, username).await?;
        info!(source = %reply.source, "Chat reply ready");

        if let Some(username) = username {
            let user_id = ChatHistory::user_id_for(username, department);
            let exchange = vec![ChatMessage::user(message), ChatMessage::assistant(&reply)];
            self.repos
                .chat_history
                .append(
                    &user_id,
                    username,
                    department,
                    ChatMessage::welcome(username, department),
                    exchange,
                )
                .await?;
            reply.chat_history_id = Some(user_id);
        }

        Ok(reply)
    }

    /// Build the reply for a message without touching history or metrics.
    async fn answer(
        &self,
        message: &str,
        department: Option<Department>,
        username: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let topic = classify(message);
        if topic != Topic::Unknown {
            let text = self.render_topic(topic, Utc::now().date_naive()).await?;
            return Ok(ChatReply::new(text, ChatSource::Erp));
        }

        if let Some(department) = department
            && let Some(hit) = self.knowledge.lookup(department, message).await?
        {
            info!(faq_id = %hit.faq_id, score = hit.score, "Answered from knowledge base");
            let mut reply = ChatReply::new(hit.answer, ChatSource::KnowledgeBase);
            reply.confidence = Some(hit.score);
            return Ok(reply);
        }

        let fallback = format::FALLBACK_TEXT.to_string();
        if !self.escalate_unmatched {
            return Ok(ChatReply::new(fallback, ChatSource::Erp));
        }

        let escalation = self
            .repos
            .escalations
            .create(NewEscalation {
                query: message.to_string(),
                department,
                username: username.map(String::from),
                initial_response: Some(fallback.clone()),
            })
            .await?;
        warn!(escalation_id = %escalation.id, "Query escalated");

        Ok(ChatReply::new(fallback, ChatSource::Escalated))
    }

    /// Render an ERP or help topic as reply text.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Provider` if a data source fails.
    pub async fn render_topic(&self, topic: Topic, today: NaiveDate) -> Result<String, ChatError> {
        let p = &self.providers;
        let text = match topic {
            Topic::OutOfStock => format::stockouts(&p.inventory.frequent_stockouts().await?),
            Topic::Inventory => {
                format::inventory(&p.inventory.stock_levels(INVENTORY_SNAPSHOT_SIZE).await?)
            }
            Topic::Sales => format::sales(&p.sales.monthly_summary(today).await?),
            Topic::GstReconciliation => {
                format::reconciliation(&p.tax.gstr2b_reconciliation(today).await?)
            }
            Topic::GstFiling => format::gst_filing(&p.tax.gst_filing(today).await?),
            Topic::PurchaseOrders => format::purchase_orders(
                &p.purchase_orders
                    .recent_orders(today, PURCHASE_ORDER_COUNT)
                    .await?,
            ),
            Topic::Receivables => format::receivables(&p.finance.receivables_aging(today).await?),
            Topic::CashFlow => format::cash_flow(&p.finance.cash_flow_projection(today).await?),
            Topic::Help => format::HELP_TEXT.to_string(),
            Topic::Unknown => format::FALLBACK_TEXT.to_string(),
        };
        Ok(text)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("escalate_unmatched", &self.escalate_unmatched)
            .finish_non_exhaustive()
    }
}
