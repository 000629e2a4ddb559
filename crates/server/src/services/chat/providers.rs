//! ERP data capabilities the responder draws figures from.
//!
//! Each trait covers one business area. The default implementation is
//! [`RandomErpData`](super::mock::RandomErpData); a real ERP connector only
//! has to implement these traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Failure to obtain ERP figures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("ERP data unavailable: {0}")]
    Unavailable(String),
}

/// Stock level of one catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub location: String,
}

/// Month-level sales figures in rupees.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub month: String,
    pub previous_month: String,
    pub current_month_total: u64,
    pub previous_month_total: u64,
    pub year_to_date: u64,
    pub growth_percent: f64,
    pub top_products: Vec<String>,
}

/// GST return dates and pending amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GstFiling {
    pub last_filed: NaiveDate,
    pub next_due: NaiveDate,
    pub pending_input_credit: u64,
    pub pending_output_liability: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStatus {
    Completed,
    InProgress,
}

impl ReconciliationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
        }
    }
}

/// GSTR-2B reconciliation progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub status: ReconciliationStatus,
    pub matched_invoices: u32,
    pub total_invoices: u32,
    pub pending_queries: u32,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOrderStatus {
    Pending,
    Approved,
    Shipped,
    Delivered,
    OnHold,
}

impl PurchaseOrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Approved,
        Self::Shipped,
        Self::Delivered,
        Self::OnHold,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::OnHold => "On Hold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier: String,
    pub amount: u64,
    pub date: NaiveDate,
    pub status: PurchaseOrderStatus,
}

/// Outstanding receivables by age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivablesAging {
    pub as_of: NaiveDate,
    pub current: u64,
    pub days_1_30: u64,
    pub days_31_60: u64,
    pub days_61_90: u64,
    pub over_90: u64,
    pub total: u64,
}

/// Cash position over the next 30 days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowProjection {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub starting_balance: u64,
    pub inflows: u64,
    pub outflows: u64,
    pub net_position: u64,
    pub highest_expense_date: NaiveDate,
}

#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Current stock for up to `limit` items.
    async fn stock_levels(&self, limit: usize) -> Result<Vec<InventoryItem>, ProviderError>;

    /// Items with the most stockouts last month.
    async fn frequent_stockouts(&self) -> Result<Vec<String>, ProviderError>;
}

#[async_trait]
pub trait SalesProvider: Send + Sync {
    async fn monthly_summary(&self, today: NaiveDate) -> Result<SalesSummary, ProviderError>;
}

#[async_trait]
pub trait TaxProvider: Send + Sync {
    async fn gst_filing(&self, today: NaiveDate) -> Result<GstFiling, ProviderError>;

    async fn gstr2b_reconciliation(&self, today: NaiveDate)
    -> Result<Reconciliation, ProviderError>;
}

#[async_trait]
pub trait PurchaseOrderProvider: Send + Sync {
    async fn recent_orders(
        &self,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PurchaseOrder>, ProviderError>;
}

#[async_trait]
pub trait FinanceProvider: Send + Sync {
    async fn receivables_aging(&self, today: NaiveDate)
    -> Result<ReceivablesAging, ProviderError>;

    async fn cash_flow_projection(
        &self,
        today: NaiveDate,
    ) -> Result<CashFlowProjection, ProviderError>;
}
