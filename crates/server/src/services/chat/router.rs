//! Keyword routing for chat messages.
//!
//! Matching is a case-insensitive substring search; the first rule that
//! matches wins.

/// What a chat message is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Items with the most stockouts last month.
    OutOfStock,
    /// Current stock levels.
    Inventory,
    /// Monthly sales summary.
    Sales,
    /// GSTR-2B reconciliation status.
    GstReconciliation,
    /// GST filing dates and pending amounts.
    GstFiling,
    /// Recent purchase orders.
    PurchaseOrders,
    /// Receivables aging buckets.
    Receivables,
    /// 30-day cash flow projection.
    CashFlow,
    /// List of supported topics.
    Help,
    /// Nothing matched.
    Unknown,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a message into a [`Topic`].
#[must_use]
pub fn classify(message: &str) -> Topic {
    let text = message.to_lowercase();

    if contains_any(&text, &["inventory", "stock"]) {
        if contains_any(&text, &["stockout", "out of stock"]) {
            Topic::OutOfStock
        } else {
            Topic::Inventory
        }
    } else if text.contains("sale") {
        Topic::Sales
    } else if contains_any(&text, &["gst", "tax"]) {
        if contains_any(&text, &["gstr-2b", "reconciliation"]) {
            Topic::GstReconciliation
        } else {
            Topic::GstFiling
        }
    } else if contains_any(&text, &["purchase", "order"]) {
        Topic::PurchaseOrders
    } else if contains_any(&text, &["receivables", "aging"]) {
        Topic::Receivables
    } else if contains_any(&text, &["cash flow", "projection"]) {
        Topic::CashFlow
    } else if text.contains("help") {
        Topic::Help
    } else {
        Topic::Unknown
    }
}
