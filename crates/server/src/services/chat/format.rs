//! Text templates for chat replies.

use chrono::NaiveDate;

use super::providers::{
    CashFlowProjection, GstFiling, InventoryItem, PurchaseOrder, ReceivablesAging, Reconciliation,
    SalesSummary,
};

pub const HELP_TEXT: &str = "I can help you with:
- Inventory information (try \"Check inventory for Widget A\")
- Sales data (try \"Show me sales for this month\")
- GST information (try \"What's my GST status?\")
- Purchase orders (try \"List pending purchase orders\")
- Financial reports (try \"Show me the receivables aging report\")";

pub const FALLBACK_TEXT: &str = "I'm not sure I understand. Try asking about inventory, sales, GST returns, purchase orders, or financial reports. Type 'help' for more information.";

/// Format an amount as rupees with comma thousands grouping: `₹1,234,567`.
#[must_use]
pub fn rupees(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('₹');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Short month/day/year date, e.g. `10/17/2026`.
fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn bullet_list<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| format!("- {}", line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn inventory(items: &[InventoryItem]) -> String {
    let lines = items.iter().map(|item| {
        format!(
            "{} ({}): {} units in {}",
            item.name, item.sku, item.quantity, item.location
        )
    });
    format!("Here's your current inventory status:\n\n{}", bullet_list(lines))
}

#[must_use]
pub fn stockouts(names: &[String]) -> String {
    format!(
        "Based on our records, the products with the highest stockout frequency last month were:\n\n{}\n\nRecommendation: Consider increasing safety stock for these items.",
        bullet_list(names)
    )
}

#[must_use]
pub fn sales(summary: &SalesSummary) -> String {
    format!(
        "Sales Summary for {}:\n\n\
         - Current month: {}\n\
         - Previous month ({}): {}\n\
         - Year to date: {}\n\
         - Month-over-month growth: {:.1}%\n\
         - Top performing products: {}",
        summary.month,
        rupees(summary.current_month_total),
        summary.previous_month,
        rupees(summary.previous_month_total),
        rupees(summary.year_to_date),
        summary.growth_percent,
        summary.top_products.join(", ")
    )
}

#[must_use]
pub fn gst_filing(filing: &GstFiling) -> String {
    format!(
        "GST Information:\n\n\
         - Last return filed: {}\n\
         - Next filing due: {}\n\
         - Pending input credit: {}\n\
         - Pending output liability: {}",
        iso_date(filing.last_filed),
        iso_date(filing.next_due),
        rupees(filing.pending_input_credit),
        rupees(filing.pending_output_liability)
    )
}

#[must_use]
pub fn reconciliation(status: &Reconciliation) -> String {
    format!(
        "GSTR-2B Reconciliation Status:\n\
         - Status: {}\n\
         - Matched Invoices: {} out of {}\n\
         - Pending Queries: {}\n\
         - Last Updated: {}",
        status.status.as_str(),
        status.matched_invoices,
        status.total_invoices,
        status.pending_queries,
        short_date(status.last_updated)
    )
}

#[must_use]
pub fn purchase_orders(orders: &[PurchaseOrder]) -> String {
    let lines = orders.iter().map(|po| {
        format!(
            "{} | {} | {} | Date: {} | Status: {}",
            po.id,
            po.supplier,
            rupees(po.amount),
            iso_date(po.date),
            po.status.as_str()
        )
    });
    format!("Purchase Orders:\n\n{}", bullet_list(lines))
}

#[must_use]
pub fn receivables(aging: &ReceivablesAging) -> String {
    let buckets = [
        ("Current", aging.current),
        ("1-30 days", aging.days_1_30),
        ("31-60 days", aging.days_31_60),
        ("61-90 days", aging.days_61_90),
        (">90 days", aging.over_90),
    ];
    format!(
        "Receivables Aging Report (as of {}):\n\n{}\n\nTotal Receivables: {}",
        short_date(aging.as_of),
        bullet_list(
            buckets
                .iter()
                .map(|(label, amount)| format!("{label}: {}", rupees(*amount)))
        ),
        rupees(aging.total)
    )
}

#[must_use]
pub fn cash_flow(projection: &CashFlowProjection) -> String {
    format!(
        "Cash Flow Projection ({} to {}):\n\n\
         - Starting Balance: {}\n\
         - Projected Inflows: {}\n\
         - Projected Outflows: {}\n\
         - Projected Net Position: {}\n\n\
         Highest upcoming expense: Vendor payments on {}",
        short_date(projection.from),
        short_date(projection.to),
        rupees(projection.starting_balance),
        rupees(projection.inflows),
        rupees(projection.outflows),
        rupees(projection.net_position),
        short_date(projection.highest_expense_date)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::chat::providers::{PurchaseOrderStatus, ReconciliationStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rupees_grouping() {
        assert_eq!(rupees(0), "₹0");
        assert_eq!(rupees(999), "₹999");
        assert_eq!(rupees(1_000), "₹1,000");
        assert_eq!(rupees(123_456), "₹123,456");
        assert_eq!(rupees(1_234_567), "₹1,234,567");
    }

    #[test]
    fn test_inventory_lines() {
        let items = vec![InventoryItem {
            sku: "SKU-123".to_string(),
            name: "Widget A".to_string(),
            quantity: 120,
            location: "Warehouse 2".to_string(),
        }];
        assert_eq!(
            inventory(&items),
            "Here's your current inventory status:\n\n- Widget A (SKU-123): 120 units in Warehouse 2"
        );
    }

    #[test]
    fn test_stockouts_text() {
        let text = stockouts(&["Security Module".to_string(), "Widget D Pro".to_string()]);
        assert!(text.contains("\n- Security Module\n- Widget D Pro\n"));
        assert!(text.ends_with("Consider increasing safety stock for these items."));
    }

    #[test]
    fn test_sales_text() {
        let summary = SalesSummary {
            month: "October".to_string(),
            previous_month: "September".to_string(),
            current_month_total: 250_000,
            previous_month_total: 200_000,
            year_to_date: 2_500_000,
            growth_percent: 7.3,
            top_products: vec!["Widget A".into(), "Premium Kit".into(), "Widget C".into()],
        };
        let text = sales(&summary);
        assert!(text.starts_with("Sales Summary for October:\n\n- Current month: ₹250,000"));
        assert!(text.contains("- Previous month (September): ₹200,000"));
        assert!(text.contains("- Month-over-month growth: 7.3%"));
        assert!(text.ends_with("Top performing products: Widget A, Premium Kit, Widget C"));
    }

    #[test]
    fn test_reconciliation_text() {
        let text = reconciliation(&Reconciliation {
            status: ReconciliationStatus::InProgress,
            matched_invoices: 52,
            total_invoices: 71,
            pending_queries: 3,
            last_updated: date(2026, 10, 7),
        });
        assert_eq!(
            text,
            "GSTR-2B Reconciliation Status:\n- Status: In Progress\n- Matched Invoices: 52 out of 71\n- Pending Queries: 3\n- Last Updated: 10/7/2026"
        );
    }

    #[test]
    fn test_purchase_order_line() {
        let text = purchase_orders(&[PurchaseOrder {
            id: "PO-2024-517".to_string(),
            supplier: "Acme Corp".to_string(),
            amount: 12_500,
            date: date(2026, 10, 1),
            status: PurchaseOrderStatus::OnHold,
        }]);
        assert_eq!(
            text,
            "Purchase Orders:\n\n- PO-2024-517 | Acme Corp | ₹12,500 | Date: 2026-10-01 | Status: On Hold"
        );
    }

    #[test]
    fn test_receivables_total_line() {
        let text = receivables(&ReceivablesAging {
            as_of: date(2026, 10, 17),
            current: 100_000,
            days_1_30: 50_000,
            days_31_60: 20_000,
            days_61_90: 10_000,
            over_90: 5_000,
            total: 185_000,
        });
        assert!(text.starts_with("Receivables Aging Report (as of 10/17/2026):\n\n- Current: ₹100,000"));
        assert!(text.contains("- >90 days: ₹5,000\n\nTotal Receivables: ₹185,000"));
    }
}
