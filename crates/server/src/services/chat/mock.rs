//! Randomly generated ERP figures.
//!
//! Every call draws fresh uniform values, so two identical questions get
//! different numbers.

use async_trait::async_trait;
use chrono::{Datelike, Days, Months, NaiveDate};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::providers::{
    CashFlowProjection, FinanceProvider, GstFiling, InventoryItem, InventoryProvider,
    ProviderError, PurchaseOrder, PurchaseOrderProvider, PurchaseOrderStatus, ReceivablesAging,
    Reconciliation, ReconciliationStatus, SalesProvider, SalesSummary, TaxProvider,
};

/// GST returns fall due on this day of the month.
const GST_DUE_DAY: u32 = 20;

struct CatalogItem {
    sku: &'static str,
    name: &'static str,
    /// Half-open quantity range.
    quantity: (u32, u32),
    locations: &'static [&'static str],
}

const CATALOG: [CatalogItem; 5] = [
    CatalogItem {
        sku: "SKU-123",
        name: "Widget A",
        quantity: (70, 500),
        locations: &["Warehouse 1", "Warehouse 2"],
    },
    CatalogItem {
        sku: "SKU-456",
        name: "Widget B",
        quantity: (70, 500),
        locations: &["Warehouse 1", "Warehouse 2"],
    },
    CatalogItem {
        sku: "SKU-789",
        name: "Widget C",
        quantity: (70, 500),
        locations: &["Warehouse 1", "Warehouse 2"],
    },
    CatalogItem {
        sku: "SKU-101",
        name: "Premium Kit",
        quantity: (50, 250),
        locations: &["Warehouse 1", "Warehouse 3"],
    },
    CatalogItem {
        sku: "SKU-202",
        name: "Enterprise Bundle",
        quantity: (20, 120),
        locations: &["Warehouse 3"],
    },
];

const STOCKOUT_ITEMS: [&str; 5] = [
    "Widget D Pro",
    "Enterprise Toolkit",
    "Premium Connector",
    "Security Module",
    "Analytics Package",
];

const SUPPLIERS: [&str; 5] = [
    "Acme Corp",
    "XYZ Supplies",
    "Global Parts Inc",
    "Tech Solutions Ltd",
    "Quality Vendors",
];

/// Uniformly random ERP data for demos and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomErpData;

fn out_of_range(what: &str) -> ProviderError {
    ProviderError::Unavailable(format!("{what} is out of the supported date range"))
}

/// Last filing date and next due date for GST returns.
///
/// Returns are filed on the 20th: the last one in the previous month, the
/// next one this month, or next month once the 20th has passed.
#[must_use]
pub fn gst_due_dates(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let last_filed = today
        .checked_sub_months(Months::new(1))?
        .with_day(GST_DUE_DAY)?;
    let due_month = if today.day() > GST_DUE_DAY {
        today.checked_add_months(Months::new(1))?
    } else {
        today
    };
    Some((last_filed, due_month.with_day(GST_DUE_DAY)?))
}

fn pick_stock_levels(limit: usize) -> Vec<InventoryItem> {
    let mut rng = rand::rng();
    let mut items: Vec<&CatalogItem> = CATALOG.iter().collect();
    items.shuffle(&mut rng);

    items
        .into_iter()
        .take(limit)
        .map(|item| InventoryItem {
            sku: item.sku.to_string(),
            name: item.name.to_string(),
            quantity: rng.random_range(item.quantity.0..item.quantity.1),
            location: item
                .locations
                .choose(&mut rng)
                .copied()
                .unwrap_or("Warehouse 1")
                .to_string(),
        })
        .collect()
}

fn pick_stockouts() -> Vec<String> {
    let mut rng = rand::rng();
    let mut names = STOCKOUT_ITEMS;
    names.shuffle(&mut rng);
    let count = rng.random_range(2..=3);
    names.iter().take(count).map(|s| (*s).to_string()).collect()
}

#[async_trait]
impl InventoryProvider for RandomErpData {
    async fn stock_levels(&self, limit: usize) -> Result<Vec<InventoryItem>, ProviderError> {
        Ok(pick_stock_levels(limit))
    }

    async fn frequent_stockouts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(pick_stockouts())
    }
}

#[async_trait]
impl SalesProvider for RandomErpData {
    async fn monthly_summary(&self, today: NaiveDate) -> Result<SalesSummary, ProviderError> {
        let previous = today
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| out_of_range("previous month"))?;

        let mut rng = rand::rng();
        let mut names: Vec<&str> = CATALOG.iter().map(|item| item.name).collect();
        names.shuffle(&mut rng);

        Ok(SalesSummary {
            month: today.format("%B").to_string(),
            previous_month: previous.format("%B").to_string(),
            current_month_total: rng.random_range(100_000..400_000),
            previous_month_total: rng.random_range(100_000..400_000),
            year_to_date: rng.random_range(1_000_000..4_000_000),
            growth_percent: rng.random_range(-5.0..15.0),
            top_products: names.into_iter().take(3).map(String::from).collect(),
        })
    }
}

#[async_trait]
impl TaxProvider for RandomErpData {
    async fn gst_filing(&self, today: NaiveDate) -> Result<GstFiling, ProviderError> {
        let (last_filed, next_due) =
            gst_due_dates(today).ok_or_else(|| out_of_range("GST due date"))?;

        let mut rng = rand::rng();
        Ok(GstFiling {
            last_filed,
            next_due,
            pending_input_credit: rng.random_range(20_000..120_000),
            pending_output_liability: rng.random_range(40_000..190_000),
        })
    }

    async fn gstr2b_reconciliation(
        &self,
        today: NaiveDate,
    ) -> Result<Reconciliation, ProviderError> {
        let mut rng = rand::rng();
        let status = if rng.random_bool(0.5) {
            ReconciliationStatus::Completed
        } else {
            ReconciliationStatus::InProgress
        };

        Ok(Reconciliation {
            status,
            matched_invoices: rng.random_range(40..70),
            total_invoices: rng.random_range(60..80),
            pending_queries: rng.random_range(0..10),
            last_updated: today,
        })
    }
}

#[async_trait]
impl PurchaseOrderProvider for RandomErpData {
    async fn recent_orders(
        &self,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PurchaseOrder>, ProviderError> {
        let mut rng = rand::rng();
        (0..limit)
            .map(|_| {
                let days_ago = rng.random_range(0..30);
                let date = today
                    .checked_sub_days(Days::new(days_ago))
                    .ok_or_else(|| out_of_range("purchase order date"))?;
                Ok(PurchaseOrder {
                    id: format!("PO-2024-{}", rng.random_range(100..1000)),
                    supplier: SUPPLIERS
                        .choose(&mut rng)
                        .copied()
                        .unwrap_or("Acme Corp")
                        .to_string(),
                    amount: rng.random_range(5_000..55_000),
                    date,
                    status: PurchaseOrderStatus::ALL
                        .choose(&mut rng)
                        .copied()
                        .unwrap_or(PurchaseOrderStatus::Pending),
                })
            })
            .collect()
    }
}

#[async_trait]
impl FinanceProvider for RandomErpData {
    async fn receivables_aging(
        &self,
        today: NaiveDate,
    ) -> Result<ReceivablesAging, ProviderError> {
        let mut rng = rand::rng();
        Ok(ReceivablesAging {
            as_of: today,
            current: rng.random_range(100_000..600_000),
            days_1_30: rng.random_range(50_000..350_000),
            days_31_60: rng.random_range(20_000..170_000),
            days_61_90: rng.random_range(10_000..90_000),
            over_90: rng.random_range(5_000..55_000),
            total: rng.random_range(200_000..1_200_000),
        })
    }

    async fn cash_flow_projection(
        &self,
        today: NaiveDate,
    ) -> Result<CashFlowProjection, ProviderError> {
        let to = today
            .checked_add_days(Days::new(30))
            .ok_or_else(|| out_of_range("projection end"))?;

        let mut rng = rand::rng();
        let expense_in = rng.random_range(0..20);
        let highest_expense_date = today
            .checked_add_days(Days::new(expense_in))
            .ok_or_else(|| out_of_range("expense date"))?;

        Ok(CashFlowProjection {
            from: today,
            to,
            starting_balance: rng.random_range(500_000..2_500_000),
            inflows: rng.random_range(200_000..1_200_000),
            outflows: rng.random_range(150_000..950_000),
            net_position: rng.random_range(550_000..2_750_000),
            highest_expense_date,
        })
    }
}
