use chrono::NaiveDate;
use serde::Serialize;

use stockbook_catalog::Catalog;
use stockbook_core::TransactionId;
use stockbook_inventory::{LotBook, LotState};
use stockbook_ledger::PurchaseLedger;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Detail row for a sold lot inside the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoldRow {
    pub date: NaiveDate,
    pub product: String,
    pub quantity: i64,
    pub cost: i64,
    pub profit: i64,
}

/// Detail row for a personally consumed lot inside the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalRow {
    pub date: NaiveDate,
    pub product: String,
    pub quantity: i64,
    pub cost: i64,
    pub foregone: i64,
}

/// Detail row for a purchase transaction inside the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRow {
    pub date: NaiveDate,
    pub transaction_id: TransactionId,
    pub item_count: usize,
    pub total_paid: i64,
}

/// Range totals across the three views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub total_profit: i64,
    pub total_personal_loss: i64,
    pub revenue: i64,
    pub range_spent: i64,
}

/// Range-filtered report: three detail views plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub range: DateRange,
    pub sold: Vec<SoldRow>,
    pub personal: Vec<PersonalRow>,
    pub purchases: Vec<PurchaseRow>,
    pub totals: PeriodTotals,
}

/// Build the period report for an inclusive date range.
///
/// Lots are admitted by their last-state-change date, transactions by their
/// purchase date. Rows are sorted (date, then product name) so the output
/// does not depend on the iteration order of the underlying collections.
pub fn period_report(
    ledger: &PurchaseLedger,
    lots: &LotBook,
    catalog: &Catalog,
    range: DateRange,
) -> PeriodReport {
    let mut sold = Vec::new();
    let mut personal = Vec::new();

    for lot in lots.lots() {
        let date = lot.state_changed_at().date_naive();
        if !range.contains(date) {
            continue;
        }
        let Some(product) = catalog.try_get(lot.product_id()) else {
            continue;
        };

        let cost = product.distributor_price() * lot.quantity();
        let margin = product.unit_margin() * lot.quantity();

        match lot.state() {
            LotState::Sold => sold.push(SoldRow {
                date,
                product: product.name().to_string(),
                quantity: lot.quantity(),
                cost,
                profit: margin,
            }),
            LotState::Personal => personal.push(PersonalRow {
                date,
                product: product.name().to_string(),
                quantity: lot.quantity(),
                cost,
                foregone: margin,
            }),
            LotState::Held => {}
        }
    }

    sold.sort_by(|a, b| (a.date, &a.product, a.quantity).cmp(&(b.date, &b.product, b.quantity)));
    personal
        .sort_by(|a, b| (a.date, &a.product, a.quantity).cmp(&(b.date, &b.product, b.quantity)));

    let purchases: Vec<PurchaseRow> = ledger
        .transactions()
        .iter()
        .filter(|tx| range.contains(tx.occurred_at().date_naive()))
        .map(|tx| PurchaseRow {
            date: tx.occurred_at().date_naive(),
            transaction_id: tx.id_typed(),
            item_count: tx.items().len(),
            total_paid: tx.total_paid(),
        })
        .collect();

    let total_profit: i64 = sold.iter().map(|r| r.profit).sum();
    let total_personal_loss: i64 = personal.iter().map(|r| r.foregone).sum();
    let revenue: i64 = sold.iter().map(|r| r.cost + r.profit).sum();
    let range_spent: i64 = purchases.iter().map(|r| r.total_paid).sum();

    PeriodReport {
        range,
        sold,
        personal,
        purchases,
        totals: PeriodTotals {
            total_profit,
            total_personal_loss,
            revenue,
            range_spent,
        },
    }
}
