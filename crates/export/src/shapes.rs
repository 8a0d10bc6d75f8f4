//! Row builders for the canonical export shapes.

use stockbook_catalog::Catalog;
use stockbook_inventory::InventoryLot;
use stockbook_ledger::PurchaseTransaction;
use stockbook_reports::{DailyActivity, PeriodReport, PersonalRow, PurchaseRow, SoldRow};

use crate::table::Row;

/// Invoice line items for one purchase: product, quantity, unit/subtotal at
/// both distributor and retail price. Lines whose product has left the
/// catalog are skipped.
pub fn invoice_rows(tx: &PurchaseTransaction, catalog: &Catalog) -> Vec<Row> {
    tx.items()
        .iter()
        .filter_map(|item| {
            let product = catalog.try_get(item.product_id)?;
            Some(
                Row::new()
                    .with("Product Name", product.name())
                    .with("Quantity", item.quantity)
                    .with("Unit DP", product.distributor_price())
                    .with("Subtotal DP", product.distributor_price() * item.quantity)
                    .with("Unit RP", product.retail_price())
                    .with("Subtotal RP", product.retail_price() * item.quantity),
            )
        })
        .collect()
}

/// Inventory snapshot rows, typically pre-filtered to one lifecycle state.
pub fn inventory_rows<'a>(
    lots: impl IntoIterator<Item = &'a InventoryLot>,
    catalog: &Catalog,
) -> Vec<Row> {
    lots.into_iter()
        .filter_map(|lot| {
            let product = catalog.try_get(lot.product_id())?;
            Some(
                Row::new()
                    .with("Product", product.name())
                    .with("Qty", lot.quantity())
                    .with("Dist. Price", product.distributor_price())
                    .with("Ret. Price", product.retail_price())
                    .with("Subtotal", product.distributor_price() * lot.quantity())
                    .with("Status", lot.state())
                    .with("Note", lot.note().unwrap_or("")),
            )
        })
        .collect()
}

/// Lifecycle history rows: one per active date, invested repeated per row.
pub fn history_rows(invested: i64, history: &[DailyActivity]) -> Vec<Row> {
    history
        .iter()
        .map(|day| {
            Row::new()
                .with("Date", day.date)
                .with("Total Invested", invested)
                .with("Purchased", day.purchased)
                .with("Sold", day.sold)
                .with("Personal", day.personal)
                .with("Profit Realized", day.profit_realized)
                .with("Profit Foregone", day.profit_foregone)
        })
        .collect()
}

/// Which detail view of a period report to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodView {
    Sold,
    Personal,
    Purchases,
}

/// Rows for one detail view of a period report.
pub fn period_report_rows(report: &PeriodReport, view: PeriodView) -> Vec<Row> {
    match view {
        PeriodView::Sold => sold_report_rows(&report.sold),
        PeriodView::Personal => personal_report_rows(&report.personal),
        PeriodView::Purchases => purchase_report_rows(&report.purchases),
    }
}

/// Period report, sales view.
pub fn sold_report_rows(rows: &[SoldRow]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            Row::new()
                .with("Date", row.date)
                .with("Product", &row.product)
                .with("Qty", row.quantity)
                .with("Purchase", row.cost)
                .with("Profit", row.profit)
        })
        .collect()
}

/// Period report, personal-consumption view.
pub fn personal_report_rows(rows: &[PersonalRow]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            Row::new()
                .with("Date", row.date)
                .with("Product", &row.product)
                .with("Qty", row.quantity)
                .with("Price", row.cost)
                .with("Lost Profit", row.foregone)
        })
        .collect()
}

/// Period report, purchase-log view.
pub fn purchase_report_rows(rows: &[PurchaseRow]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            Row::new()
                .with("Date", row.date)
                .with("ID", row.transaction_id)
                .with("Items", row.item_count)
                .with("Total Paid", row.total_paid)
        })
        .collect()
}
