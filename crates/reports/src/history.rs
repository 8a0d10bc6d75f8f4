use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use stockbook_catalog::Catalog;
use stockbook_inventory::{LotBook, LotState};
use stockbook_ledger::PurchaseLedger;

/// One calendar date's activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub purchased: i64,
    pub sold: i64,
    pub personal: i64,
    pub profit_realized: i64,
    pub profit_foregone: i64,
}

impl DailyActivity {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            purchased: 0,
            sold: 0,
            personal: 0,
            profit_realized: 0,
            profit_foregone: 0,
        }
    }
}

/// Date-bucketed lifecycle history, newest date first.
///
/// Transactions bucket by purchase date; lots bucket by the date of their
/// *last state change*, so a lot sold today counts toward today even if it
/// was purchased weeks ago. Dates with no activity produce no bucket.
pub fn lifecycle_history(
    ledger: &PurchaseLedger,
    lots: &LotBook,
    catalog: &Catalog,
) -> Vec<DailyActivity> {
    let mut buckets: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();

    for tx in ledger.transactions() {
        let date = tx.occurred_at().date_naive();
        buckets
            .entry(date)
            .or_insert_with(|| DailyActivity::empty(date))
            .purchased += tx.total_paid();
    }

    for lot in lots.lots() {
        let Some(product) = catalog.try_get(lot.product_id()) else {
            continue;
        };
        let date = lot.state_changed_at().date_naive();
        let margin = product.unit_margin() * lot.quantity();
        let bucket = buckets
            .entry(date)
            .or_insert_with(|| DailyActivity::empty(date));

        match lot.state() {
            LotState::Sold => {
                bucket.sold += product.retail_price() * lot.quantity();
                bucket.profit_realized += margin;
            }
            LotState::Personal => {
                bucket.personal += product.distributor_price() * lot.quantity();
                bucket.profit_foregone += margin;
            }
            LotState::Held => {}
        }
    }

    buckets.into_values().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stockbook_core::{ActorId, LotId, ProductId, TransactionId};
    use stockbook_inventory::InventoryLot;
    use stockbook_ledger::{LineItem, PurchaseTransaction};

    #[test]
    fn buckets_are_per_date_and_sorted_descending() {
        let product =
            stockbook_catalog::Product::new(ProductId::new(), "Drink", "Health", 100, 150, 50)
                .unwrap();
        let pid = product.id_typed();
        let catalog = Catalog::from_products([product]);
        let actor = ActorId::new();

        let day1 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();

        let mut ledger = PurchaseLedger::new();
        ledger.apply_append(PurchaseTransaction::new(
            TransactionId::new(),
            actor,
            vec![LineItem {
                product_id: pid,
                quantity: 10,
            }],
            1000,
            1500,
            day1,
        ));

        // Lot purchased on day 1, sold on day 2: counts toward day 2.
        let lot = LotId::new();
        let mut book = LotBook::new();
        book.apply_insert(InventoryLot::new_held(lot, pid, 10, day1));
        let fact = book
            .plan_move(lot, LotState::Sold, 10, "order", LotId::new(), day2)
            .unwrap();
        book.apply_move(&fact);

        let history = lifecycle_history(&ledger, &book, &catalog);
        assert_eq!(history.len(), 2);

        assert_eq!(history[0].date, day2.date_naive());
        assert_eq!(history[0].sold, 1500);
        assert_eq!(history[0].profit_realized, 500);
        assert_eq!(history[0].purchased, 0);

        assert_eq!(history[1].date, day1.date_naive());
        assert_eq!(history[1].purchased, 1000);
        assert_eq!(history[1].sold, 0);
    }

    #[test]
    fn no_bucket_for_dates_without_activity() {
        let history = lifecycle_history(&PurchaseLedger::new(), &LotBook::new(), &Catalog::new());
        assert!(history.is_empty());
    }
}
