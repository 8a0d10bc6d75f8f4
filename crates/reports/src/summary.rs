use serde::Serialize;

use stockbook_actor::ActorProfile;
use stockbook_catalog::Catalog;
use stockbook_inventory::{LotBook, LotState};

/// Whole-history financial summary for one actor.
///
/// `sold` values units at retail price, `personal` at distributor price;
/// both profit figures use the per-unit margin (RP − DP), which may be
/// negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleSummary {
    pub invested: i64,
    pub purchased: i64,
    pub sold: i64,
    pub personal: i64,
    pub profit_realized: i64,
    pub profit_foregone: i64,
    /// `profit_realized / sales_target`. A fresh actor has no target yet;
    /// the ratio is defined as 0 until one is set, never NaN.
    pub achievement_ratio: f64,
}

/// Fold the inventory and actor state into a [`LifecycleSummary`].
///
/// Pure and idempotent. Lots whose product is missing from the catalog are
/// skipped.
pub fn lifecycle_summary(actor: &ActorProfile, lots: &LotBook, catalog: &Catalog) -> LifecycleSummary {
    let mut sold = 0i64;
    let mut personal = 0i64;
    let mut profit_realized = 0i64;
    let mut profit_foregone = 0i64;

    for lot in lots.lots() {
        let Some(product) = catalog.try_get(lot.product_id()) else {
            continue;
        };
        let margin = product.unit_margin() * lot.quantity();

        match lot.state() {
            LotState::Sold => {
                sold += product.retail_price() * lot.quantity();
                profit_realized += margin;
            }
            LotState::Personal => {
                personal += product.distributor_price() * lot.quantity();
                profit_foregone += margin;
            }
            LotState::Held => {}
        }
    }

    let achievement_ratio = if actor.sales_target() == 0 {
        0.0
    } else {
        profit_realized as f64 / actor.sales_target() as f64
    };

    LifecycleSummary {
        invested: actor.capital_invested(),
        purchased: actor.capital_spent(),
        sold,
        personal,
        profit_realized,
        profit_foregone,
        achievement_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockbook_core::{ActorId, LotId, ProductId};
    use stockbook_inventory::InventoryLot;

    #[test]
    fn summary_values_sold_at_retail_and_personal_at_cost() {
        let product =
            stockbook_catalog::Product::new(ProductId::new(), "Drink", "Health", 1800, 2450, 25)
                .unwrap();
        let pid = product.id_typed();
        let catalog = Catalog::from_products([product]);

        let mut actor = ActorProfile::new(ActorId::new(), "Jane", 100_000, 500_000).unwrap();
        actor.apply_spend(18_000);

        let mut book = LotBook::new();
        book.apply_insert(InventoryLot::new_held(LotId::new(), pid, 6, Utc::now()));
        let sold_lot = LotId::new();
        book.apply_insert(InventoryLot::new_held(sold_lot, pid, 4, Utc::now()));
        let fact = book
            .plan_move(sold_lot, LotState::Sold, 4, "shop order", LotId::new(), Utc::now())
            .unwrap();
        book.apply_move(&fact);

        let summary = lifecycle_summary(&actor, &book, &catalog);
        assert_eq!(summary.invested, 100_000);
        assert_eq!(summary.purchased, 18_000);
        assert_eq!(summary.sold, 4 * 2450);
        assert_eq!(summary.profit_realized, 4 * (2450 - 1800));
        assert_eq!(summary.personal, 0);
        assert_eq!(summary.profit_foregone, 0);
    }

    #[test]
    fn zero_sales_target_yields_zero_ratio() {
        let actor = ActorProfile::new(ActorId::new(), "Jane", 100_000, 0).unwrap();
        let summary = lifecycle_summary(&actor, &LotBook::new(), &Catalog::new());
        assert_eq!(summary.achievement_ratio, 0.0);
        assert!(summary.achievement_ratio.is_finite());
    }

    #[test]
    fn lots_without_catalog_product_are_skipped() {
        let actor = ActorProfile::new(ActorId::new(), "Jane", 100_000, 0).unwrap();
        let mut book = LotBook::new();
        let lot = LotId::new();
        book.apply_insert(InventoryLot::new_held(lot, ProductId::new(), 3, Utc::now()));
        let fact = book
            .plan_move(lot, LotState::Sold, 3, "note", LotId::new(), Utc::now())
            .unwrap();
        book.apply_move(&fact);

        let summary = lifecycle_summary(&actor, &book, &Catalog::new());
        assert_eq!(summary.sold, 0);
        assert_eq!(summary.profit_realized, 0);
    }
}
