//! Property checks over randomized operation sequences.

use chrono::Utc;
use proptest::prelude::*;

use stockbook_actor::ActorProfile;
use stockbook_catalog::Product;
use stockbook_core::{ActorId, ProductId};
use stockbook_inventory::LotState;
use stockbook_session::Engine;

const POOL: i64 = 1_000;

fn engine_with_pool() -> (Engine, ProductId) {
    let actor = ActorProfile::new(ActorId::new(), "Jane", 10_000_000, 0).unwrap();
    let mut engine = Engine::new(actor);
    let product = Product::new(ProductId::new(), "Drink", "Health", 1800, 2450, POOL).unwrap();
    let id = product.id_typed();
    engine.add_product(product, Utc::now()).unwrap();
    (engine, id)
}

proptest! {
    #[test]
    fn spend_always_equals_the_ledger_total(quantities in prop::collection::vec(1i64..=20, 1..10)) {
        let (mut engine, product_id) = engine_with_pool();

        let mut purchased_units = 0;
        for qty in quantities {
            engine.purchase(&[(product_id, qty)], Utc::now()).unwrap();
            purchased_units += qty;
        }

        let snap = engine.snapshot();
        let actor_id = snap.actor.id_typed();
        prop_assert_eq!(snap.actor.capital_spent(), snap.ledger.total_paid_by(actor_id));
        prop_assert_eq!(snap.lots.quantity_of_product(product_id), purchased_units);
        prop_assert_eq!(snap.catalog.get(product_id).unwrap().stock(), POOL - purchased_units);
    }

    #[test]
    fn moves_never_create_or_destroy_units(
        purchases in prop::collection::vec(1i64..=20, 1..6),
        moves in prop::collection::vec((0usize..6, 1i64..=20, prop::bool::ANY), 0..10),
    ) {
        let (mut engine, product_id) = engine_with_pool();

        let mut purchased_units = 0;
        for qty in &purchases {
            engine.purchase(&[(product_id, *qty)], Utc::now()).unwrap();
            purchased_units += qty;
        }

        for (pick, qty, sell) in moves {
            let target = if sell { LotState::Sold } else { LotState::Personal };
            let held: Vec<_> = engine
                .session()
                .lots()
                .in_state(LotState::Held)
                .map(|l| (l.id_typed(), l.quantity()))
                .collect();
            if held.is_empty() {
                break;
            }
            let (lot_id, available) = held[pick % held.len()];
            let quantity = qty.min(available);
            engine
                .move_lot(lot_id, target, quantity, "spot check", Utc::now())
                .unwrap();

            prop_assert_eq!(
                engine.session().lots().quantity_of_product(product_id),
                purchased_units
            );
        }

        let summary = engine.summary();
        prop_assert_eq!(summary.profit_realized, 650 * summary.sold / 2450);
        prop_assert_eq!(summary.purchased, 1800 * purchased_units);
    }
}
