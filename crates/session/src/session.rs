use std::collections::BTreeMap;

use stockbook_actor::ActorProfile;
use stockbook_catalog::{Catalog, LowStockRaised, LOW_STOCK_THRESHOLD};
use stockbook_core::{ActorId, Aggregate, AggregateRoot, EngineError, EngineResult, Entity};
use stockbook_inventory::{InventoryLot, LotBook};
use stockbook_ledger::{LineItem, PurchaseLedger, PurchaseRecorded, PurchaseTransaction};

use crate::command::{EngineCommand, Purchase};
use crate::event::EngineEvent;
use crate::snapshot::Snapshot;

/// The single aggregate: one actor's catalog, inventory, ledger and capital.
///
/// Commands that span several collections (a purchase touches all four) are
/// still one decision here, so either every effect lands or none does.
/// `handle` never mutates; a rejected command provably leaves the snapshot
/// byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    actor: ActorProfile,
    catalog: Catalog,
    lots: LotBook,
    ledger: PurchaseLedger,
    version: u64,
}

impl Session {
    pub fn new(actor: ActorProfile) -> Self {
        Self {
            actor,
            catalog: Catalog::new(),
            lots: LotBook::new(),
            ledger: PurchaseLedger::new(),
            version: 0,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            actor: snapshot.actor,
            catalog: snapshot.catalog,
            lots: snapshot.lots,
            ledger: snapshot.ledger,
            version: 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            actor: self.actor.clone(),
            catalog: self.catalog.clone(),
            lots: self.lots.clone(),
            ledger: self.ledger.clone(),
        }
    }

    pub fn actor(&self) -> &ActorProfile {
        &self.actor
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn lots(&self) -> &LotBook {
        &self.lots
    }

    pub fn ledger(&self) -> &PurchaseLedger {
        &self.ledger
    }

    /// Decide a purchase: validate every line against the pool, the whole
    /// total against available capital, and freeze both totals at the prices
    /// in effect right now.
    fn handle_purchase(&self, cmd: &Purchase) -> EngineResult<Vec<EngineEvent>> {
        if cmd.lines.is_empty() {
            return Err(EngineError::validation("purchase has no lines"));
        }

        let mut requested: BTreeMap<_, i64> = BTreeMap::new();
        for line in &cmd.lines {
            if line.quantity <= 0 {
                return Err(EngineError::validation(
                    "purchase quantity must be positive",
                ));
            }
            *requested.entry(line.product_id).or_default() += line.quantity;
        }

        // Lines for the same product draw from one pool, so availability is
        // checked on the per-product sum.
        let mut total_paid = 0;
        let mut total_retail = 0;
        for (&product_id, &quantity) in &requested {
            let product = self.catalog.ensure_available(product_id, quantity)?;
            total_paid += product.distributor_price() * quantity;
            total_retail += product.retail_price() * quantity;
        }
        self.actor.ensure_funds(total_paid)?;

        let lots = cmd
            .lines
            .iter()
            .map(|line| InventoryLot::new_held(line.lot_id, line.product_id, line.quantity, cmd.at))
            .collect();
        let transaction = PurchaseTransaction::new(
            cmd.transaction_id,
            self.actor.id_typed(),
            cmd.lines
                .iter()
                .map(|line| LineItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
            total_paid,
            total_retail,
            cmd.at,
        );

        let mut events = vec![EngineEvent::PurchaseRecorded(PurchaseRecorded {
            transaction,
            lots,
        })];
        for (&product_id, &quantity) in &requested {
            let product = self.catalog.get(product_id)?;
            let remaining = product.stock() - quantity;
            if remaining < LOW_STOCK_THRESHOLD {
                events.push(EngineEvent::LowStockRaised(LowStockRaised {
                    product_id,
                    product_name: product.name().to_string(),
                    remaining,
                    occurred_at: cmd.at,
                }));
            }
        }
        Ok(events)
    }
}

impl AggregateRoot for Session {
    type Id = ActorId;

    fn id(&self) -> &Self::Id {
        self.actor.id()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Session {
    type Command = EngineCommand;
    type Event = EngineEvent;
    type Error = EngineError;

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            EngineCommand::Purchase(cmd) => self.handle_purchase(cmd),
            EngineCommand::MoveLot(cmd) => {
                let fact = self.lots.plan_move(
                    cmd.lot_id,
                    cmd.target,
                    cmd.quantity,
                    &cmd.note,
                    cmd.split_candidate,
                    cmd.at,
                )?;
                Ok(vec![EngineEvent::LotMoved(fact)])
            }
            EngineCommand::AddProduct(cmd) => {
                let fact = self.catalog.stage_add(cmd.product.clone(), cmd.at)?;
                Ok(vec![EngineEvent::ProductAdded(fact)])
            }
            EngineCommand::UpdatePrice(cmd) => {
                let fact = self.catalog.stage_update_price(
                    cmd.product_id,
                    cmd.distributor_price,
                    cmd.retail_price,
                    cmd.at,
                )?;
                Ok(vec![EngineEvent::PriceUpdated(fact)])
            }
            EngineCommand::Restock(cmd) => {
                let fact = self
                    .catalog
                    .stage_restock(cmd.product_id, cmd.additional, cmd.at)?;
                Ok(vec![EngineEvent::Restocked(fact)])
            }
            EngineCommand::SetProductStatus(cmd) => {
                let fact = self
                    .catalog
                    .stage_set_active(cmd.product_id, cmd.active, cmd.at)?;
                Ok(vec![EngineEvent::ProductStatusChanged(fact)])
            }
        }
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            EngineEvent::PurchaseRecorded(fact) => {
                for item in fact.transaction.items() {
                    self.catalog.apply_deduction(item.product_id, item.quantity);
                }
                for lot in &fact.lots {
                    self.lots.apply_insert(lot.clone());
                }
                self.actor.apply_spend(fact.transaction.total_paid());
                self.ledger.apply_append(fact.transaction.clone());
            }
            EngineEvent::LowStockRaised(_) => {}
            EngineEvent::LotMoved(fact) => self.lots.apply_move(fact),
            EngineEvent::ProductAdded(fact) => self.catalog.apply_add(fact),
            EngineEvent::PriceUpdated(fact) => self.catalog.apply_update_price(fact),
            EngineEvent::Restocked(fact) => self.catalog.apply_restock(fact),
            EngineEvent::ProductStatusChanged(fact) => self.catalog.apply_set_active(fact),
        }
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockbook_catalog::Product;
    use stockbook_core::{LotId, ProductId, TransactionId};
    use stockbook_inventory::LotState;

    use crate::command::{MoveLot, PurchaseLine};

    fn session_with_product(stock: i64) -> (Session, ProductId) {
        let actor = ActorProfile::new(ActorId::new(), "Jane", 100_000, 500_000).unwrap();
        let mut session = Session::new(actor);
        let product =
            Product::new(ProductId::new(), "Health Drink", "Health Care", 1800, 2450, stock)
                .unwrap();
        let id = product.id_typed();
        let events = session
            .handle(&EngineCommand::AddProduct(crate::command::AddProduct {
                product,
                at: Utc::now(),
            }))
            .unwrap();
        for event in &events {
            session.apply(event);
        }
        (session, id)
    }

    fn purchase(product_id: ProductId, quantity: i64) -> EngineCommand {
        EngineCommand::Purchase(Purchase {
            transaction_id: TransactionId::new(),
            lines: vec![PurchaseLine {
                product_id,
                quantity,
                lot_id: LotId::new(),
            }],
            at: Utc::now(),
        })
    }

    fn run(session: &mut Session, command: &EngineCommand) -> EngineResult<Vec<EngineEvent>> {
        let events = session.handle(command)?;
        for event in &events {
            session.apply(event);
        }
        Ok(events)
    }

    #[test]
    fn purchase_moves_value_through_all_four_collections() {
        let (mut session, product_id) = session_with_product(25);
        run(&mut session, &purchase(product_id, 10)).unwrap();

        assert_eq!(session.catalog().get(product_id).unwrap().stock(), 15);
        assert_eq!(session.actor().capital_spent(), 18_000);
        assert_eq!(session.actor().available_capital(), 82_000);
        assert_eq!(session.ledger().len(), 1);

        let tx = &session.ledger().transactions()[0];
        assert_eq!(tx.total_paid(), 18_000);
        assert_eq!(tx.total_retail(), 24_500);

        let held: Vec<_> = session.lots().in_state(LotState::Held).collect();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].quantity(), 10);
    }

    #[test]
    fn rejected_purchase_leaves_state_untouched() {
        let (mut session, product_id) = session_with_product(15);
        let before = session.snapshot();

        let err = run(&mut session, &purchase(product_id, 30)).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock { .. }));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.catalog().get(product_id).unwrap().stock(), 15);
    }

    #[test]
    fn purchase_beyond_capital_is_rejected_whole() {
        let actor = ActorProfile::new(ActorId::new(), "Jane", 1_000, 0).unwrap();
        let mut session = Session::new(actor);
        let product =
            Product::new(ProductId::new(), "Health Drink", "Health Care", 1800, 2450, 25).unwrap();
        let product_id = product.id_typed();
        run(
            &mut session,
            &EngineCommand::AddProduct(crate::command::AddProduct {
                product,
                at: Utc::now(),
            }),
        )
        .unwrap();
        let before = session.snapshot();

        let err = run(&mut session, &purchase(product_id, 2)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientFunds {
                required: 3_600,
                available: 1_000,
            }
        );
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn split_lines_of_one_product_share_the_pool() {
        let (mut session, product_id) = session_with_product(10);
        let command = EngineCommand::Purchase(Purchase {
            transaction_id: TransactionId::new(),
            lines: vec![
                PurchaseLine {
                    product_id,
                    quantity: 6,
                    lot_id: LotId::new(),
                },
                PurchaseLine {
                    product_id,
                    quantity: 6,
                    lot_id: LotId::new(),
                },
            ],
            at: Utc::now(),
        });

        let err = run(&mut session, &command).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientStock {
                requested: 12,
                available: 10,
                ..
            }
        ));
    }

    #[test]
    fn purchase_below_threshold_also_raises_low_stock() {
        let (mut session, product_id) = session_with_product(7);
        let events = run(&mut session, &purchase(product_id, 4)).unwrap();

        assert_eq!(events.len(), 2);
        match &events[1] {
            EngineEvent::LowStockRaised(fact) => {
                assert_eq!(fact.remaining, 3);
                assert_eq!(fact.product_name, "Health Drink");
            }
            other => panic!("expected LowStockRaised, got {other:?}"),
        }
    }

    #[test]
    fn full_move_keeps_the_lot_id() {
        let (mut session, product_id) = session_with_product(25);
        run(&mut session, &purchase(product_id, 10)).unwrap();
        let lot_id = session.lots().lots().next().unwrap().id_typed();

        run(
            &mut session,
            &EngineCommand::MoveLot(MoveLot {
                lot_id,
                target: LotState::Sold,
                quantity: 10,
                note: "shop order".into(),
                split_candidate: LotId::new(),
                at: Utc::now(),
            }),
        )
        .unwrap();

        let lot = session.lots().get(lot_id).unwrap();
        assert_eq!(lot.state(), LotState::Sold);
        assert_eq!(lot.quantity(), 10);
    }

    #[test]
    fn partial_move_splits_and_conserves_quantity() {
        let (mut session, product_id) = session_with_product(25);
        run(&mut session, &purchase(product_id, 10)).unwrap();
        let lot_id = session.lots().lots().next().unwrap().id_typed();
        let split = LotId::new();

        run(
            &mut session,
            &EngineCommand::MoveLot(MoveLot {
                lot_id,
                target: LotState::Sold,
                quantity: 4,
                note: "shop order".into(),
                split_candidate: split,
                at: Utc::now(),
            }),
        )
        .unwrap();

        assert_eq!(session.lots().get(lot_id).unwrap().quantity(), 6);
        let sold = session.lots().get(split).unwrap();
        assert_eq!(sold.quantity(), 4);
        assert_eq!(sold.state(), LotState::Sold);
        assert_eq!(session.lots().quantity_of_product(product_id), 10);
    }

    #[test]
    fn move_without_note_is_rejected() {
        let (mut session, product_id) = session_with_product(25);
        run(&mut session, &purchase(product_id, 10)).unwrap();
        let lot_id = session.lots().lots().next().unwrap().id_typed();

        let err = run(
            &mut session,
            &EngineCommand::MoveLot(MoveLot {
                lot_id,
                target: LotState::Personal,
                quantity: 2,
                note: "   ".into(),
                split_candidate: LotId::new(),
                at: Utc::now(),
            }),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::MissingJustification);
    }

    #[test]
    fn version_counts_applied_events() {
        let (mut session, product_id) = session_with_product(7);
        assert_eq!(session.version(), 1);

        run(&mut session, &purchase(product_id, 4)).unwrap();
        assert_eq!(session.version(), 3);
    }
}
