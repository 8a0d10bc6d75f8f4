use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{EngineError, EngineResult, LotId, ProductId};

use crate::lot::{InventoryLot, LotState};

/// Fact: quantity moved out of a held lot into a terminal state.
///
/// `split_into` is `Some` for a partial move (a new lot was created with the
/// moved quantity) and `None` for a full move (the source lot changed state in
/// place, keeping its id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotMoved {
    pub lot_id: LotId,
    pub product_id: ProductId,
    pub target: LotState,
    pub quantity: i64,
    pub note: String,
    pub split_into: Option<LotId>,
    pub occurred_at: DateTime<Utc>,
}

/// All inventory lots of the session, keyed by lot id.
///
/// Lots are created by purchases (state `held`) or by partial-move splits,
/// mutated only through [`LotBook::apply_move`], and logically destroyed when
/// their quantity reaches zero: read views never surface a zero-quantity lot.
///
/// Backed by a `BTreeMap` so iteration order is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotBook {
    lots: BTreeMap<LotId, InventoryLot>,
}

impl LotBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lots(lots: impl IntoIterator<Item = InventoryLot>) -> Self {
        Self {
            lots: lots.into_iter().map(|l| (l.id_typed(), l)).collect(),
        }
    }

    /// Live lots in canonical (id) order. Zero-quantity lots are filtered out
    /// of every read view.
    pub fn lots(&self) -> impl Iterator<Item = &InventoryLot> {
        self.lots.values().filter(|l| l.quantity() > 0)
    }

    pub fn in_state(&self, state: LotState) -> impl Iterator<Item = &InventoryLot> {
        self.lots().filter(move |l| l.state() == state)
    }

    pub fn try_get(&self, id: LotId) -> Option<&InventoryLot> {
        self.lots.get(&id).filter(|l| l.quantity() > 0)
    }

    pub fn get(&self, id: LotId) -> EngineResult<&InventoryLot> {
        self.try_get(id).ok_or(EngineError::UnknownLot(id))
    }

    /// Total units of `product` across all lifecycle states.
    ///
    /// Classification moves partition quantities without creating or
    /// destroying them, so for any product this always equals the total
    /// quantity ever purchased of it.
    pub fn quantity_of_product(&self, product: ProductId) -> i64 {
        self.lots()
            .filter(|l| l.product_id() == product)
            .map(InventoryLot::quantity)
            .sum()
    }

    /// Record a purchase-created held lot.
    pub fn apply_insert(&mut self, lot: InventoryLot) {
        self.lots.insert(lot.id_typed(), lot);
    }

    /// Validation half of the classification move. Never mutates.
    ///
    /// `split_candidate` is the id the new lot will take if the move turns
    /// out to be partial; the caller allocates it up front so this stays
    /// deterministic under an injected id allocator.
    pub fn plan_move(
        &self,
        lot_id: LotId,
        target: LotState,
        quantity: i64,
        note: &str,
        split_candidate: LotId,
        at: DateTime<Utc>,
    ) -> EngineResult<LotMoved> {
        let lot = self.get(lot_id)?;

        if !target.is_terminal() {
            return Err(EngineError::invalid_transition(
                lot.state().label(),
                target.label(),
            ));
        }
        if lot.state() != LotState::Held {
            return Err(EngineError::invalid_transition(
                lot.state().label(),
                target.label(),
            ));
        }
        if quantity <= 0 || quantity > lot.quantity() {
            return Err(EngineError::invalid_quantity(quantity, lot.quantity()));
        }
        if note.trim().is_empty() {
            return Err(EngineError::MissingJustification);
        }

        let split_into = (quantity < lot.quantity()).then_some(split_candidate);

        Ok(LotMoved {
            lot_id,
            product_id: lot.product_id(),
            target,
            quantity,
            note: note.trim().to_string(),
            split_into,
            occurred_at: at,
        })
    }

    /// Mutation half of the classification move.
    pub fn apply_move(&mut self, fact: &LotMoved) {
        match fact.split_into {
            None => {
                if let Some(lot) = self.lots.get_mut(&fact.lot_id) {
                    lot.classify(fact.target, fact.note.clone(), fact.occurred_at);
                }
            }
            Some(new_id) => {
                if let Some(source) = self.lots.get_mut(&fact.lot_id) {
                    source.reduce(fact.quantity);
                }
                self.apply_insert(InventoryLot::new_classified(
                    new_id,
                    fact.product_id,
                    fact.quantity,
                    fact.target,
                    fact.note.clone(),
                    fact.occurred_at,
                ));
                // A lot whose quantity reached zero is destroyed, never kept
                // as a zero-quantity record.
                if self
                    .lots
                    .get(&fact.lot_id)
                    .is_some_and(|l| l.quantity() == 0)
                {
                    self.lots.remove(&fact.lot_id);
                }
            }
        }
    }
}
