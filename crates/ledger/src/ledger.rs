use serde::{Deserialize, Serialize};

use stockbook_core::ActorId;
use stockbook_inventory::InventoryLot;

use crate::transaction::PurchaseTransaction;

/// Fact: a purchase was confirmed. Carries the frozen transaction plus the
/// held lots it creates, so applying it touches ledger, inventory, catalog
/// pool and actor spend in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecorded {
    pub transaction: PurchaseTransaction,
    pub lots: Vec<InventoryLot>,
}

/// Append-only sequence of purchase transactions.
///
/// Transactions are created once and never mutated or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLedger {
    transactions: Vec<PurchaseTransaction>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[PurchaseTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Running total of `total_paid` across an actor's transactions.
    ///
    /// The actor profile's `capital_spent` must equal this at all times.
    pub fn total_paid_by(&self, actor: ActorId) -> i64 {
        self.transactions
            .iter()
            .filter(|tx| tx.actor_id() == actor)
            .map(PurchaseTransaction::total_paid)
            .sum()
    }

    pub fn apply_append(&mut self, transaction: PurchaseTransaction) {
        self.transactions.push(transaction);
    }
}
