use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{ActorId, Entity, ProductId, TransactionId};

/// One line of a purchase: product + quantity. Prices are not stored on the
/// line; the transaction freezes its totals instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// An immutable purchase from the central stock pool.
///
/// `total_paid` (at distributor price) and `total_retail` (at retail price)
/// are frozen at purchase time and never recomputed, even if catalog prices
/// change later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTransaction {
    id: TransactionId,
    actor_id: ActorId,
    items: Vec<LineItem>,
    total_paid: i64,
    total_retail: i64,
    occurred_at: DateTime<Utc>,
}

impl PurchaseTransaction {
    pub fn new(
        id: TransactionId,
        actor_id: ActorId,
        items: Vec<LineItem>,
        total_paid: i64,
        total_retail: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            actor_id,
            items,
            total_paid,
            total_retail,
            occurred_at,
        }
    }

    pub fn id_typed(&self) -> TransactionId {
        self.id
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of quantity × distributor price at purchase time.
    pub fn total_paid(&self) -> i64 {
        self.total_paid
    }

    /// Sum of quantity × retail price at purchase time.
    pub fn total_retail(&self) -> i64 {
        self.total_retail
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl Entity for PurchaseTransaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
