use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_catalog::{LowStockRaised, PriceUpdated, ProductAdded, ProductStatusChanged, Restocked};
use stockbook_events::Event;
use stockbook_inventory::LotMoved;
use stockbook_ledger::PurchaseRecorded;

/// Everything that can happen to a session, as one event stream.
///
/// Each variant wraps the fact produced by the owning domain crate; this enum
/// only adds the stream-level identity ([`Event`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    PurchaseRecorded(PurchaseRecorded),
    LowStockRaised(LowStockRaised),
    LotMoved(LotMoved),
    ProductAdded(ProductAdded),
    PriceUpdated(PriceUpdated),
    Restocked(Restocked),
    ProductStatusChanged(ProductStatusChanged),
}

impl Event for EngineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::PurchaseRecorded(_) => "ledger.purchase.recorded",
            Self::LowStockRaised(_) => "catalog.stock.low",
            Self::LotMoved(_) => "inventory.lot.moved",
            Self::ProductAdded(_) => "catalog.product.added",
            Self::PriceUpdated(_) => "catalog.price.updated",
            Self::Restocked(_) => "catalog.stock.restocked",
            Self::ProductStatusChanged(_) => "catalog.product.status",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::PurchaseRecorded(fact) => fact.transaction.occurred_at(),
            Self::LowStockRaised(fact) => fact.occurred_at,
            Self::LotMoved(fact) => fact.occurred_at,
            Self::ProductAdded(fact) => fact.occurred_at,
            Self::PriceUpdated(fact) => fact.occurred_at,
            Self::Restocked(fact) => fact.occurred_at,
            Self::ProductStatusChanged(fact) => fact.occurred_at,
        }
    }
}
