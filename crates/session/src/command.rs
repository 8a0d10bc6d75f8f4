//! Engine commands.
//!
//! Every id a successful command will need is allocated by the caller and
//! carried on the command itself. Handling is thereby a pure function of
//! (state, command), which keeps replays and tests deterministic.

use chrono::{DateTime, Utc};

use stockbook_catalog::Product;
use stockbook_core::{LotId, ProductId, TransactionId};
use stockbook_inventory::LotState;

/// One requested purchase line, with the id of the held lot it will create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub lot_id: LotId,
}

/// Buy units out of the central stock pool, atomically across all lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub transaction_id: TransactionId,
    pub lines: Vec<PurchaseLine>,
    pub at: DateTime<Utc>,
}

/// Classify quantity out of a held lot into a terminal state.
///
/// `split_candidate` is only used when the move is partial; a full move keeps
/// the source lot's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLot {
    pub lot_id: LotId,
    pub target: LotState,
    pub quantity: i64,
    pub note: String,
    pub split_candidate: LotId,
    pub at: DateTime<Utc>,
}

/// Add a new product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProduct {
    pub product: Product,
    pub at: DateTime<Utc>,
}

/// Change a product's distributor and retail price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrice {
    pub product_id: ProductId,
    pub distributor_price: i64,
    pub retail_price: i64,
    pub at: DateTime<Utc>,
}

/// Add units back to a product's central stock pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restock {
    pub product_id: ProductId,
    pub additional: i64,
    pub at: DateTime<Utc>,
}

/// Activate or retire a product. Retired products stay in the catalog for
/// reporting but cannot be purchased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetProductStatus {
    pub product_id: ProductId,
    pub active: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Purchase(Purchase),
    MoveLot(MoveLot),
    AddProduct(AddProduct),
    UpdatePrice(UpdatePrice),
    Restock(Restock),
    SetProductStatus(SetProductStatus),
}
