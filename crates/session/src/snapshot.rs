use serde::{Deserialize, Serialize};

use stockbook_actor::ActorProfile;
use stockbook_catalog::Catalog;
use stockbook_inventory::LotBook;
use stockbook_ledger::PurchaseLedger;

/// Serializable capture of the whole session state.
///
/// This is the persistence boundary: the host serializes a snapshot after
/// each confirmed operation and restores one at startup. Everything the
/// engine owns round-trips through here; nothing else is durable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub actor: ActorProfile,
    pub catalog: Catalog,
    pub lots: LotBook,
    pub ledger: PurchaseLedger,
}
