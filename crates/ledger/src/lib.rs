//! Purchase ledger domain module.
//!
//! The ledger is the immutable half of the engine's state: purchases are
//! appended with their totals frozen at the catalog prices of that moment,
//! and every later report derives from them.

pub mod ledger;
pub mod transaction;

pub use ledger::{PurchaseLedger, PurchaseRecorded};
pub use transaction::{LineItem, PurchaseTransaction};
