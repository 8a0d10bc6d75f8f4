//! The session aggregate and its host shell.
//!
//! [`Session`] is the single aggregate: one actor's catalog, lot book,
//! purchase ledger and capital, evolved exclusively through
//! [`EngineEvent`]s. [`Engine`] wraps it with id allocation, notification
//! rendering and the read-side operations (reports and CSV exports).

pub mod command;
pub mod engine;
pub mod event;
pub mod session;
pub mod snapshot;

pub use command::{
    AddProduct, EngineCommand, MoveLot, Purchase, PurchaseLine, Restock, SetProductStatus,
    UpdatePrice,
};
pub use engine::Engine;
pub use event::EngineEvent;
pub use session::Session;
pub use snapshot::Snapshot;
