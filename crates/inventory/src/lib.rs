//! Inventory domain module: the lot lifecycle state machine.
//!
//! Pure, deterministic domain logic (no IO, no HTTP, no storage). Moves are
//! split into a validation half that produces a fact and a mutation half that
//! applies it, so a rejected move can never leave partial state behind.

pub mod book;
pub mod lot;

pub use book::{LotBook, LotMoved};
pub use lot::{InventoryLot, LotState};
