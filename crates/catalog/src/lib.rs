//! Catalog domain module.
//!
//! Products carry the two independently-priced fields (distributor price and
//! retail price) plus the shared stock pool. Catalog changes go through
//! explicit, intention-revealing operations that each produce a fact for the
//! notification sink; nothing diffs collections after the fact.

pub mod catalog;
pub mod product;

pub use catalog::{
    Catalog, LowStockRaised, PriceUpdated, ProductAdded, ProductStatusChanged, Restocked,
    LOW_STOCK_THRESHOLD,
};
pub use product::Product;
