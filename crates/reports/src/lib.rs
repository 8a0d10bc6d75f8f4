//! Ledger aggregator: pure folds over (ledger, lots, catalog).
//!
//! Every function here is stateless and deterministic: given identical
//! snapshots it produces identical reports, independent of the iteration
//! order of the underlying collections. Nothing is cached.

pub mod history;
pub mod period;
pub mod summary;

pub use history::{lifecycle_history, DailyActivity};
pub use period::{
    period_report, DateRange, PeriodReport, PeriodTotals, PersonalRow, PurchaseRow, SoldRow,
};
pub use summary::{lifecycle_summary, LifecycleSummary};
