//! Engine error model.

use thiserror::Error;

use crate::id::{LotId, ProductId};

/// Result type used across the engine crates.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Every variant is a deterministic validation failure on a single operation:
/// none corrupts state, none is retried automatically, and each carries enough
/// context for the host to render a user-facing message. There is no fatal
/// error class in this subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A purchase line requested more units than the stock pool holds.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// The purchase total exceeds the actor's remaining capital.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// A move quantity was non-positive or exceeded the lot's quantity.
    #[error("invalid quantity: requested {requested}, available {available}")]
    InvalidQuantity { requested: i64, available: i64 },

    /// A lifecycle move was submitted without a justification note.
    #[error("a justification note is required for inventory moves")]
    MissingJustification,

    /// The requested lifecycle transition is not allowed.
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// A referenced product does not exist in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A referenced inventory lot does not exist.
    #[error("unknown lot: {0}")]
    UnknownLot(LotId),

    /// A value failed validation (e.g. empty name, negative price).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn invalid_quantity(requested: i64, available: i64) -> Self {
        Self::InvalidQuantity {
            requested,
            available,
        }
    }
}
