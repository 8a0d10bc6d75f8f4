//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities (products, lots, transactions) are compared by identifier, not by
/// attribute values: a lot keeps its identity through a full lifecycle move
/// even though its state and timestamp change.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
