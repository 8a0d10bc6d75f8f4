use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{Entity, LotId, ProductId};

/// Lifecycle state of an inventory lot.
///
/// `Held` is the only initial state and is entered solely via purchase.
/// `Personal` and `Sold` are terminal and not inter-convertible; nothing ever
/// returns to `Held`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotState {
    Held,
    Personal,
    Sold,
}

impl LotState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LotState::Personal | LotState::Sold)
    }

    pub fn label(self) -> &'static str {
        match self {
            LotState::Held => "held",
            LotState::Personal => "personal",
            LotState::Sold => "sold",
        }
    }
}

impl core::fmt::Display for LotState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A quantity of one product in one lifecycle state.
///
/// The timestamp records the last state change, not creation: bucketing a
/// sold lot into a report date uses the date it was classified as sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLot {
    id: LotId,
    product_id: ProductId,
    quantity: i64,
    state: LotState,
    /// Mandatory once the lot leaves `Held`.
    note: Option<String>,
    state_changed_at: DateTime<Utc>,
}

impl InventoryLot {
    /// A freshly purchased lot, in the initial `Held` state.
    pub fn new_held(id: LotId, product_id: ProductId, quantity: i64, at: DateTime<Utc>) -> Self {
        debug_assert!(quantity > 0);
        Self {
            id,
            product_id,
            quantity,
            state: LotState::Held,
            note: None,
            state_changed_at: at,
        }
    }

    pub(crate) fn new_classified(
        id: LotId,
        product_id: ProductId,
        quantity: i64,
        state: LotState,
        note: String,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            state,
            note: Some(note),
            state_changed_at: at,
        }
    }

    pub fn id_typed(&self) -> LotId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn state(&self) -> LotState {
        self.state
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn state_changed_at(&self) -> DateTime<Utc> {
        self.state_changed_at
    }

    pub(crate) fn classify(&mut self, state: LotState, note: String, at: DateTime<Utc>) {
        self.state = state;
        self.note = Some(note);
        self.state_changed_at = at;
    }

    pub(crate) fn reduce(&mut self, quantity: i64) {
        self.quantity -= quantity;
    }
}

impl Entity for InventoryLot {
    type Id = LotId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
