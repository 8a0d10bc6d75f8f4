use serde::{Deserialize, Serialize};

use stockbook_core::{ActorId, EngineError, EngineResult, Entity};

/// The already-authenticated actor (distributor) the engine operates for.
///
/// Credential checks happen outside the engine; this profile only carries the
/// financial fields the ledger needs. `capital_spent` is the running total of
/// `total_paid` across the actor's purchase transactions, and the two must
/// stay equal at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    id: ActorId,
    name: String,
    capital_invested: i64,
    capital_spent: i64,
    /// Profit target; zero means no target has been set yet.
    sales_target: i64,
}

impl ActorProfile {
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        capital_invested: i64,
        sales_target: i64,
    ) -> EngineResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::validation("actor name cannot be empty"));
        }
        if capital_invested < 0 {
            return Err(EngineError::validation("invested capital cannot be negative"));
        }
        if sales_target < 0 {
            return Err(EngineError::validation("sales target cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            capital_invested,
            capital_spent: 0,
            sales_target,
        })
    }

    pub fn id_typed(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capital_invested(&self) -> i64 {
        self.capital_invested
    }

    pub fn capital_spent(&self) -> i64 {
        self.capital_spent
    }

    pub fn sales_target(&self) -> i64 {
        self.sales_target
    }

    /// Capital still available for purchases.
    pub fn available_capital(&self) -> i64 {
        self.capital_invested - self.capital_spent
    }

    /// Validate that a purchase of `required` can be afforded.
    pub fn ensure_funds(&self, required: i64) -> EngineResult<()> {
        if required > self.available_capital() {
            return Err(EngineError::InsufficientFunds {
                required,
                available: self.available_capital(),
            });
        }
        Ok(())
    }

    /// Record the frozen total of a confirmed purchase.
    pub fn apply_spend(&mut self, total_paid: i64) {
        self.capital_spent += total_paid;
    }
}

impl Entity for ActorProfile {
    type Id = ActorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
