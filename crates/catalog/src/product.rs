use serde::{Deserialize, Serialize};

use stockbook_core::{EngineError, EngineResult, Entity, ProductId};

/// A catalog product.
///
/// Prices are integer amounts in the smallest currency unit. The retail price
/// may be below the distributor price: unit margin can be negative and nothing
/// in the engine assumes otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    distributor_price: i64,
    retail_price: i64,
    /// Units available for purchase from the shared stock pool.
    stock: i64,
    active: bool,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        distributor_price: i64,
        retail_price: i64,
        stock: i64,
    ) -> EngineResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EngineError::validation("product name cannot be empty"));
        }
        if distributor_price < 0 || retail_price < 0 {
            return Err(EngineError::validation("prices cannot be negative"));
        }
        if stock < 0 {
            return Err(EngineError::validation("stock cannot be negative"));
        }

        Ok(Self {
            id,
            name,
            category: category.into(),
            distributor_price,
            retail_price,
            stock,
            active: true,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unit cost the distributor pays to acquire stock (DP).
    pub fn distributor_price(&self) -> i64 {
        self.distributor_price
    }

    /// Unit price at which the distributor may resell (RP).
    pub fn retail_price(&self) -> i64 {
        self.retail_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Per-unit margin (RP − DP). May be negative.
    pub fn unit_margin(&self) -> i64 {
        self.retail_price - self.distributor_price
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_prices(&mut self, distributor_price: i64, retail_price: i64) {
        self.distributor_price = distributor_price;
        self.retail_price = retail_price;
    }

    pub(crate) fn add_stock(&mut self, delta: i64) {
        self.stock += delta;
    }

    pub(crate) fn deduct_stock(&mut self, quantity: i64) {
        self.stock -= quantity;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_may_be_negative() {
        let p = Product::new(ProductId::new(), "Sample", "Misc", 1000, 800, 5).unwrap();
        assert_eq!(p.unit_margin(), -200);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Product::new(ProductId::new(), "  ", "Misc", 100, 120, 5).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn negative_stock_is_rejected() {
        let err = Product::new(ProductId::new(), "Sample", "Misc", 100, 120, -1).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
