use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{EngineError, EngineResult, ProductId};

use crate::product::Product;

/// Remaining stock strictly below this raises a low-stock signal after a
/// purchase.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// The product catalog: id → product, with the shared stock pool.
///
/// Read-only to the engine except through the explicit operations below; the
/// stock pool is only ever decremented by a purchase.
///
/// Backed by a `BTreeMap` so iteration order is canonical regardless of
/// insertion order (aggregation must not depend on iteration order).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

/// Fact: a product was added to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product: Product,
    pub occurred_at: DateTime<Utc>,
}

/// Fact: a product's prices changed. Carries old and new values so the
/// notification text does not need to diff anything after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdated {
    pub product_id: ProductId,
    pub product_name: String,
    pub old_distributor_price: i64,
    pub new_distributor_price: i64,
    pub old_retail_price: i64,
    pub new_retail_price: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Fact: units were added back to a product's stock pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restocked {
    pub product_id: ProductId,
    pub product_name: String,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Fact: a product was activated or retired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStatusChanged {
    pub product_id: ProductId,
    pub product_name: String,
    pub active: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Fact: a purchase left a product's pool below [`LOW_STOCK_THRESHOLD`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockRaised {
    pub product_id: ProductId,
    pub product_name: String,
    pub remaining: i64,
    pub occurred_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id_typed(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in canonical (id) order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn try_get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn get(&self, id: ProductId) -> EngineResult<&Product> {
        self.try_get(id).ok_or(EngineError::UnknownProduct(id))
    }

    /// Validate that `requested` units of `id` can be taken from the pool.
    ///
    /// Retired products stay visible in reports but cannot be purchased.
    pub fn ensure_available(&self, id: ProductId, requested: i64) -> EngineResult<&Product> {
        let product = self.get(id)?;
        if !product.is_active() {
            return Err(EngineError::validation(format!(
                "product {} is inactive",
                product.name()
            )));
        }
        if requested > product.stock() {
            return Err(EngineError::InsufficientStock {
                product: product.name().to_string(),
                requested,
                available: product.stock(),
            });
        }
        Ok(product)
    }

    // Validation half of the explicit catalog operations. These never mutate;
    // the returned fact is applied separately.

    pub fn stage_add(&self, product: Product, at: DateTime<Utc>) -> EngineResult<ProductAdded> {
        if self.products.contains_key(&product.id_typed()) {
            return Err(EngineError::validation(format!(
                "product {} already exists",
                product.id_typed()
            )));
        }
        Ok(ProductAdded {
            product,
            occurred_at: at,
        })
    }

    pub fn stage_update_price(
        &self,
        id: ProductId,
        distributor_price: i64,
        retail_price: i64,
        at: DateTime<Utc>,
    ) -> EngineResult<PriceUpdated> {
        if distributor_price < 0 || retail_price < 0 {
            return Err(EngineError::validation("prices cannot be negative"));
        }
        let product = self.get(id)?;
        Ok(PriceUpdated {
            product_id: id,
            product_name: product.name().to_string(),
            old_distributor_price: product.distributor_price(),
            new_distributor_price: distributor_price,
            old_retail_price: product.retail_price(),
            new_retail_price: retail_price,
            occurred_at: at,
        })
    }

    pub fn stage_restock(
        &self,
        id: ProductId,
        additional: i64,
        at: DateTime<Utc>,
    ) -> EngineResult<Restocked> {
        if additional <= 0 {
            return Err(EngineError::validation("restock quantity must be positive"));
        }
        let product = self.get(id)?;
        Ok(Restocked {
            product_id: id,
            product_name: product.name().to_string(),
            previous_stock: product.stock(),
            new_stock: product.stock() + additional,
            occurred_at: at,
        })
    }

    pub fn stage_set_active(
        &self,
        id: ProductId,
        active: bool,
        at: DateTime<Utc>,
    ) -> EngineResult<ProductStatusChanged> {
        let product = self.get(id)?;
        if product.is_active() == active {
            return Err(EngineError::validation(format!(
                "product {} is already {}",
                product.name(),
                if active { "active" } else { "inactive" }
            )));
        }
        Ok(ProductStatusChanged {
            product_id: id,
            product_name: product.name().to_string(),
            active,
            occurred_at: at,
        })
    }

    // Mutation half, driven by previously validated facts.

    pub fn apply_add(&mut self, fact: &ProductAdded) {
        self.products
            .insert(fact.product.id_typed(), fact.product.clone());
    }

    pub fn apply_update_price(&mut self, fact: &PriceUpdated) {
        if let Some(product) = self.products.get_mut(&fact.product_id) {
            product.set_prices(fact.new_distributor_price, fact.new_retail_price);
        }
    }

    pub fn apply_restock(&mut self, fact: &Restocked) {
        if let Some(product) = self.products.get_mut(&fact.product_id) {
            product.add_stock(fact.new_stock - fact.previous_stock);
        }
    }

    pub fn apply_set_active(&mut self, fact: &ProductStatusChanged) {
        if let Some(product) = self.products.get_mut(&fact.product_id) {
            product.set_active(fact.active);
        }
    }

    /// Take `quantity` units out of the pool. Only purchases call this, after
    /// `ensure_available` succeeded for every line.
    pub fn apply_deduction(&mut self, id: ProductId, quantity: i64) {
        if let Some(product) = self.products.get_mut(&id) {
            product.deduct_stock(quantity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::ProductId;

    fn sample(stock: i64) -> Product {
        Product::new(ProductId::new(), "Health Drink", "Health Care", 1800, 2450, stock).unwrap()
    }

    #[test]
    fn ensure_available_names_product_and_quantity() {
        let product = sample(15);
        let id = product.id_typed();
        let catalog = Catalog::from_products([product]);

        let err = catalog.ensure_available(id, 30).unwrap_err();
        match err {
            EngineError::InsufficientStock {
                product,
                requested,
                available,
            } => {
                assert_eq!(product, "Health Drink");
                assert_eq!(requested, 30);
                assert_eq!(available, 15);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn unknown_product_is_reported() {
        let catalog = Catalog::new();
        let id = ProductId::new();
        assert_eq!(catalog.get(id).unwrap_err(), EngineError::UnknownProduct(id));
    }

    #[test]
    fn stage_then_apply_restock_adds_stock() {
        let product = sample(3);
        let id = product.id_typed();
        let mut catalog = Catalog::from_products([product]);

        let fact = catalog.stage_restock(id, 7, Utc::now()).unwrap();
        assert_eq!(fact.previous_stock, 3);
        assert_eq!(fact.new_stock, 10);

        catalog.apply_restock(&fact);
        assert_eq!(catalog.get(id).unwrap().stock(), 10);
    }

    #[test]
    fn restock_rejects_non_positive_quantity() {
        let product = sample(3);
        let id = product.id_typed();
        let catalog = Catalog::from_products([product]);

        assert!(catalog.stage_restock(id, 0, Utc::now()).is_err());
        assert!(catalog.stage_restock(id, -4, Utc::now()).is_err());
    }

    #[test]
    fn update_price_carries_old_and_new() {
        let product = sample(5);
        let id = product.id_typed();
        let mut catalog = Catalog::from_products([product]);

        let fact = catalog.stage_update_price(id, 1900, 2500, Utc::now()).unwrap();
        assert_eq!(fact.old_distributor_price, 1800);
        assert_eq!(fact.new_distributor_price, 1900);

        catalog.apply_update_price(&fact);
        let updated = catalog.get(id).unwrap();
        assert_eq!(updated.distributor_price(), 1900);
        assert_eq!(updated.retail_price(), 2500);
    }

    #[test]
    fn retired_products_cannot_be_purchased() {
        let product = sample(15);
        let id = product.id_typed();
        let mut catalog = Catalog::from_products([product]);

        let fact = catalog.stage_set_active(id, false, Utc::now()).unwrap();
        assert!(!fact.active);
        catalog.apply_set_active(&fact);

        assert!(!catalog.get(id).unwrap().is_active());
        assert!(matches!(
            catalog.ensure_available(id, 1).unwrap_err(),
            EngineError::Validation(_)
        ));
    }

    #[test]
    fn status_change_must_actually_change_something() {
        let product = sample(15);
        let id = product.id_typed();
        let catalog = Catalog::from_products([product]);

        assert!(catalog.stage_set_active(id, true, Utc::now()).is_err());
        assert!(catalog.stage_set_active(id, false, Utc::now()).is_ok());
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let product = sample(5);
        let mut catalog = Catalog::new();
        let fact = catalog.stage_add(product.clone(), Utc::now()).unwrap();
        catalog.apply_add(&fact);

        assert!(catalog.stage_add(product, Utc::now()).is_err());
    }
}
