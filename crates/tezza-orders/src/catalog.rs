//! # Product Catalog
//!
//! The seam through which the order service reads product records.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService                                                           │
//! │       │  catalog.get(product_id)                                        │
//! │       ▼                                                                 │
//! │  ProductCatalog (trait)                                                 │
//! │  ├── InMemoryCatalog   (this module; tests, CLI)                        │
//! │  └── database-backed   (API collaborator)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups fail closed: a missing product is `ProductNotFound`, never a
//! zero-cost default.

use std::collections::HashMap;

use tracing::debug;

use tezza_core::validation::{validate_product_name, validate_sku};
use tezza_core::{CoreError, CoreResult, Product};

use crate::error::{OrdersError, OrdersResult};

/// Read access to product records.
pub trait ProductCatalog {
    /// Looks up a product by id.
    fn find(&self, product_id: &str) -> Option<&Product>;

    /// Looks up a product by id, failing with `ProductNotFound`.
    fn get(&self, product_id: &str) -> CoreResult<&Product> {
        self.find(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }
}

/// Catalog held in memory, keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Adds a product after checking its SKU, name and cost figures.
    ///
    /// ## Returns
    /// * `Ok(&Product)` - The stored product
    /// * `Err(OrdersError::DuplicateProduct)` - SKU already exists
    /// * `Err(OrdersError::Core)` - Malformed record
    pub fn insert(&mut self, product: Product) -> OrdersResult<&Product> {
        debug!(sku = %product.sku, "Inserting product");

        validate_sku(&product.sku).map_err(CoreError::from)?;
        validate_product_name(&product.name).map_err(CoreError::from)?;
        product.cost().validate()?;

        if self.find_by_sku(&product.sku).is_some() {
            return Err(OrdersError::DuplicateProduct { sku: product.sku });
        }

        let id = product.id.clone();
        Ok(&*self.products.entry(id).or_insert(product))
    }

    /// Looks up a product by SKU (case-insensitive).
    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products
            .values()
            .find(|product| product.sku.eq_ignore_ascii_case(sku))
    }

    /// Soft-deletes a product. Existing line items keep their snapshot.
    pub fn deactivate(&mut self, product_id: &str) -> CoreResult<()> {
        debug!(id = %product_id, "Deactivating product");

        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        product.is_active = false;
        Ok(())
    }

    /// Active products ordered by name.
    pub fn list_active(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .values()
            .filter(|product| product.is_active)
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Case-insensitive substring search over SKU and name, active products
    /// only. An empty query lists active products.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Product> {
        let query = query.trim().to_lowercase();

        debug!(query = %query, limit = %limit, "Searching products");

        let mut results: Vec<&Product> = self
            .list_active()
            .into_iter()
            .filter(|product| {
                query.is_empty()
                    || product.sku.to_lowercase().contains(&query)
                    || product.name.to_lowercase().contains(&query)
            })
            .collect();
        results.truncate(limit);
        results
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tezza_core::{Money, ProductCategory};

    fn product(sku: &str, name: &str) -> Product {
        Product::new(sku, name, ProductCategory::Drinkware, Money::from_cents(500))
    }

    #[test]
    fn test_insert_and_get() {
        let mut catalog = InMemoryCatalog::new();
        let id = catalog.insert(product("MUG-11OZ", "Custom Coffee Mug")).unwrap().id.clone();

        assert_eq!(catalog.get(&id).unwrap().sku, "MUG-11OZ");
        assert_eq!(
            catalog.get("missing").unwrap_err(),
            CoreError::ProductNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_insert_rejects_duplicates_and_bad_records() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(product("MUG-11OZ", "Mug")).unwrap();

        assert!(matches!(
            catalog.insert(product("mug-11oz", "Other Mug")),
            Err(OrdersError::DuplicateProduct { .. })
        ));
        assert!(catalog.insert(product("BAD SKU", "Mug")).is_err());
        assert!(catalog.insert(product("EMPTY-NAME", "")).is_err());

        let mut negative = product("NEG-1", "Negative");
        negative.base_cost = Money::from_cents(-1);
        assert!(matches!(
            catalog.insert(negative),
            Err(OrdersError::Core(CoreError::InvalidProductData { .. }))
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_search_and_deactivate() {
        let mut catalog = InMemoryCatalog::new();
        let mug_id = catalog.insert(product("MUG-11OZ", "Custom Coffee Mug")).unwrap().id.clone();
        catalog.insert(product("TOTE-CANVAS", "Canvas Tote")).unwrap();
        catalog.insert(product("BTL-STEEL", "Steel Bottle")).unwrap();

        assert_eq!(catalog.search("mug", 10).len(), 1);
        assert_eq!(catalog.search("tote", 10)[0].sku, "TOTE-CANVAS");
        assert_eq!(catalog.search("", 2).len(), 2);

        catalog.deactivate(&mug_id).unwrap();
        assert!(catalog.search("mug", 10).is_empty());
        assert_eq!(catalog.list_active().len(), 2);
        // Soft-deleted products still resolve for existing orders
        assert!(catalog.get(&mug_id).is_ok());
    }
}
