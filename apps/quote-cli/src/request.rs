//! # Request Files
//!
//! The JSON document read by `tezza-quote quote`. Products are listed
//! inline and items refer to them by SKU; money is in cents, percentages
//! in percent units.
//!
//! ```text
//! {
//!   "products": [{ "sku": "MUG-11OZ", "name": "Custom Coffee Mug",
//!                  "base_cost": 500, "labor_hours": "0.1",
//!                  "customization_cost": 200 }],
//!   "items":    [{ "sku": "MUG-11OZ", "quantity": 50,
//!                  "customization": { "has_logo": true } }],
//!   "adjustments": { "discount_percentage": "5", "shipping_cost": 2500 }
//! }
//! ```

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use tezza_core::{
    Customization, LineItemRequest, Money, Percentage, Product, ProductCategory, QuoteAdjustments,
};
use tezza_orders::{InMemoryCatalog, QuoteRequest};

/// A product as written in a request file.
#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    pub base_cost: Money,
    /// Falls back to the configured default overhead.
    #[serde(default)]
    pub overhead_percentage: Option<Percentage>,
    #[serde(default)]
    pub labor_hours: Decimal,
    #[serde(default)]
    pub customization_cost: Money,
    #[serde(default = "allowed")]
    pub allows_logo: bool,
    #[serde(default)]
    pub allows_personalization: bool,
}

fn allowed() -> bool {
    true
}

impl CatalogEntry {
    fn into_product(self, default_overhead: Percentage) -> Product {
        let mut product = Product::new(
            self.sku,
            self.name,
            self.category.unwrap_or_default(),
            self.base_cost,
        );
        product.overhead_percentage = self.overhead_percentage.unwrap_or(default_overhead);
        product.labor_hours = self.labor_hours;
        product.customization_cost = self.customization_cost;
        product.allows_logo = self.allows_logo;
        product.allows_personalization = self.allows_personalization;
        product
    }
}

/// An item to price, referring to a product by SKU.
#[derive(Debug, Deserialize)]
pub struct RequestedItem {
    pub sku: String,
    pub quantity: i64,
    #[serde(default)]
    pub customization: Customization,
}

#[derive(Debug, Deserialize)]
pub struct QuoteFile {
    pub products: Vec<CatalogEntry>,
    pub items: Vec<RequestedItem>,
    #[serde(default)]
    pub adjustments: QuoteAdjustments,
}

impl QuoteFile {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Malformed quote request")
    }

    /// Loads the products into a catalog and resolves item SKUs to ids.
    pub fn into_parts(self, default_overhead: Percentage) -> Result<(InMemoryCatalog, QuoteRequest)> {
        let mut catalog = InMemoryCatalog::new();
        for entry in self.products {
            let sku = entry.sku.clone();
            catalog
                .insert(entry.into_product(default_overhead))
                .with_context(|| format!("Invalid product {sku}"))?;
        }

        let items = self
            .items
            .into_iter()
            .map(|item| {
                let product = catalog
                    .find_by_sku(&item.sku)
                    .with_context(|| format!("Unknown SKU {}", item.sku))?;
                Ok(LineItemRequest {
                    product_id: product.id.clone(),
                    quantity: item.quantity,
                    customization: item.customization,
                    logo_details: None,
                    personalization_details: None,
                    production_notes: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((
            catalog,
            QuoteRequest {
                items,
                adjustments: self.adjustments,
            },
        ))
    }
}
