//! # Domain Types
//!
//! Catalog-side types consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   ProductCost   │   │  Customization  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  base_cost      │   │  has_logo       │       │
//! │  │  sku (business) │   │  overhead %     │   │  has_personal.  │       │
//! │  │  allows_logo    │   │  labor_hours    │   └─────────────────┘       │
//! │  │  allows_pers.   │   │  customization  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   Percentage    │   │ ProductCategory │                             │
//! │  │  8.5 = 8.5%     │   │  Drinkware ...  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID: (sku, order_number) - human-readable

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage expressed in percent units: `Percentage::new(dec!(8.5))`
/// is 8.5 %.
///
/// Used for overhead allocation, order discounts, tax rates and margins.
/// Negative values are representable so validators can reject them with
/// the right error kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage from percent units.
    #[inline]
    pub const fn new(percent: Decimal) -> Self {
        Percentage(percent)
    }

    /// Creates a percentage from basis points (850 = 8.5%).
    pub fn from_bps(bps: u32) -> Self {
        Percentage(Decimal::new(i64::from(bps), 2))
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Returns the value in percent units.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (8.5% → 0.085).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Checks if the percentage is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checks if the percentage lies in `[0, 100]`.
    pub fn is_within_whole(&self) -> bool {
        !self.is_negative() && self.0 <= Decimal::ONE_HUNDRED
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// Catalog grouping for corporate gift products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Apparel,
    Drinkware,
    TechAccessories,
    OfficeSupplies,
    Bags,
    Wellness,
    Outdoor,
    Custom,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Custom
    }
}

// =============================================================================
// Customization
// =============================================================================

/// Customization requested on a line item.
///
/// Logo and personalization are independent: each adds its own labor time,
/// while the price surcharge is applied once if either is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customization {
    #[serde(default)]
    pub has_logo: bool,
    #[serde(default)]
    pub has_personalization: bool,
}

impl Customization {
    /// No customization.
    pub const NONE: Customization = Customization {
        has_logo: false,
        has_personalization: false,
    };

    /// Logo only.
    pub const LOGO: Customization = Customization {
        has_logo: true,
        has_personalization: false,
    };

    /// Checks if any customization is requested.
    #[inline]
    pub const fn is_customized(&self) -> bool {
        self.has_logo || self.has_personalization
    }
}

// =============================================================================
// Product Cost
// =============================================================================

/// Cost attributes of a product, the only product data pricing needs.
///
/// Line items keep a frozen copy of this (snapshot pattern) so later catalog
/// edits never change an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCost {
    /// Material cost per unit.
    pub base_cost: Money,

    /// Overhead allocation on top of the material cost.
    #[ts(as = "String")]
    pub overhead_percentage: Percentage,

    /// Production hours per unit before customization.
    #[ts(as = "String")]
    #[serde(default)]
    pub labor_hours: Decimal,

    /// Flat surcharge per unit when the unit is customized.
    #[serde(default)]
    pub customization_cost: Money,
}

impl ProductCost {
    /// Rejects negative cost, overhead and labor figures.
    pub fn validate(&self) -> CoreResult<()> {
        if self.base_cost.is_negative() {
            return Err(CoreError::product_data("base_cost", "must not be negative"));
        }
        if self.overhead_percentage.is_negative() {
            return Err(CoreError::product_data(
                "overhead_percentage",
                "must not be negative",
            ));
        }
        if self.labor_hours.is_sign_negative() && !self.labor_hours.is_zero() {
            return Err(CoreError::product_data("labor_hours", "must not be negative"));
        }
        if self.customization_cost.is_negative() {
            return Err(CoreError::product_data(
                "customization_cost",
                "must not be negative",
            ));
        }
        Ok(())
    }

    /// Base cost with overhead applied, unrounded.
    pub fn loaded_cost(&self) -> Decimal {
        self.base_cost.to_decimal() * (Decimal::ONE + self.overhead_percentage.fraction())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the custom-goods catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name used on quotes.
    pub name: String,

    pub description: Option<String>,

    pub category: ProductCategory,

    /// Material cost per unit.
    pub base_cost: Money,

    /// Production hours per unit.
    #[ts(as = "String")]
    pub labor_hours: Decimal,

    /// Overhead allocation percentage (30 = 30%).
    #[ts(as = "String")]
    pub overhead_percentage: Percentage,

    pub stock_quantity: i64,

    /// Stock level at or below which the product should be reordered.
    pub reorder_level: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// Whether a logo may be applied.
    pub allows_logo: bool,

    /// Whether name personalization may be applied.
    pub allows_personalization: bool,

    /// Additional cost per customized unit.
    pub customization_cost: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an active product with catalog defaults: 30% overhead, no
    /// labor, logos allowed, personalization not allowed, reorder at 10.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        category: ProductCategory,
        base_cost: Money,
    ) -> Self {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.into(),
            name: name.into(),
            description: None,
            category,
            base_cost,
            labor_hours: Decimal::ZERO,
            overhead_percentage: Percentage::new(dec!(30)),
            stock_quantity: 0,
            reorder_level: 10,
            is_active: true,
            allows_logo: true,
            allows_personalization: false,
            customization_cost: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the cost attributes used for pricing.
    pub fn cost(&self) -> ProductCost {
        ProductCost {
            base_cost: self.base_cost,
            overhead_percentage: self.overhead_percentage,
            labor_hours: self.labor_hours,
            customization_cost: self.customization_cost,
        }
    }

    /// Fails closed when the requested customization is not offered.
    pub fn check_customization(&self, customization: Customization) -> CoreResult<()> {
        if customization.has_logo && !self.allows_logo {
            return Err(CoreError::CustomizationNotAllowed {
                sku: self.sku.clone(),
                customization: "has_logo".to_string(),
            });
        }
        if customization.has_personalization && !self.allows_personalization {
            return Err(CoreError::CustomizationNotAllowed {
                sku: self.sku.clone(),
                customization: "has_personalization".to_string(),
            });
        }
        Ok(())
    }

    /// Unit price for a quantity, optionally including the customization
    /// surcharge.
    pub fn unit_price(&self, quantity: i64, include_customization: bool) -> CoreResult<Money> {
        pricing::unit_price(&self.cost(), quantity, include_customization)
    }

    /// Profit margin (percent) at a selling price, against cost with overhead.
    pub fn margin_at(&self, selling_price: Money) -> Decimal {
        let loaded = Money::from_decimal(self.cost().loaded_cost());
        pricing::profit_margin(selling_price, loaded)
    }

    /// Checks if stock has dropped to the reorder level.
    pub fn needs_reorder(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> Product {
        let mut product = Product::new(
            "MUG-11OZ",
            "Custom Coffee Mug",
            ProductCategory::Drinkware,
            Money::from_cents(500),
        );
        product.labor_hours = dec!(0.1);
        product.customization_cost = Money::from_cents(200);
        product
    }

    #[test]
    fn test_percentage_fraction() {
        assert_eq!(Percentage::new(dec!(8.5)).fraction(), dec!(0.085));
        assert_eq!(Percentage::from_bps(850), Percentage::new(dec!(8.5)));
        assert_eq!(Percentage::new(dec!(8.5)).to_string(), "8.5%");
    }

    #[test]
    fn test_percentage_range_checks() {
        assert!(Percentage::zero().is_within_whole());
        assert!(Percentage::new(dec!(100)).is_within_whole());
        assert!(!Percentage::new(dec!(100.01)).is_within_whole());
        assert!(Percentage::new(dec!(-1)).is_negative());
        assert!(!Percentage::new(dec!(-0)).is_negative());
    }

    #[test]
    fn test_product_defaults() {
        let product = mug();
        assert_eq!(product.overhead_percentage.value(), dec!(30));
        assert!(product.allows_logo);
        assert!(!product.allows_personalization);
        assert!(product.is_active);
        assert!(product.needs_reorder());
    }

    #[test]
    fn test_product_cost_validation() {
        let mut cost = mug().cost();
        assert!(cost.validate().is_ok());

        cost.base_cost = Money::from_cents(-1);
        assert!(matches!(
            cost.validate(),
            Err(CoreError::InvalidProductData { ref field, .. }) if field == "base_cost"
        ));

        let mut cost = mug().cost();
        cost.labor_hours = dec!(-0.5);
        assert!(cost.validate().is_err());
    }

    #[test]
    fn test_customization_gating() {
        let product = mug();
        assert!(product.check_customization(Customization::LOGO).is_ok());

        let personalized = Customization {
            has_logo: false,
            has_personalization: true,
        };
        assert!(matches!(
            product.check_customization(personalized),
            Err(CoreError::CustomizationNotAllowed { .. })
        ));
    }

    #[test]
    fn test_product_unit_price_and_margin() {
        let product = mug();
        // 5.00 × 1.30 = 6.50, no volume discount at qty 10
        assert_eq!(product.unit_price(10, false).unwrap().cents(), 650);
        assert_eq!(product.unit_price(10, true).unwrap().cents(), 850);

        // (10.00 − 6.50) / 10.00 = 35%
        assert_eq!(product.margin_at(Money::from_cents(1000)), dec!(35.00));
        assert_eq!(product.margin_at(Money::zero()), Decimal::ZERO);
    }

    #[test]
    fn test_customization_serde_defaults() {
        let parsed: Customization = serde_json::from_str(r#"{"has_logo":true}"#).unwrap();
        assert_eq!(parsed, Customization::LOGO);
    }
}
