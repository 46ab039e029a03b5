//! # Pricing
//!
//! Volume discounts and per-unit sale prices.
//!
//! ## Unit Price Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base_cost ──► × (1 + overhead%) ──► × (1 − volume discount)           │
//! │                                              │                          │
//! │                       customized? ──► + customization_cost              │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                              round to cent ──► unit_price               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Volume Tiers
//! | quantity | discount |
//! |---|---|
//! | 1-25 | 0% |
//! | 26-100 | 10% |
//! | 101-499 | 15% |
//! | 500+ | 25% |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::{round2, Money};
use crate::types::{Percentage, ProductCost};
use crate::validation::validate_quantity;

// =============================================================================
// Volume Discount Table
// =============================================================================

/// One row of the volume discount table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeTier {
    /// Lowest quantity in the tier (inclusive).
    pub min_quantity: i64,
    /// Highest quantity in the tier (inclusive); `None` is unbounded.
    pub max_quantity: Option<i64>,
    /// Discount as a fraction of the loaded price.
    pub discount: Decimal,
}

impl VolumeTier {
    fn contains(&self, quantity: i64) -> bool {
        quantity >= self.min_quantity && self.max_quantity.map_or(true, |max| quantity <= max)
    }
}

/// Fixed, non-overlapping tiers ordered low to high.
pub const VOLUME_TIERS: [VolumeTier; 4] = [
    VolumeTier {
        min_quantity: 1,
        max_quantity: Some(25),
        discount: dec!(0.00),
    },
    VolumeTier {
        min_quantity: 26,
        max_quantity: Some(100),
        discount: dec!(0.10),
    },
    VolumeTier {
        min_quantity: 101,
        max_quantity: Some(499),
        discount: dec!(0.15),
    },
    VolumeTier {
        min_quantity: 500,
        max_quantity: None,
        discount: dec!(0.25),
    },
];

/// Returns the volume discount fraction for a quantity.
///
/// ## Example
/// ```rust
/// use tezza_core::pricing::discount_for;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(discount_for(25).unwrap(), dec!(0.00));
/// assert_eq!(discount_for(26).unwrap(), dec!(0.10));
/// assert_eq!(discount_for(500).unwrap(), dec!(0.25));
/// assert!(discount_for(0).is_err());
/// ```
pub fn discount_for(quantity: i64) -> CoreResult<Decimal> {
    validate_quantity(quantity)?;

    let tier = VOLUME_TIERS
        .iter()
        .find(|tier| tier.contains(quantity))
        .ok_or(CoreError::InvalidQuantity { quantity })?;

    Ok(tier.discount)
}

/// Volume discount expressed in percent (for quote display).
pub fn volume_discount_percentage(quantity: i64) -> CoreResult<Percentage> {
    Ok(Percentage::new(discount_for(quantity)? * Decimal::ONE_HUNDRED))
}

// =============================================================================
// Unit Price
// =============================================================================

/// Computes the per-unit sale price.
///
/// The customization surcharge is added after the volume discount, so it is
/// never discounted. The result is rounded once, at the end.
///
/// ## Errors
/// - `InvalidProductData` for negative cost attributes
/// - `InvalidQuantity` for quantity < 1
///
/// ## Example
/// ```rust
/// use tezza_core::pricing::unit_price;
/// use tezza_core::types::{Percentage, ProductCost};
/// use tezza_core::Money;
/// use rust_decimal_macros::dec;
///
/// let cost = ProductCost {
///     base_cost: Money::from_cents(500),
///     overhead_percentage: Percentage::new(dec!(30)),
///     labor_hours: dec!(0.1),
///     customization_cost: Money::from_cents(200),
/// };
/// // 5.00 × 1.30 × 0.90 + 2.00 = 7.85
/// assert_eq!(unit_price(&cost, 50, true).unwrap().cents(), 785);
/// ```
pub fn unit_price(cost: &ProductCost, quantity: i64, has_customization: bool) -> CoreResult<Money> {
    cost.validate()?;
    let discount = discount_for(quantity)?;

    let mut price = cost.loaded_cost() * (Decimal::ONE - discount);
    if has_customization {
        price += cost.customization_cost.to_decimal();
    }

    Ok(Money::from_decimal(price))
}

/// `unit_price × quantity`.
///
/// ## Errors
/// `InvalidTotalsInput` on `line_total` when the product leaves the cent range.
pub fn line_total(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| CoreError::amount_overflow("line_total"))
}

// =============================================================================
// Margins
// =============================================================================

/// Suggested retail price that yields `target_margin` over cost with
/// overhead: `loaded_cost / (1 − margin)`.
///
/// ```rust
/// use tezza_core::pricing::suggested_retail_price;
/// use tezza_core::types::{Percentage, ProductCost};
/// use tezza_core::Money;
/// use rust_decimal_macros::dec;
///
/// let cost = ProductCost {
///     base_cost: Money::from_cents(600),
///     overhead_percentage: Percentage::new(dec!(0)),
///     labor_hours: dec!(0),
///     customization_cost: Money::zero(),
/// };
/// // 6.00 / 0.60 = 10.00
/// let price = suggested_retail_price(&cost, Percentage::new(dec!(40))).unwrap();
/// assert_eq!(price.cents(), 1000);
/// ```
pub fn suggested_retail_price(cost: &ProductCost, target_margin: Percentage) -> CoreResult<Money> {
    cost.validate()?;

    if target_margin.is_negative() || target_margin.value() >= Decimal::ONE_HUNDRED {
        return Err(CoreError::product_data(
            "target_margin",
            "must be at least 0 and below 100",
        ));
    }

    let price = cost.loaded_cost() / (Decimal::ONE - target_margin.fraction());
    Ok(Money::from_decimal(price))
}

/// Profit margin in percent: `(price − cost) / price × 100`, rounded to two
/// places. Zero when the selling price is not positive.
pub fn profit_margin(selling_price: Money, total_cost: Money) -> Decimal {
    if !selling_price.is_positive() {
        return Decimal::ZERO;
    }

    let price = selling_price.to_decimal();
    round2((price - total_cost.to_decimal()) / price * Decimal::ONE_HUNDRED)
}

// =============================================================================
// Unit Tests
// =============================================================================
