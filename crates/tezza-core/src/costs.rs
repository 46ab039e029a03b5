//! # Cost Estimation
//!
//! Materials, labor and overhead for a set of lines.
//!
//! Intermediate sums stay in full `Decimal` precision; rounding happens once
//! when the breakdown is returned, so many small lines never compound
//! rounding error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingOptions;
use crate::error::CoreResult;
use crate::money::{round2, Money};
use crate::types::{Customization, ProductCost};
use crate::validation::validate_quantity;

/// Anything that can be costed: quote items and order line items.
pub trait CostLine {
    /// Cost attributes of the product on this line.
    fn cost(&self) -> &ProductCost;
    /// Units on this line.
    fn quantity(&self) -> i64;
    /// Customization requested on this line.
    fn customization(&self) -> Customization;
}

/// Unrounded costs of a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCosts {
    pub materials: Decimal,
    pub labor_hours: Decimal,
    pub overhead: Decimal,
}

impl LineCosts {
    /// Costs one line. Logo and personalization hours are additive.
    pub fn of<L: CostLine + ?Sized>(line: &L, options: &PricingOptions) -> CoreResult<Self> {
        let cost = line.cost();
        cost.validate()?;
        let quantity = line.quantity();
        validate_quantity(quantity)?;

        let units = Decimal::from(quantity);
        let customization = line.customization();

        let mut hours_per_unit = cost.labor_hours;
        if customization.has_logo {
            hours_per_unit += options.logo_hours_per_unit;
        }
        if customization.has_personalization {
            hours_per_unit += options.personalization_hours_per_unit;
        }

        let materials = cost.base_cost.to_decimal() * units;
        Ok(LineCosts {
            materials,
            labor_hours: hours_per_unit * units,
            overhead: materials * cost.overhead_percentage.fraction(),
        })
    }
}

/// Aggregate cost breakdown for a quote or an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostBreakdown {
    pub materials_cost: Money,
    #[ts(as = "String")]
    pub labor_hours: Decimal,
    pub labor_cost: Money,
    pub overhead_cost: Money,
    pub total_cost: Money,
}

/// Estimates costs for `lines` at `options.labor_rate`.
///
/// `total_cost` is rounded from the full-precision sum, so it can differ by
/// a cent from the sum of the rounded components.
///
/// ## Example
/// ```rust
/// use tezza_core::costs::estimate_costs;
/// use tezza_core::quote::QuoteItem;
/// use tezza_core::types::{Customization, Percentage, ProductCost};
/// use tezza_core::{Money, PricingOptions};
/// use rust_decimal_macros::dec;
///
/// let mug = QuoteItem {
///     name: "Custom Coffee Mug".to_string(),
///     cost: ProductCost {
///         base_cost: Money::from_cents(500),
///         overhead_percentage: Percentage::new(dec!(30)),
///         labor_hours: dec!(0.1),
///         customization_cost: Money::from_cents(200),
///     },
///     quantity: 50,
///     customization: Customization::LOGO,
/// };
///
/// let costs = estimate_costs(&[mug], &PricingOptions::default()).unwrap();
/// assert_eq!(costs.labor_hours, dec!(17.5));
/// assert_eq!(costs.total_cost.cents(), 76250);
/// ```
pub fn estimate_costs<L: CostLine>(lines: &[L], options: &PricingOptions) -> CoreResult<CostBreakdown> {
    let mut materials = Decimal::ZERO;
    let mut labor_hours = Decimal::ZERO;
    let mut overhead = Decimal::ZERO;

    for line in lines {
        let costs = LineCosts::of(line, options)?;
        materials += costs.materials;
        labor_hours += costs.labor_hours;
        overhead += costs.overhead;
    }

    let labor_cost = labor_hours * options.labor_rate.to_decimal();
    let total_cost = materials + labor_cost + overhead;

    Ok(CostBreakdown {
        materials_cost: Money::from_decimal(materials),
        labor_hours: round2(labor_hours),
        labor_cost: Money::from_decimal(labor_cost),
        overhead_cost: Money::from_decimal(overhead),
        total_cost: Money::from_decimal(total_cost),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
