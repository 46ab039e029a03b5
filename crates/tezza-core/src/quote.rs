//! # Quote Builder
//!
//! Prices a set of items without touching any order: unit prices, line
//! totals, cost breakdown, totals and margin. Safe to call speculatively for
//! "what-if" pricing.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► unit_price() per item ──► line_total ──► Σ subtotal         │
//! │    │                                                    │               │
//! │    └──────► estimate_costs() ──► CostBreakdown          │               │
//! │                                        │                ▼               │
//! │                                        │        compute_totals()        │
//! │                                        ▼                │               │
//! │                              profit_margin(total, cost) ◄┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingOptions;
use crate::costs::{estimate_costs, CostBreakdown, CostLine};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{line_total, profit_margin, unit_price, volume_discount_percentage};
use crate::totals::{compute_totals, Totals, TotalsInput};
use crate::types::{Customization, Percentage, ProductCost};

/// An item to be quoted: product cost attributes plus the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteItem {
    /// Product name for display.
    pub name: String,
    pub cost: ProductCost,
    pub quantity: i64,
    #[serde(default)]
    pub customization: Customization,
}

impl CostLine for QuoteItem {
    fn cost(&self) -> &ProductCost {
        &self.cost
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn customization(&self) -> Customization {
        self.customization
    }
}

/// Order-level adjustments applied to a quote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteAdjustments {
    #[serde(default)]
    pub discount_percentage: Percentage,
    /// `None` uses the configured default tax rate.
    #[serde(default)]
    pub tax_rate: Option<Percentage>,
    #[serde(default)]
    pub shipping_cost: Money,
    /// `None` uses the configured labor rate.
    #[serde(default)]
    pub labor_rate: Option<Money>,
}

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    /// Volume discount applied to this line, in percent.
    #[ts(as = "String")]
    pub volume_discount: Percentage,
    pub has_customization: bool,
}

/// A complete, unsaved quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub costs: CostBreakdown,
    pub totals: Totals,
    /// Margin of the grand total over total cost, in percent.
    #[ts(as = "String")]
    pub profit_margin: Decimal,
}

/// Builds a quote. Any invalid item rejects the whole quote.
///
/// ## Example
/// ```rust
/// use tezza_core::quote::{build_quote, QuoteAdjustments, QuoteItem};
/// use tezza_core::types::{Customization, Percentage, ProductCost};
/// use tezza_core::{Money, PricingOptions};
/// use rust_decimal_macros::dec;
///
/// let items = vec![QuoteItem {
///     name: "Custom Coffee Mug".to_string(),
///     cost: ProductCost {
///         base_cost: Money::from_cents(500),
///         overhead_percentage: Percentage::new(dec!(30)),
///         labor_hours: dec!(0.1),
///         customization_cost: Money::from_cents(200),
///     },
///     quantity: 50,
///     customization: Customization::LOGO,
/// }];
/// let adjustments = QuoteAdjustments {
///     discount_percentage: Percentage::new(dec!(5)),
///     shipping_cost: Money::from_cents(2500),
///     ..QuoteAdjustments::default()
/// };
///
/// let quote = build_quote(&items, &adjustments, &PricingOptions::default()).unwrap();
/// assert_eq!(quote.totals.subtotal.cents(), 39250);
/// assert_eq!(quote.totals.total_amount.cents(), 42956);
/// ```
pub fn build_quote(
    items: &[QuoteItem],
    adjustments: &QuoteAdjustments,
    options: &PricingOptions,
) -> CoreResult<Quote> {
    if items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let options = match adjustments.labor_rate {
        Some(rate) => {
            if rate.is_negative() {
                return Err(CoreError::totals_input("labor_rate", "must not be negative"));
            }
            options.with_labor_rate(rate)
        }
        None => options.clone(),
    };

    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal = Money::zero();

    for item in items {
        let has_customization = item.customization.is_customized();
        let price = unit_price(&item.cost, item.quantity, has_customization)?;
        let line_total = line_total(price, item.quantity)?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| CoreError::amount_overflow("subtotal"))?;

        lines.push(QuoteLine {
            product_name: item.name.clone(),
            quantity: item.quantity,
            unit_price: price,
            line_total,
            volume_discount: volume_discount_percentage(item.quantity)?,
            has_customization,
        });
    }

    let costs = estimate_costs(items, &options)?;
    let totals = compute_totals(
        &TotalsInput {
            subtotal,
            discount_percentage: adjustments.discount_percentage,
            tax_rate: adjustments.tax_rate,
            shipping_cost: adjustments.shipping_cost,
        },
        &options,
    )?;
    let profit_margin = profit_margin(totals.total_amount, costs.total_cost);

    Ok(Quote {
        lines,
        costs,
        totals,
        profit_margin,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mug(quantity: i64, customization: Customization) -> QuoteItem {
        QuoteItem {
            name: "Custom Coffee Mug".to_string(),
            cost: ProductCost {
                base_cost: Money::from_cents(500),
                overhead_percentage: Percentage::new(dec!(30)),
                labor_hours: dec!(0.1),
                customization_cost: Money::from_cents(200),
            },
            quantity,
            customization,
        }
    }

    fn scenario_adjustments() -> QuoteAdjustments {
        QuoteAdjustments {
            discount_percentage: Percentage::new(dec!(5)),
            shipping_cost: Money::from_cents(2500),
            ..QuoteAdjustments::default()
        }
    }

    #[test]
    fn test_full_quote_scenario() {
        let quote = build_quote(
            &[mug(50, Customization::LOGO)],
            &scenario_adjustments(),
            &PricingOptions::default(),
        )
        .unwrap();

        let line = &quote.lines[0];
        assert_eq!(line.unit_price.cents(), 785);
        assert_eq!(line.line_total.cents(), 39250);
        assert_eq!(line.volume_discount.value(), dec!(10));
        assert!(line.has_customization);

        assert_eq!(quote.costs.total_cost.cents(), 76250);

        assert_eq!(quote.totals.subtotal.cents(), 39250);
        assert_eq!(quote.totals.discount_amount.cents(), 1963);
        assert_eq!(quote.totals.subtotal_after_discount.cents(), 37287);
        assert_eq!(quote.totals.tax_amount.cents(), 3169);
        assert_eq!(quote.totals.total_amount.cents(), 42956);

        // (429.56 − 762.50) / 429.56 × 100 = −77.51
        assert_eq!(quote.profit_margin, dec!(-77.51));
    }

    #[test]
    fn test_multiple_items_accumulate_subtotal() {
        let items = [mug(10, Customization::NONE), mug(200, Customization::LOGO)];
        let quote = build_quote(&items, &QuoteAdjustments::default(), &PricingOptions::default())
            .unwrap();

        // 10 × 6.50 + 200 × (6.50 × 0.85 + 2.00 = 7.53)
        assert_eq!(quote.lines[0].line_total.cents(), 6500);
        assert_eq!(quote.lines[1].unit_price.cents(), 753);
        assert_eq!(quote.totals.subtotal.cents(), 6500 + 150600);
    }

    #[test]
    fn test_labor_rate_override() {
        let adjustments = QuoteAdjustments {
            labor_rate: Some(Money::zero()),
            ..QuoteAdjustments::default()
        };
        let quote = build_quote(&[mug(50, Customization::LOGO)], &adjustments, &PricingOptions::default())
            .unwrap();
        assert_eq!(quote.costs.labor_cost, Money::zero());
        assert_eq!(quote.costs.total_cost.cents(), 32500);
    }

    #[test]
    fn test_rejects_whole_quote_on_one_bad_item() {
        let items = [mug(10, Customization::NONE), mug(0, Customization::NONE)];
        assert_eq!(
            build_quote(&items, &QuoteAdjustments::default(), &PricingOptions::default()),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
    }

    #[test]
    fn test_quantity_above_bound_is_rejected() {
        let items = [mug(crate::MAX_ITEM_QUANTITY + 1, Customization::NONE)];
        assert_eq!(
            build_quote(&items, &QuoteAdjustments::default(), &PricingOptions::default()),
            Err(CoreError::InvalidQuantity {
                quantity: crate::MAX_ITEM_QUANTITY + 1
            })
        );
    }

    #[test]
    fn test_line_total_past_money_range_is_rejected() {
        let mut item = mug(crate::MAX_ITEM_QUANTITY, Customization::NONE);
        item.cost.base_cost = Money::from_cents(i64::MAX / 4);
        item.cost.overhead_percentage = Percentage::zero();

        assert!(matches!(
            build_quote(&[item], &QuoteAdjustments::default(), &PricingOptions::default()),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "line_total"
        ));
    }

    #[test]
    fn test_rejects_empty_quote() {
        assert_eq!(
            build_quote(&[], &QuoteAdjustments::default(), &PricingOptions::default()),
            Err(CoreError::EmptyOrder)
        );
    }

    #[test]
    fn test_quote_is_repeatable() {
        let items = [mug(75, Customization::LOGO)];
        let options = PricingOptions::default();
        let first = build_quote(&items, &scenario_adjustments(), &options).unwrap();
        let second = build_quote(&items, &scenario_adjustments(), &options).unwrap();
        assert_eq!(first, second);
    }
}
