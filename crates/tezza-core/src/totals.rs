//! # Order Totals
//!
//! Subtotal → discount → tax → shipping → total.
//!
//! ```text
//! subtotal                         392.50
//!   − discount (5%)                 19.63   round(392.50 × 0.05)
//!   = subtotal after discount      372.87
//!   + tax (8.5%)                    31.69   round(372.87 × 0.085)
//!   + shipping                      25.00
//!   = total                        429.56
//! ```
//!
//! Each stage rounds to the cent before the next stage consumes it, so the
//! total is always exactly `subtotal_after_discount + tax + shipping`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingOptions;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Percentage;
use crate::validation::{validate_discount_percentage, validate_non_negative_amount, validate_tax_rate};

/// Inputs of the totals step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TotalsInput {
    pub subtotal: Money,
    #[serde(default)]
    pub discount_percentage: Percentage,
    /// `None` falls back to `PricingOptions::default_tax_rate`.
    #[serde(default)]
    pub tax_rate: Option<Percentage>,
    #[serde(default)]
    pub shipping_cost: Money,
}

/// Result of the totals step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    #[ts(as = "String")]
    pub discount_percentage: Percentage,
    pub discount_amount: Money,
    pub subtotal_after_discount: Money,
    #[ts(as = "String")]
    pub tax_rate: Percentage,
    pub tax_amount: Money,
    pub shipping_cost: Money,
    pub total_amount: Money,
}

/// Computes discount, tax and grand total.
///
/// ## Errors
/// `InvalidTotalsInput` for a negative subtotal or shipping cost, a discount
/// outside `[0, 100]`, or a negative tax rate. Also when an amount would
/// leave the `Money` range.
pub fn compute_totals(input: &TotalsInput, options: &PricingOptions) -> CoreResult<Totals> {
    let tax_rate = input.tax_rate.unwrap_or(options.default_tax_rate);

    validate_non_negative_amount("subtotal", input.subtotal)?;
    validate_discount_percentage(input.discount_percentage)?;
    validate_tax_rate(tax_rate)?;
    validate_non_negative_amount("shipping_cost", input.shipping_cost)?;

    let discount_amount = input
        .subtotal
        .percent_of(input.discount_percentage)
        .ok_or_else(|| CoreError::amount_overflow("discount_amount"))?;
    // Discount is at most 100%, so this stays non-negative.
    let subtotal_after_discount = input.subtotal - discount_amount;
    let tax_amount = subtotal_after_discount
        .percent_of(tax_rate)
        .ok_or_else(|| CoreError::amount_overflow("tax_amount"))?;
    let total_amount = subtotal_after_discount
        .checked_add(tax_amount)
        .and_then(|amount| amount.checked_add(input.shipping_cost))
        .ok_or_else(|| CoreError::amount_overflow("total_amount"))?;

    Ok(Totals {
        subtotal: input.subtotal,
        discount_percentage: input.discount_percentage,
        discount_amount,
        subtotal_after_discount,
        tax_rate,
        tax_amount,
        shipping_cost: input.shipping_cost,
        total_amount,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_scenario_totals() {
        let input = TotalsInput {
            subtotal: Money::from_cents(39250),
            discount_percentage: Percentage::new(dec!(5)),
            tax_rate: None,
            shipping_cost: Money::from_cents(2500),
        };

        let totals = compute_totals(&input, &PricingOptions::default()).unwrap();
        assert_eq!(totals.discount_amount.cents(), 1963);
        assert_eq!(totals.subtotal_after_discount.cents(), 37287);
        assert_eq!(totals.tax_rate.value(), dec!(8.5));
        assert_eq!(totals.tax_amount.cents(), 3169);
        assert_eq!(totals.total_amount.cents(), 42956);
    }

    #[test]
    fn test_explicit_zero_tax_rate_is_respected() {
        let input = TotalsInput {
            subtotal: Money::from_cents(10000),
            tax_rate: Some(Percentage::zero()),
            ..TotalsInput::default()
        };
        let totals = compute_totals(&input, &PricingOptions::default()).unwrap();
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.total_amount.cents(), 10000);
    }

    #[test]
    fn test_full_discount_leaves_shipping() {
        let input = TotalsInput {
            subtotal: Money::from_cents(10000),
            discount_percentage: Percentage::new(dec!(100)),
            tax_rate: None,
            shipping_cost: Money::from_cents(995),
        };
        let totals = compute_totals(&input, &PricingOptions::default()).unwrap();
        assert_eq!(totals.subtotal_after_discount, Money::zero());
        assert_eq!(totals.total_amount.cents(), 995);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let options = PricingOptions::default();

        let negative_subtotal = TotalsInput {
            subtotal: Money::from_cents(-1),
            ..TotalsInput::default()
        };
        assert!(matches!(
            compute_totals(&negative_subtotal, &options),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "subtotal"
        ));

        let over_discount = TotalsInput {
            subtotal: Money::from_cents(100),
            discount_percentage: Percentage::new(dec!(101)),
            ..TotalsInput::default()
        };
        assert!(matches!(
            compute_totals(&over_discount, &options),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "discount_percentage"
        ));

        let negative_shipping = TotalsInput {
            subtotal: Money::from_cents(100),
            shipping_cost: Money::from_cents(-500),
            ..TotalsInput::default()
        };
        assert!(compute_totals(&negative_shipping, &options).is_err());
    }

    #[test]
    fn test_total_past_money_range_is_rejected() {
        let options = PricingOptions::default();

        let huge_shipping = TotalsInput {
            subtotal: Money::from_cents(i64::MAX - 10),
            tax_rate: Some(Percentage::zero()),
            shipping_cost: Money::from_cents(100),
            ..TotalsInput::default()
        };
        assert!(matches!(
            compute_totals(&huge_shipping, &options),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "total_amount"
        ));

        let huge_tax = TotalsInput {
            subtotal: Money::from_cents(i64::MAX),
            tax_rate: Some(Percentage::new(dec!(50))),
            ..TotalsInput::default()
        };
        assert!(compute_totals(&huge_tax, &options).is_err());
    }

    proptest! {
        #[test]
        fn prop_total_identity_and_non_negative(
            subtotal in 0i64..10_000_000,
            discount_bps in 0u32..=10_000,
            tax_bps in 0u32..3_000,
            shipping in 0i64..100_000,
        ) {
            let input = TotalsInput {
                subtotal: Money::from_cents(subtotal),
                discount_percentage: Percentage::from_bps(discount_bps),
                tax_rate: Some(Percentage::from_bps(tax_bps)),
                shipping_cost: Money::from_cents(shipping),
            };
            let totals = compute_totals(&input, &PricingOptions::default()).unwrap();

            prop_assert_eq!(
                totals.total_amount,
                totals.subtotal_after_discount + totals.tax_amount + totals.shipping_cost
            );
            prop_assert!(!totals.total_amount.is_negative());
            prop_assert!(totals.discount_amount <= totals.subtotal);
        }
    }
}
