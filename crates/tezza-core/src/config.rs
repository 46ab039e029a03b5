//! # Pricing Options
//!
//! Explicit knobs for the pricing engine. Every operation takes a
//! `&PricingOptions`; there are no module-level rate constants, so tests and
//! callers can vary rates without global state.
//!
//! ```rust
//! use tezza_core::config::PricingOptions;
//! use tezza_core::Money;
//!
//! let options = PricingOptions {
//!     labor_rate: Money::from_cents(3000),
//!     ..PricingOptions::default()
//! };
//! assert_eq!(options.production_units_per_day, 10);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Percentage;

/// How permissive order status changes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Forward moves may skip stages; skipped stage dates stay unset.
    Lenient,
    /// Only the next stage (or cancellation) is allowed.
    Strict,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::Lenient
    }
}

/// Rates and production parameters used across the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOptions {
    /// Hourly labor rate.
    pub labor_rate: Money,

    /// Tax rate used when a request does not carry one.
    pub default_tax_rate: Percentage,

    /// Overhead applied to newly catalogued products.
    pub default_overhead_percentage: Percentage,

    /// Extra production hours per unit carrying a logo.
    pub logo_hours_per_unit: Decimal,

    /// Extra production hours per unit carrying personalization.
    pub personalization_hours_per_unit: Decimal,

    /// Workshop capacity used for completion estimates.
    pub production_units_per_day: i64,

    /// Fixed days added to every completion estimate.
    pub production_buffer_days: i64,

    /// Margin targeted by suggested retail prices.
    pub target_margin: Percentage,

    pub transition_policy: TransitionPolicy,
}

impl Default for PricingOptions {
    fn default() -> Self {
        PricingOptions {
            labor_rate: Money::from_cents(2500),
            default_tax_rate: Percentage::new(dec!(8.5)),
            default_overhead_percentage: Percentage::new(dec!(30)),
            logo_hours_per_unit: dec!(0.25),
            personalization_hours_per_unit: dec!(0.25),
            production_units_per_day: 10,
            production_buffer_days: 2,
            target_margin: Percentage::new(dec!(40)),
            transition_policy: TransitionPolicy::Lenient,
        }
    }
}

impl PricingOptions {
    /// Returns a copy with a different labor rate.
    pub fn with_labor_rate(&self, labor_rate: Money) -> Self {
        PricingOptions {
            labor_rate,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PricingOptions::default();
        assert_eq!(options.labor_rate.cents(), 2500);
        assert_eq!(options.default_tax_rate.value(), dec!(8.5));
        assert_eq!(options.production_buffer_days, 2);
        assert_eq!(options.transition_policy, TransitionPolicy::Lenient);
    }

    #[test]
    fn test_with_labor_rate_keeps_other_fields() {
        let options = PricingOptions::default().with_labor_rate(Money::from_cents(4000));
        assert_eq!(options.labor_rate.cents(), 4000);
        assert_eq!(options.logo_hours_per_unit, dec!(0.25));
    }
}
