//! Engine configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `TEZZA_LABOR_RATE` | `25.00` | hourly labor rate |
//! | `TEZZA_TAX_RATE` | `8.5` | default tax rate, percent |
//! | `TEZZA_OVERHEAD_PERCENTAGE` | `30` | overhead for new products, percent |
//! | `TEZZA_PRODUCTION_CAPACITY` | `10` | units produced per day |
//! | `TEZZA_PRODUCTION_BUFFER_DAYS` | `2` | days added to every estimate |
//! | `TEZZA_TARGET_MARGIN` | `40` | margin for suggested prices, percent |
//! | `TEZZA_STRICT_TRANSITIONS` | `false` | forbid skipping status stages |
//! | `TEZZA_ORDER_PREFIX` | `TW` | order number prefix |

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tezza_core::order::DEFAULT_ORDER_PREFIX;
use tezza_core::validation::validate_order_prefix;
use tezza_core::{Money, Percentage, PricingOptions, TransitionPolicy};

/// Order engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rates and production parameters handed to every pricing call
    pub pricing: PricingOptions,

    /// Prefix of generated order numbers
    pub order_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            pricing: PricingOptions::default(),
            order_prefix: DEFAULT_ORDER_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PricingOptions::default();

        let labor_rate = decimal_or(&lookup, "TEZZA_LABOR_RATE", defaults.labor_rate.to_decimal())?;
        let tax_rate = decimal_or(&lookup, "TEZZA_TAX_RATE", defaults.default_tax_rate.value())?;
        let overhead = decimal_or(
            &lookup,
            "TEZZA_OVERHEAD_PERCENTAGE",
            defaults.default_overhead_percentage.value(),
        )?;
        let target_margin =
            decimal_or(&lookup, "TEZZA_TARGET_MARGIN", defaults.target_margin.value())?;

        let config = EngineConfig {
            pricing: PricingOptions {
                labor_rate: Money::from_decimal(labor_rate),
                default_tax_rate: Percentage::new(tax_rate),
                default_overhead_percentage: Percentage::new(overhead),
                production_units_per_day: parsed_or(
                    &lookup,
                    "TEZZA_PRODUCTION_CAPACITY",
                    defaults.production_units_per_day,
                )?,
                production_buffer_days: parsed_or(
                    &lookup,
                    "TEZZA_PRODUCTION_BUFFER_DAYS",
                    defaults.production_buffer_days,
                )?,
                target_margin: Percentage::new(target_margin),
                transition_policy: if parsed_or(&lookup, "TEZZA_STRICT_TRANSITIONS", false)? {
                    TransitionPolicy::Strict
                } else {
                    TransitionPolicy::Lenient
                },
                ..defaults
            },
            order_prefix: lookup("TEZZA_ORDER_PREFIX")
                .unwrap_or_else(|| DEFAULT_ORDER_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pricing = &self.pricing;

        if pricing.labor_rate.is_negative() {
            return Err(ConfigError::InvalidValue("TEZZA_LABOR_RATE".to_string()));
        }
        if pricing.default_tax_rate.is_negative() {
            return Err(ConfigError::InvalidValue("TEZZA_TAX_RATE".to_string()));
        }
        if pricing.default_overhead_percentage.is_negative() {
            return Err(ConfigError::InvalidValue("TEZZA_OVERHEAD_PERCENTAGE".to_string()));
        }
        if pricing.production_units_per_day < 1 {
            return Err(ConfigError::InvalidValue("TEZZA_PRODUCTION_CAPACITY".to_string()));
        }
        if pricing.production_buffer_days < 0 {
            return Err(ConfigError::InvalidValue("TEZZA_PRODUCTION_BUFFER_DAYS".to_string()));
        }
        if pricing.target_margin.is_negative() || pricing.target_margin.value() >= Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::InvalidValue("TEZZA_TARGET_MARGIN".to_string()));
        }
        if validate_order_prefix(&self.order_prefix).is_err() {
            return Err(ConfigError::InvalidValue("TEZZA_ORDER_PREFIX".to_string()));
        }

        Ok(())
    }
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn decimal_or<F>(lookup: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parsed_or(lookup, key, default)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

impl ConfigError {
    /// Name of the offending environment variable.
    pub fn variable(&self) -> &str {
        match self {
            ConfigError::InvalidValue(var) => var,
        }
    }
}
