//! # Validation Module
//!
//! Input validation for the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API layer                                                    │
//! │  ├── Deserialization into request descriptors                          │
//! │  └── Maps errors to 4xx with the field name                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Record format checks (SKU, name)        → ValidationError         │
//! │  └── Pricing preconditions (qty, %, money)   → CoreError kinds         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing functions                                            │
//! │  └── Assume validated input, never return partial results             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tezza_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("MUG-11OZ").unwrap();
//! validate_quantity(50).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Percentage;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tezza_core::validation::validate_sku;
///
/// assert!(validate_sku("TOTE-CANVAS").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an order number prefix: 1-10 uppercase letters or digits.
pub fn validate_order_prefix(prefix: &str) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "order_prefix".to_string(),
        });
    }

    if prefix.len() > 10 {
        return Err(ValidationError::TooLong {
            field: "order_prefix".to_string(),
            max: 10,
        });
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "order_prefix".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Pricing Preconditions
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed [`MAX_ITEM_QUANTITY`]; everything from 500 up lands in
///   the top volume tier
///
/// ```text
/// validate_quantity(q)
///      │
///      ├── q < 1                 → InvalidQuantity { quantity: q }
///      ├── q > MAX_ITEM_QUANTITY → InvalidQuantity { quantity: q }
///      │
///      └── OK → volume tier lookup
/// ```
pub fn validate_quantity(quantity: i64) -> CoreResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(CoreError::InvalidQuantity { quantity });
    }
    Ok(())
}

/// Validates an amount fed into the totals step (subtotal, shipping).
pub fn validate_non_negative_amount(field: &str, amount: Money) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(CoreError::totals_input(field, "must not be negative"));
    }
    Ok(())
}

/// Validates a percentage fed into the totals step.
///
/// Discounts must lie in `[0, 100]`; tax rates only need to be non-negative.
pub fn validate_discount_percentage(percentage: Percentage) -> CoreResult<()> {
    if !percentage.is_within_whole() {
        return Err(CoreError::totals_input(
            "discount_percentage",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Validates a tax rate: non-negative.
pub fn validate_tax_rate(rate: Percentage) -> CoreResult<()> {
    if rate.is_negative() {
        return Err(CoreError::totals_input("tax_rate", "must not be negative"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("MUG-11OZ").is_ok());
        assert!(validate_sku("TOTE_01").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Custom Coffee Mug").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_order_prefix() {
        assert!(validate_order_prefix("TW").is_ok());
        assert!(validate_order_prefix("Q2025").is_ok());
        assert!(validate_order_prefix("").is_err());
        assert!(validate_order_prefix("tw").is_err());
        assert!(validate_order_prefix("TOOLONGPREFIX").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert_eq!(
            validate_quantity(0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_quantity_upper_bound() {
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(MAX_ITEM_QUANTITY + 1),
            Err(CoreError::InvalidQuantity {
                quantity: MAX_ITEM_QUANTITY + 1
            })
        );
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_totals_inputs() {
        assert!(validate_non_negative_amount("shipping_cost", Money::zero()).is_ok());
        assert!(matches!(
            validate_non_negative_amount("shipping_cost", Money::from_cents(-1)),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "shipping_cost"
        ));

        assert!(validate_discount_percentage(Percentage::new(dec!(100))).is_ok());
        assert!(validate_discount_percentage(Percentage::new(dec!(100.5))).is_err());
        assert!(validate_discount_percentage(Percentage::new(dec!(-5))).is_err());

        assert!(validate_tax_rate(Percentage::new(dec!(120))).is_ok());
        assert!(validate_tax_rate(Percentage::new(dec!(-0.1))).is_err());
    }
}
