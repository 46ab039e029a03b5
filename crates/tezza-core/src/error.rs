//! # Error Types
//!
//! Domain-specific error types for tezza-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tezza-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing and lifecycle rule violations          │
//! │  └── ValidationError  - Field format failures                          │
//! │                                                                         │
//! │  tezza-orders errors (separate crate)                                  │
//! │  └── OrdersError      - Catalog / order lookup failures                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrdersError → API 4xx response    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant names the offending field or entity
//! 3. Errors are enum variants, never String
//! 4. A failed pricing call rejects the whole request, no partial results

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine and order lifecycle errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Quantity below 1 or above `MAX_ITEM_QUANTITY`.
    #[error(
        "Invalid quantity {quantity}: must be between 1 and {max}",
        max = crate::MAX_ITEM_QUANTITY
    )]
    InvalidQuantity { quantity: i64 },

    /// Negative cost, overhead or labor figures on a product.
    ///
    /// ## When This Occurs
    /// - `base_cost` or `customization_cost` below zero
    /// - `overhead_percentage` or `labor_hours` below zero
    /// - A target margin of 100% or more (price would be infinite)
    #[error("Invalid product data for {field}: {reason}")]
    InvalidProductData { field: String, reason: String },

    /// Out-of-range percentage or negative money passed to the totals step.
    #[error("Invalid totals input for {field}: {reason}")]
    InvalidTotalsInput { field: String, reason: String },

    /// Status change not allowed from the current status.
    ///
    /// ## When This Occurs
    /// - Order is DELIVERED or CANCELLED (terminal)
    /// - Target status is behind the current one
    /// - Target status name is not recognised
    /// - Strict policy and the target skips a stage
    #[error("Cannot transition order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Referenced product id is absent from the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Referenced line item is absent from the order.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// Requested customization is not offered for the product.
    #[error("Product {sku} does not allow {customization}")]
    CustomizationNotAllowed { sku: String, customization: String },

    /// A quote was requested with no items.
    #[error("At least one item is required")]
    EmptyOrder,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidProductData error.
    pub fn product_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidProductData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidTotalsInput error.
    pub fn totals_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidTotalsInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidTotalsInput error for an amount past the `Money` range.
    pub fn amount_overflow(field: impl Into<String>) -> Self {
        CoreError::totals_input(field, "exceeds the largest representable amount")
    }

    /// The request field the API layer should name in its 4xx response.
    pub fn field(&self) -> &str {
        match self {
            CoreError::InvalidQuantity { .. } => "quantity",
            CoreError::InvalidProductData { field, .. } => field,
            CoreError::InvalidTotalsInput { field, .. } => field,
            CoreError::InvalidTransition { .. } => "status",
            CoreError::ProductNotFound(_) => "product_id",
            CoreError::LineItemNotFound(_) => "item_id",
            CoreError::CustomizationNotAllowed { customization, .. } => customization,
            CoreError::EmptyOrder => "items",
            CoreError::Validation(err) => err.field(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation errors.
///
/// These occur before any pricing runs, when a record handed over by the
/// API or persistence layer is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid SKU characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "Invalid quantity 0: must be between 1 and 1000000");

        let err = CoreError::InvalidTransition {
            from: "delivered".to_string(),
            to: "shipped".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot transition order from delivered to shipped"
        );
    }

    #[test]
    fn test_field_names_for_api_layer() {
        assert_eq!(CoreError::product_data("base_cost", "negative").field(), "base_cost");
        assert_eq!(CoreError::totals_input("shipping_cost", "negative").field(), "shipping_cost");
        assert_eq!(CoreError::InvalidQuantity { quantity: -2 }.field(), "quantity");
        assert_eq!(CoreError::ProductNotFound("p-1".into()).field(), "product_id");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.field(), "sku");
    }
}
