//! # Service Error Types
//!
//! Errors raised by the order service.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (pricing, lifecycle)     ConfigError (environment)          │
//! │       │                                   │                             │
//! │       └───────────────┬───────────────────┘                             │
//! │                       ▼                                                 │
//! │  OrdersError (this module) ← Adds lookup failures                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  API layer → 4xx response naming `field()`                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tezza_core::CoreError;

use crate::config::ConfigError;

/// Order service errors.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// Pricing or lifecycle rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Order id is absent from the store.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Catalog insert with a SKU that already exists.
    #[error("Duplicate sku: '{sku}' already exists")]
    DuplicateProduct { sku: String },

    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OrdersError {
    /// The request field the API layer should name in its 4xx response.
    pub fn field(&self) -> &str {
        match self {
            OrdersError::Core(err) => err.field(),
            OrdersError::OrderNotFound(_) => "order_id",
            OrdersError::DuplicateProduct { .. } => "sku",
            OrdersError::Config(err) => err.variable(),
        }
    }

    /// Checks if the error is a missing entity (maps to 404 rather than 400).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OrdersError::OrderNotFound(_)
                | OrdersError::Core(CoreError::ProductNotFound(_))
                | OrdersError::Core(CoreError::LineItemNotFound(_))
        )
    }
}

/// Result type alias for service operations.
pub type OrdersResult<T> = Result<T, OrdersError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_passes_through_core_errors() {
        let err: OrdersError = CoreError::InvalidQuantity { quantity: 0 }.into();
        assert_eq!(err.field(), "quantity");
        assert_eq!(err.to_string(), "Invalid quantity 0: must be between 1 and 1000000");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(OrdersError::OrderNotFound("o-1".into()).is_not_found());
        let err: OrdersError = CoreError::ProductNotFound("p-1".into()).into();
        assert!(err.is_not_found());
        assert_eq!(err.field(), "product_id");
    }

    #[test]
    fn test_config_error_names_variable() {
        let err: OrdersError = ConfigError::InvalidValue("TEZZA_TAX_RATE".into()).into();
        assert_eq!(err.field(), "TEZZA_TAX_RATE");
    }
}
