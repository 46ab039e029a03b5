//! # tezza-core: Pure Pricing Engine for Tezza Orders
//!
//! This crate is the **heart** of the order system. It prices custom goods,
//! estimates production costs, computes order totals and drives the order
//! status lifecycle, all as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tezza Orders Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              API layer / tezza-quote CLI                        │   │
//! │  │    parse requests ──► map errors to 4xx with field names       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             tezza-orders (service layer)                        │   │
//! │  │    catalog lookup, order store, analytics, env config          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tezza-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   costs   │  │  totals   │  │ lifecycle │  │   │
//! │  │   │  tiers    │  │ materials │  │ discount  │  │  status   │  │   │
//! │  │   │ unit price│  │ labor, OH │  │ tax, ship │  │ recalc    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          quote = pricing + costs + totals, no side effects     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Volume discount table, unit prices, margins
//! - [`costs`] - Materials / labor / overhead estimation
//! - [`totals`] - Discount, tax, shipping and grand total
//! - [`quote`] - Side-effect-free quote builder
//! - [`order`] - Order, line items, status enum
//! - [`lifecycle`] - Status transitions and recalculation
//! - [`money`] - Money type with integer cents
//! - [`types`] - Catalog types (Product, ProductCost, Percentage)
//! - [`config`] - Pricing options passed into every call
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; the clock is a parameter
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Amounts are cents (i64); rates are `Decimal`, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tezza_core::pricing::{discount_for, unit_price};
//! use tezza_core::types::{Percentage, ProductCost};
//! use tezza_core::Money;
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(discount_for(26).unwrap(), dec!(0.10));
//!
//! let cost = ProductCost {
//!     base_cost: Money::from_cents(500),
//!     overhead_percentage: Percentage::new(dec!(30)),
//!     labor_hours: dec!(0.1),
//!     customization_cost: Money::from_cents(200),
//! };
//! assert_eq!(unit_price(&cost, 50, true).unwrap().to_string(), "$7.85");
//! ```

// =============================================================================
// Constants
// =============================================================================

/// Maximum quantity of a single product on one line.
///
/// ## Business Reason
/// Runs past a million units are quoted by hand. The bound also keeps
/// `unit price × quantity` and the production-days estimate inside the
/// cent and calendar ranges for any sane unit price.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod costs;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod order;
pub mod pricing;
pub mod quote;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tezza_core::Money` instead of
// `use tezza_core::money::Money`

pub use config::{PricingOptions, TransitionPolicy};
pub use costs::{estimate_costs, CostBreakdown, CostLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::{recalculate, transition, transition_named};
pub use money::Money;
pub use order::{LineItem, LineItemRequest, Order, OrderStatus, ShippingAddress};
pub use quote::{build_quote, Quote, QuoteAdjustments, QuoteItem, QuoteLine};
pub use totals::{compute_totals, Totals, TotalsInput};
pub use types::*;
