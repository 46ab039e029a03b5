//! # tezza-orders: Service Layer for Tezza Orders
//!
//! Connects the pure pricing engine to its collaborators: product records
//! come in through a catalog, orders are kept and edited here, and the
//! dashboard reads kanban and analytics views.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tezza Orders Data Flow                           │
//! │                                                                         │
//! │  API handler / tezza-quote CLI                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tezza-orders (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ OrderService  │    │  Catalog      │    │  Analytics   │  │   │
//! │  │   │ (service.rs)  │───►│ (catalog.rs)  │    │ kanban, KPIs │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │            EngineConfig (config.rs, env vars)      │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  tezza-core: build_quote, recalculate, transition                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - Order store and edit operations
//! - [`catalog`] - Product lookup seam and in-memory catalog
//! - [`analytics`] - Kanban board and dashboard metrics
//! - [`config`] - Environment-driven engine configuration
//! - [`error`] - Service error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::{KanbanBoard, OrderAnalytics};
pub use catalog::{InMemoryCatalog, ProductCatalog};
pub use config::{ConfigError, EngineConfig};
pub use error::{OrdersError, OrdersResult};
pub use service::{
    ItemUpdate, NewOrder, OrderDetails, OrderFilter, OrderService, PricingAdjustment, QuoteRequest,
};
