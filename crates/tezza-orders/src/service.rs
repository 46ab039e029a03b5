//! # Order Service
//!
//! Owns the working set of orders and applies every edit through the pricing
//! engine: look up products, edit a draft copy, recalculate, then commit.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item / update_item / remove_item / adjust_pricing                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clone stored order ──► apply edit ──► lifecycle::recalculate()        │
//! │       │                                        │                        │
//! │       │ error: stored order untouched          ▼                        │
//! │       ▼                                  commit + return               │
//! │  warn! + OrdersError                                                   │
//! │                                                                         │
//! │  set_status ──► lifecycle::transition_named()  (dates only, no recalc) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service holds no locks; the caller serializes access to one service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tezza_core::order::generate_order_number;
use tezza_core::{
    build_quote, recalculate, transition_named, CoreError, Customization, LineItem,
    LineItemRequest, Money, Order, OrderStatus, Percentage, PricingOptions, Quote,
    QuoteAdjustments, QuoteItem, ShippingAddress, ValidationError,
};

use crate::analytics::{kanban_board, summarize, KanbanBoard, OrderAnalytics};
use crate::catalog::ProductCatalog;
use crate::config::EngineConfig;
use crate::error::{OrdersError, OrdersResult};

// =============================================================================
// Requests
// =============================================================================

/// Items to price without creating an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub adjustments: QuoteAdjustments,
}

/// A new order with its initial items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    /// Required; a blank id is rejected.
    pub client_id: String,
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub discount_percentage: Percentage,
    /// `None` uses the configured default tax rate.
    #[serde(default)]
    pub tax_rate: Option<Percentage>,
    #[serde(default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub internal_notes: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Changes to one line item; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub customization: Option<Customization>,
    #[serde(default)]
    pub logo_details: Option<String>,
    #[serde(default)]
    pub personalization_details: Option<String>,
    #[serde(default)]
    pub production_notes: Option<String>,
}

/// Order-level money changes; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingAdjustment {
    #[serde(default)]
    pub shipping_cost: Option<Money>,
    #[serde(default)]
    pub discount_percentage: Option<Percentage>,
    #[serde(default)]
    pub tax_rate: Option<Percentage>,
}

/// Order metadata changes; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub internal_notes: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Order selection for listings and analytics. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Inclusive lower bound on the order date.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the order date.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |status| order.status == status)
            && self
                .client_id
                .as_deref()
                .map_or(true, |client| order.client_id.as_deref() == Some(client))
            && self.start.map_or(true, |start| order.order_date >= start)
            && self.end.map_or(true, |end| order.order_date <= end)
    }
}

// =============================================================================
// Service
// =============================================================================

/// Order operations over a product catalog.
///
/// ## Usage
/// ```rust
/// use tezza_orders::{EngineConfig, InMemoryCatalog, NewOrder, OrderService};
/// use tezza_core::{LineItemRequest, Money, Product, ProductCategory};
///
/// let mut catalog = InMemoryCatalog::new();
/// let mug = Product::new("MUG-11OZ", "Custom Coffee Mug", ProductCategory::Drinkware, Money::from_cents(500));
/// let mug_id = catalog.insert(mug).unwrap().id.clone();
///
/// let mut service = OrderService::new(catalog, EngineConfig::default());
/// let order = service
///     .create_order(NewOrder {
///         client_id: "client-1".to_string(),
///         items: vec![LineItemRequest {
///             product_id: mug_id,
///             quantity: 10,
///             customization: Default::default(),
///             logo_details: None,
///             personalization_details: None,
///             production_notes: None,
///         }],
///         ..NewOrder::default()
///     })
///     .unwrap();
///
/// // 10 × 6.50 = 65.00, plus 8.5% tax
/// assert_eq!(order.subtotal.cents(), 6500);
/// assert_eq!(order.total_amount.cents(), 7053);
/// ```
#[derive(Debug)]
pub struct OrderService<C> {
    catalog: C,
    config: EngineConfig,
    orders: HashMap<String, Order>,
}

impl<C: ProductCatalog> OrderService<C> {
    pub fn new(catalog: C, config: EngineConfig) -> Self {
        OrderService {
            catalog,
            config,
            orders: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn options(&self) -> &PricingOptions {
        &self.config.pricing
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    /// Prices items against the catalog without creating an order.
    pub fn quote(&self, request: &QuoteRequest) -> OrdersResult<Quote> {
        let quote = self
            .quote_items(&request.items)
            .and_then(|items| {
                build_quote(&items, &request.adjustments, &self.config.pricing).map_err(OrdersError::from)
            })
            .map_err(|err| rejected("quote", "-", err))?;

        debug!(
            lines = quote.lines.len(),
            subtotal = %quote.totals.subtotal,
            total = %quote.totals.total_amount,
            margin = %quote.profit_margin,
            "Quote built"
        );
        Ok(quote)
    }

    fn quote_items(&self, requests: &[LineItemRequest]) -> OrdersResult<Vec<QuoteItem>> {
        requests
            .iter()
            .map(|request| {
                let product = self.catalog.get(&request.product_id)?;
                product.check_customization(request.customization)?;
                Ok(QuoteItem {
                    name: product.name.clone(),
                    cost: product.cost(),
                    quantity: request.quantity,
                    customization: request.customization,
                })
            })
            .collect()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Creates an order in QUOTE status from at least one item.
    pub fn create_order(&mut self, request: NewOrder) -> OrdersResult<Order> {
        self.create_order_at(request, Utc::now())
    }

    /// [`create_order`](Self::create_order) with an explicit clock.
    pub fn create_order_at(&mut self, request: NewOrder, now: DateTime<Utc>) -> OrdersResult<Order> {
        let order_number = self.next_order_number(now);
        let order = self
            .build_order(order_number, request, now)
            .map_err(|err| rejected("create_order", "-", err))?;

        info!(
            order_number = %order.order_number,
            items = order.items.len(),
            total = %order.total_amount,
            "Order created"
        );
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    fn build_order(&self, order_number: String, request: NewOrder, now: DateTime<Utc>) -> OrdersResult<Order> {
        if request.client_id.trim().is_empty() {
            return Err(CoreError::Validation(ValidationError::Required {
                field: "client_id".to_string(),
            })
            .into());
        }
        if request.items.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }

        let options = &self.config.pricing;
        let mut order = Order::new(order_number, Some(request.client_id), options, now);
        order.discount_percentage = request.discount_percentage;
        order.tax_rate = request.tax_rate.unwrap_or(options.default_tax_rate);
        order.shipping_cost = request.shipping_cost;
        order.shipping_address = request.shipping_address;
        order.notes = request.notes;
        order.internal_notes = request.internal_notes;
        order.special_instructions = request.special_instructions;

        for item in &request.items {
            let product = self.catalog.get(&item.product_id)?;
            order
                .items
                .push(LineItem::from_product(&order.id, product, item, options, now)?);
        }

        Ok(recalculate(&order, options)?)
    }

    /// Order numbers collide when two orders land in the same second; later
    /// ones get a `-2`, `-3`, ... suffix.
    fn next_order_number(&self, now: DateTime<Utc>) -> String {
        let base = generate_order_number(&self.config.order_prefix, now);
        let taken = |number: &str| self.orders.values().any(|order| order.order_number == number);

        if !taken(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn get_order(&self, order_id: &str) -> OrdersResult<&Order> {
        self.orders
            .get(order_id)
            .ok_or_else(|| OrdersError::OrderNotFound(order_id.to_string()))
    }

    /// Orders matching `filter`, newest first.
    pub fn list_orders(&self, filter: &OrderFilter) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .values()
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.order_number.cmp(&a.order_number))
        });
        orders
    }

    /// Removes an order together with its line items.
    pub fn delete_order(&mut self, order_id: &str) -> OrdersResult<Order> {
        let order = self
            .orders
            .remove(order_id)
            .ok_or_else(|| OrdersError::OrderNotFound(order_id.to_string()))?;

        info!(order_number = %order.order_number, "Order deleted");
        Ok(order)
    }

    // =========================================================================
    // Item Edits
    // =========================================================================

    /// Adds a product line to an order.
    pub fn add_item(&mut self, order_id: &str, request: &LineItemRequest) -> OrdersResult<Order> {
        let now = Utc::now();
        self.modify(order_id, "add_item", now, |catalog, options, order| {
            let product = catalog.get(&request.product_id)?;
            let item = LineItem::from_product(&order.id, product, request, options, now)?;
            order.items.push(item);
            Ok(())
        })
    }

    /// Changes quantity, customization or notes of a line item. The price is
    /// re-derived from the item's cost snapshot.
    pub fn update_item(&mut self, order_id: &str, item_id: &str, update: &ItemUpdate) -> OrdersResult<Order> {
        self.modify(order_id, "update_item", Utc::now(), |catalog, options, order| {
            let item = order
                .item_mut(item_id)
                .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;

            let customization = match update.customization {
                Some(requested) => {
                    catalog.get(&item.product_id)?.check_customization(requested)?;
                    requested
                }
                None => item.customization,
            };
            let quantity = update.quantity.unwrap_or(item.quantity);
            item.reprice(quantity, customization, options)?;

            if let Some(details) = &update.logo_details {
                item.logo_details = Some(details.clone());
            }
            if let Some(details) = &update.personalization_details {
                item.personalization_details = Some(details.clone());
            }
            if let Some(notes) = &update.production_notes {
                item.production_notes = Some(notes.clone());
            }
            Ok(())
        })
    }

    pub fn remove_item(&mut self, order_id: &str, item_id: &str) -> OrdersResult<Order> {
        self.modify(order_id, "remove_item", Utc::now(), |_, _, order| {
            let position = order
                .items
                .iter()
                .position(|item| item.id == item_id)
                .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;
            order.items.remove(position);
            Ok(())
        })
    }

    /// Changes shipping, discount or tax and recalculates.
    pub fn adjust_pricing(&mut self, order_id: &str, adjustment: &PricingAdjustment) -> OrdersResult<Order> {
        self.modify(order_id, "adjust_pricing", Utc::now(), |_, _, order| {
            if let Some(shipping_cost) = adjustment.shipping_cost {
                order.shipping_cost = shipping_cost;
            }
            if let Some(discount) = adjustment.discount_percentage {
                order.discount_percentage = discount;
            }
            if let Some(tax_rate) = adjustment.tax_rate {
                order.tax_rate = tax_rate;
            }
            Ok(())
        })
    }

    /// Updates address and notes. Money is unaffected.
    pub fn update_details(&mut self, order_id: &str, details: OrderDetails) -> OrdersResult<Order> {
        self.modify(order_id, "update_details", Utc::now(), |_, _, order| {
            if details.shipping_address.is_some() {
                order.shipping_address = details.shipping_address;
            }
            if details.notes.is_some() {
                order.notes = details.notes;
            }
            if details.internal_notes.is_some() {
                order.internal_notes = details.internal_notes;
            }
            if details.special_instructions.is_some() {
                order.special_instructions = details.special_instructions;
            }
            Ok(())
        })
    }

    /// Applies an edit to a copy of the stored order, recalculates, and
    /// commits only if every step succeeds.
    fn modify<F>(&mut self, order_id: &str, operation: &str, now: DateTime<Utc>, edit: F) -> OrdersResult<Order>
    where
        F: FnOnce(&C, &PricingOptions, &mut Order) -> OrdersResult<()>,
    {
        let options = &self.config.pricing;
        let result = self
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| OrdersError::OrderNotFound(order_id.to_string()))
            .and_then(|mut draft| {
                edit(&self.catalog, options, &mut draft)?;
                let mut next = recalculate(&draft, options)?;
                next.updated_at = now;
                Ok(next)
            });

        let order = result.map_err(|err| rejected(operation, order_id, err))?;

        debug!(
            order_number = %order.order_number,
            operation,
            subtotal = %order.subtotal,
            total = %order.total_amount,
            total_cost = %order.total_cost,
            margin = %order.profit_margin,
            "Order recalculated"
        );
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Moves an order to the named status, stamped with the current time.
    pub fn set_status(&mut self, order_id: &str, status: &str) -> OrdersResult<Order> {
        self.set_status_at(order_id, status, Utc::now())
    }

    /// [`set_status`](Self::set_status) with an explicit clock.
    pub fn set_status_at(&mut self, order_id: &str, status: &str, now: DateTime<Utc>) -> OrdersResult<Order> {
        let current = self
            .get_order(order_id)
            .map_err(|err| rejected("set_status", order_id, err))?;
        let from = current.status;

        let next = transition_named(current, status, now, &self.config.pricing)
            .map_err(|err| rejected("set_status", order_id, err.into()))?;

        info!(
            order_number = %next.order_number,
            from = %from,
            to = %next.status,
            "Order status changed"
        );
        self.orders.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Open orders grouped by status.
    pub fn kanban(&self) -> KanbanBoard {
        kanban_board(self.orders.values())
    }

    /// Dashboard metrics over the orders matching `filter`.
    pub fn analytics(&self, filter: &OrderFilter) -> OrderAnalytics {
        summarize(self.orders.values(), filter, Utc::now())
    }
}

fn rejected(operation: &str, subject: &str, err: OrdersError) -> OrdersError {
    warn!(
        operation,
        subject,
        field = err.field(),
        error = %err,
        "Request rejected"
    );
    err
}
