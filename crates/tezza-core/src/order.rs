//! # Orders
//!
//! The order entity, its line items and the status enum.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order (TW-20250114093000)                                             │
//! │  ├── status, dates                 ◄── lifecycle::transition()         │
//! │  ├── totals, cost fields, margin   ◄── lifecycle::recalculate()        │
//! │  └── items: Vec<LineItem>          (owned; dropped with the order)     │
//! │        ├── product_id              (immutable after creation)          │
//! │        ├── sku / name / cost       (snapshot of the product)           │
//! │        └── unit_price, line_total, per-item costs                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Flow
//! ```text
//!   QUOTE ──► CONFIRMED ──► IN_PRODUCTION ──► SHIPPED ──► DELIVERED
//!     │           │               │              │
//!     └───────────┴───────┬───────┴──────────────┘
//!                         ▼
//!                     CANCELLED
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::config::{PricingOptions, TransitionPolicy};
use crate::costs::{CostLine, LineCosts};
use crate::error::{CoreResult, ValidationError};
use crate::money::{round2, Money};
use crate::pricing;
use crate::types::{Customization, Percentage, Product, ProductCost};
use crate::validation::validate_quantity;

/// Order number prefix used when none is configured.
pub const DEFAULT_ORDER_PREFIX: &str = "TW";

// =============================================================================
// Order Status
// =============================================================================

/// Production status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Initial state; prices may still change.
    Quote,
    Confirmed,
    InProduction,
    Shipped,
    /// Terminal.
    Delivered,
    /// Terminal; reachable from any open status.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Quote
    }
}

impl OrderStatus {
    /// All statuses in stage order, cancellation last.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Quote,
        OrderStatus::Confirmed,
        OrderStatus::InProduction,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Wire name, as serialized.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Quote => "quote",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Checks if no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Position on the production line; `None` for cancellation.
    pub const fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Quote => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::InProduction => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// The adjacent production stage, if any.
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Quote => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::InProduction),
            OrderStatus::InProduction => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Transition table: statuses reachable from `self` under `policy`.
    ///
    /// ```text
    ///                 Lenient                              Strict
    /// QUOTE           CONF, IN_PROD, SHIP, DELIV, CANC     CONF, CANC
    /// CONFIRMED       IN_PROD, SHIP, DELIV, CANC           IN_PROD, CANC
    /// IN_PRODUCTION   SHIP, DELIV, CANC                    SHIP, CANC
    /// SHIPPED         DELIV, CANC                          DELIV, CANC
    /// DELIVERED       -                                    -
    /// CANCELLED       -                                    -
    /// ```
    pub const fn transitions(&self, policy: TransitionPolicy) -> &'static [OrderStatus] {
        use OrderStatus::*;

        match (policy, self) {
            (_, Delivered) | (_, Cancelled) => &[],
            (TransitionPolicy::Lenient, Quote) => {
                &[Confirmed, InProduction, Shipped, Delivered, Cancelled]
            }
            (TransitionPolicy::Lenient, Confirmed) => &[InProduction, Shipped, Delivered, Cancelled],
            (TransitionPolicy::Lenient, InProduction) => &[Shipped, Delivered, Cancelled],
            (TransitionPolicy::Strict, Quote) => &[Confirmed, Cancelled],
            (TransitionPolicy::Strict, Confirmed) => &[InProduction, Cancelled],
            (TransitionPolicy::Strict, InProduction) => &[Shipped, Cancelled],
            (_, Shipped) => &[Delivered, Cancelled],
        }
    }

    /// Checks a status change against the transition table.
    ///
    /// Re-entering the current status is accepted on open orders and changes
    /// nothing; terminal orders accept nothing at all.
    pub fn can_transition_to(&self, target: OrderStatus, policy: TransitionPolicy) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self == target || self.transitions(policy).contains(&target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    /// Accepts wire names in any case (`"in_production"`, `"IN_PRODUCTION"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

fn default_country() -> String {
    "USA".to_string()
}

/// Delivery address attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

// =============================================================================
// Line Items
// =============================================================================

/// A parsed request to put a product on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub customization: Customization,
    #[serde(default)]
    pub logo_details: Option<String>,
    #[serde(default)]
    pub personalization_details: Option<String>,
    #[serde(default)]
    pub production_notes: Option<String>,
}

/// A product on an order.
///
/// Uses the snapshot pattern: SKU, name and cost attributes are frozen when
/// the item is created, so catalog edits never reprice an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at time of ordering (frozen).
    pub sku_snapshot: String,
    /// Product name at time of ordering (frozen).
    pub name_snapshot: String,
    /// Cost attributes at time of ordering (frozen).
    pub cost_snapshot: ProductCost,
    pub quantity: i64,
    /// Discounted unit price with any customization surcharge folded in.
    pub unit_price: Money,
    pub customization: Customization,
    pub logo_details: Option<String>,
    pub personalization_details: Option<String>,
    /// Surcharge per unit; the product's at creation if customized, else zero.
    pub customization_cost: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
    pub unit_cost: Money,
    pub total_cost: Money,
    #[ts(as = "String")]
    pub labor_hours: Decimal,
    pub overhead_cost: Money,
    pub production_notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a priced line item from a catalog product.
    ///
    /// ## Errors
    /// - `InvalidQuantity` for quantity < 1
    /// - `CustomizationNotAllowed` when the product does not offer it
    /// - `InvalidProductData` for negative product cost figures
    pub fn from_product(
        order_id: &str,
        product: &Product,
        request: &LineItemRequest,
        options: &PricingOptions,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_quantity(request.quantity)?;
        product.check_customization(request.customization)?;

        let cost_snapshot = product.cost();
        let unit_price =
            pricing::unit_price(&cost_snapshot, request.quantity, request.customization.is_customized())?;

        let mut item = LineItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: product.id.clone(),
            sku_snapshot: product.sku.clone(),
            name_snapshot: product.name.clone(),
            customization_cost: surcharge_for(&cost_snapshot, request.customization),
            cost_snapshot,
            quantity: request.quantity,
            unit_price,
            customization: request.customization,
            logo_details: request.logo_details.clone(),
            personalization_details: request.personalization_details.clone(),
            line_total: Money::zero(),
            unit_cost: Money::zero(),
            total_cost: Money::zero(),
            labor_hours: Decimal::ZERO,
            overhead_cost: Money::zero(),
            production_notes: request.production_notes.clone(),
            created_at: now,
        };
        item.refresh(options)?;
        Ok(item)
    }

    /// Re-prices the line for a new quantity and customization, from the
    /// frozen cost snapshot.
    pub fn reprice(
        &mut self,
        quantity: i64,
        customization: Customization,
        options: &PricingOptions,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let unit_price =
            pricing::unit_price(&self.cost_snapshot, quantity, customization.is_customized())?;

        self.quantity = quantity;
        self.customization = customization;
        self.customization_cost = surcharge_for(&self.cost_snapshot, customization);
        self.unit_price = unit_price;
        self.refresh(options)
    }

    /// Re-derives the line total and per-item cost fields from the stored
    /// unit price. The unit price itself is left untouched.
    pub fn refresh(&mut self, options: &PricingOptions) -> CoreResult<()> {
        let costs = LineCosts::of(&*self, options)?;

        self.line_total = pricing::line_total(self.unit_price, self.quantity)?;
        self.unit_cost = self.cost_snapshot.base_cost;
        self.total_cost = Money::from_decimal(costs.materials);
        self.labor_hours = round2(costs.labor_hours);
        self.overhead_cost = Money::from_decimal(costs.overhead);
        Ok(())
    }
}

fn surcharge_for(cost: &ProductCost, customization: Customization) -> Money {
    if customization.is_customized() {
        cost.customization_cost
    } else {
        Money::zero()
    }
}

impl CostLine for LineItem {
    fn cost(&self) -> &ProductCost {
        &self.cost_snapshot
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn customization(&self) -> Customization {
        self.customization
    }
}

// =============================================================================
// Order
// =============================================================================

/// A client order: items, money, costs and production dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Human-readable business id (`TW-YYYYMMDDHHMMSS`).
    pub order_number: String,
    pub client_id: Option<String>,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,

    // Money
    pub subtotal: Money,
    #[ts(as = "String")]
    pub discount_percentage: Percentage,
    pub discount_amount: Money,
    #[ts(as = "String")]
    pub tax_rate: Percentage,
    pub tax_amount: Money,
    pub shipping_cost: Money,
    pub total_amount: Money,

    // Costs
    pub materials_cost: Money,
    #[ts(as = "String")]
    pub labor_hours: Decimal,
    pub labor_cost: Money,
    pub overhead_cost: Money,
    pub total_cost: Money,
    #[ts(as = "String")]
    pub profit_margin: Decimal,

    // Dates, each set at most once
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub confirmed_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub production_start_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub estimated_completion_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub ship_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub delivery_date: Option<DateTime<Utc>>,

    // Metadata
    pub shipping_address: Option<ShippingAddress>,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub special_instructions: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates an empty order in QUOTE status, taxed at the default rate.
    pub fn new(
        order_number: impl Into<String>,
        client_id: Option<String>,
        options: &PricingOptions,
        now: DateTime<Utc>,
    ) -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            order_number: order_number.into(),
            client_id,
            status: OrderStatus::Quote,
            items: Vec::new(),
            subtotal: Money::zero(),
            discount_percentage: Percentage::zero(),
            discount_amount: Money::zero(),
            tax_rate: options.default_tax_rate,
            tax_amount: Money::zero(),
            shipping_cost: Money::zero(),
            total_amount: Money::zero(),
            materials_cost: Money::zero(),
            labor_hours: Decimal::ZERO,
            labor_cost: Money::zero(),
            overhead_cost: Money::zero(),
            total_cost: Money::zero(),
            profit_margin: Decimal::ZERO,
            order_date: now,
            confirmed_date: None,
            production_start_date: None,
            estimated_completion_date: None,
            ship_date: None,
            delivery_date: None,
            shipping_address: None,
            notes: None,
            internal_notes: None,
            special_instructions: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all line-item quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

/// Builds an order number from a prefix and the creation time:
/// `TW-20250114093000`.
pub fn generate_order_number(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.format("%Y%m%d%H%M%S"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::ProductCategory;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn mug() -> Product {
        let mut product = Product::new(
            "MUG-11OZ",
            "Custom Coffee Mug",
            ProductCategory::Drinkware,
            Money::from_cents(500),
        );
        product.labor_hours = dec!(0.1);
        product.customization_cost = Money::from_cents(200);
        product
    }

    fn request(product: &Product, quantity: i64, customization: Customization) -> LineItemRequest {
        LineItemRequest {
            product_id: product.id.clone(),
            quantity,
            customization,
            logo_details: None,
            personalization_details: None,
            production_notes: None,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(OrderStatus::InProduction.to_string(), "in_production");
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProduction).unwrap(),
            "\"in_production\""
        );
        assert_eq!("IN_PRODUCTION".parse::<OrderStatus>().unwrap(), OrderStatus::InProduction);
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("archived".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;

        assert!(Quote.can_transition_to(Confirmed, TransitionPolicy::Strict));
        assert!(!Quote.can_transition_to(Shipped, TransitionPolicy::Strict));
        assert!(Quote.can_transition_to(Shipped, TransitionPolicy::Lenient));
        assert!(!Shipped.can_transition_to(Confirmed, TransitionPolicy::Lenient));
        assert!(Confirmed.can_transition_to(Confirmed, TransitionPolicy::Strict));

        for status in [Quote, Confirmed, InProduction, Shipped] {
            assert!(status.can_transition_to(Cancelled, TransitionPolicy::Strict));
        }
        for target in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(target, TransitionPolicy::Lenient));
            assert!(!Cancelled.can_transition_to(target, TransitionPolicy::Lenient));
        }
    }

    #[test]
    fn test_strict_table_only_holds_next_stage() {
        for status in OrderStatus::ALL {
            for target in status.transitions(TransitionPolicy::Strict) {
                assert!(*target == OrderStatus::Cancelled || status.next() == Some(*target));
            }
        }
    }

    #[test]
    fn test_line_item_from_product() {
        let product = mug();
        let item = LineItem::from_product(
            "order-1",
            &product,
            &request(&product, 50, Customization::LOGO),
            &PricingOptions::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(item.sku_snapshot, "MUG-11OZ");
        assert_eq!(item.unit_price.cents(), 785);
        assert_eq!(item.line_total.cents(), 39250);
        assert_eq!(item.customization_cost.cents(), 200);
        assert_eq!(item.unit_cost.cents(), 500);
        assert_eq!(item.total_cost.cents(), 25000);
        assert_eq!(item.labor_hours, dec!(17.5));
        assert_eq!(item.overhead_cost.cents(), 7500);
    }

    #[test]
    fn test_uncustomized_item_has_no_surcharge() {
        let product = mug();
        let item = LineItem::from_product(
            "order-1",
            &product,
            &request(&product, 10, Customization::NONE),
            &PricingOptions::default(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(item.customization_cost, Money::zero());
        assert_eq!(item.unit_price.cents(), 650);
    }

    #[test]
    fn test_line_item_rejects_disallowed_customization() {
        let product = mug();
        let personalized = Customization {
            has_logo: false,
            has_personalization: true,
        };
        let result = LineItem::from_product(
            "order-1",
            &product,
            &request(&product, 10, personalized),
            &PricingOptions::default(),
            Utc::now(),
        );
        assert!(matches!(result, Err(CoreError::CustomizationNotAllowed { .. })));
    }

    #[test]
    fn test_reprice_uses_snapshot_not_catalog() {
        let mut product = mug();
        let mut item = LineItem::from_product(
            "order-1",
            &product,
            &request(&product, 10, Customization::NONE),
            &PricingOptions::default(),
            Utc::now(),
        )
        .unwrap();

        // Catalog price change after the item was created
        product.base_cost = Money::from_cents(9900);

        item.reprice(30, Customization::LOGO, &PricingOptions::default())
            .unwrap();
        // 6.50 × 0.90 + 2.00 = 7.85
        assert_eq!(item.unit_price.cents(), 785);
        assert_eq!(item.line_total.cents(), 23550);
        assert_eq!(item.customization_cost.cents(), 200);

        assert_eq!(
            item.reprice(0, Customization::NONE, &PricingOptions::default()),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
    }

    #[test]
    fn test_refresh_rejects_line_total_past_money_range() {
        let product = mug();
        let mut item = LineItem::from_product(
            "order-1",
            &product,
            &request(&product, 10, Customization::NONE),
            &PricingOptions::default(),
            Utc::now(),
        )
        .unwrap();

        item.unit_price = Money::from_cents(i64::MAX / 2);
        assert!(matches!(
            item.refresh(&PricingOptions::default()),
            Err(CoreError::InvalidTotalsInput { ref field, .. }) if field == "line_total"
        ));
    }

    #[test]
    fn test_new_order_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 1, 14, 9, 30, 0).unwrap();
        let order = Order::new(
            generate_order_number(DEFAULT_ORDER_PREFIX, now),
            None,
            &PricingOptions::default(),
            now,
        );
        assert_eq!(order.order_number, "TW-20250114093000");
        assert_eq!(order.status, OrderStatus::Quote);
        assert_eq!(order.tax_rate.value(), dec!(8.5));
        assert_eq!(order.total_quantity(), 0);
        assert!(order.confirmed_date.is_none());
    }

    #[test]
    fn test_shipping_address_country_default() {
        let address: ShippingAddress = serde_json::from_str(
            r#"{"street":"1 Main St","city":"Austin","state":"TX","zip_code":"78701"}"#,
        )
        .unwrap();
        assert_eq!(address.country, "USA");
    }
}
