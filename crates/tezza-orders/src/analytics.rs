//! # Order Analytics
//!
//! Read-only views over a set of orders: the production kanban board and
//! the dashboard summary.
//!
//! ```text
//! ┌────────────┬────────────┬───────────────┬────────────┐
//! │   QUOTE    │ CONFIRMED  │ IN_PRODUCTION │  SHIPPED   │
//! ├────────────┼────────────┼───────────────┼────────────┤
//! │ TW-...0930 │ TW-...1102 │ TW-...0815    │ TW-...1540 │
//! │ TW-...1010 │            │ TW-...1300    │            │
//! └────────────┴────────────┴───────────────┴────────────┘
//!   DELIVERED and CANCELLED orders are off the board.
//! ```

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use tezza_core::{Money, Order, OrderStatus};

use crate::service::OrderFilter;

/// Columns of the kanban board, left to right.
pub const KANBAN_STATUSES: [OrderStatus; 4] = [
    OrderStatus::Quote,
    OrderStatus::Confirmed,
    OrderStatus::InProduction,
    OrderStatus::Shipped,
];

/// Number of entries in the top products list.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Days covered by the monthly revenue trend.
pub const REVENUE_TREND_DAYS: i64 = 180;

// =============================================================================
// Kanban Board
// =============================================================================

/// Summary of one order on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderCard {
    pub id: String,
    pub order_number: String,
    pub client_id: Option<String>,
    pub total_amount: Money,
    pub total_quantity: i64,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub estimated_completion_date: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderCard {
    fn from(order: &Order) -> Self {
        OrderCard {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            client_id: order.client_id.clone(),
            total_amount: order.total_amount,
            total_quantity: order.total_quantity(),
            order_date: order.order_date,
            estimated_completion_date: order.estimated_completion_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KanbanColumn {
    pub status: OrderStatus,
    pub orders: Vec<OrderCard>,
}

/// Open orders grouped by status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    pub fn column(&self, status: OrderStatus) -> Option<&KanbanColumn> {
        self.columns.iter().find(|column| column.status == status)
    }
}

/// Builds the board; cards in a column are oldest first.
pub fn kanban_board<'a, I>(orders: I) -> KanbanBoard
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut columns: Vec<KanbanColumn> = KANBAN_STATUSES
        .iter()
        .map(|&status| KanbanColumn {
            status,
            orders: Vec::new(),
        })
        .collect();

    for order in orders {
        if let Some(column) = columns.iter_mut().find(|column| column.status == order.status) {
            column.orders.push(OrderCard::from(order));
        }
    }

    for column in &mut columns {
        column
            .orders
            .sort_by(|a, b| a.order_date.cmp(&b.order_date).then_with(|| a.order_number.cmp(&b.order_number)));
    }

    KanbanBoard { columns }
}

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusTotals {
    pub status: OrderStatus,
    pub count: usize,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub revenue: Money,
}

/// Dashboard metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderAnalytics {
    pub total_orders: usize,
    pub total_revenue: Money,
    pub average_order_value: Money,
    /// Statuses with at least one order, in stage order.
    pub by_status: Vec<StatusTotals>,
    /// Best sellers by quantity.
    pub top_products: Vec<ProductSales>,
    /// Revenue per calendar month over the trailing trend window, oldest
    /// first. Ignores the filter's date range.
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Computes dashboard metrics for the orders matching `filter`.
///
/// Revenue is the order grand total; cancelled orders count like any other,
/// so callers wanting booked revenue only filter by status.
pub fn summarize<'a, I>(orders: I, filter: &OrderFilter, now: DateTime<Utc>) -> OrderAnalytics
where
    I: IntoIterator<Item = &'a Order>,
{
    let all: Vec<&Order> = orders.into_iter().collect();
    let selected: Vec<&Order> = all.iter().copied().filter(|order| filter.matches(order)).collect();

    let total_orders = selected.len();
    let total_revenue: Money = selected.iter().map(|order| order.total_amount).sum();
    let average_order_value = if total_orders == 0 {
        Money::zero()
    } else {
        Money::from_decimal(total_revenue.to_decimal() / Decimal::from(total_orders as i64))
    };

    let by_status = OrderStatus::ALL
        .iter()
        .filter_map(|&status| {
            let matching: Vec<&&Order> = selected.iter().filter(|order| order.status == status).collect();
            if matching.is_empty() {
                return None;
            }
            Some(StatusTotals {
                status,
                count: matching.len(),
                revenue: matching.iter().map(|order| order.total_amount).sum(),
            })
        })
        .collect();

    OrderAnalytics {
        total_orders,
        total_revenue,
        average_order_value,
        by_status,
        top_products: top_products(&selected),
        monthly_revenue: monthly_revenue(&all, now),
    }
}

fn top_products(orders: &[&Order]) -> Vec<ProductSales> {
    let mut by_name: HashMap<&str, (i64, Money)> = HashMap::new();
    for item in orders.iter().flat_map(|order| order.items.iter()) {
        let entry = by_name
            .entry(item.name_snapshot.as_str())
            .or_insert((0, Money::zero()));
        entry.0 += item.quantity;
        entry.1 += item.line_total;
    }

    let mut sales: Vec<ProductSales> = by_name
        .into_iter()
        .map(|(name, (quantity, revenue))| ProductSales {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    sales.truncate(TOP_PRODUCTS_LIMIT);
    sales
}

fn monthly_revenue(orders: &[&Order], now: DateTime<Utc>) -> Vec<MonthlyRevenue> {
    let since = now - Duration::days(REVENUE_TREND_DAYS);

    let mut by_month: BTreeMap<(i32, u32), Money> = BTreeMap::new();
    for order in orders.iter().filter(|order| order.order_date >= since) {
        let key = (order.order_date.year(), order.order_date.month());
        *by_month.entry(key).or_insert_with(Money::zero) += order.total_amount;
    }

    by_month
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            year,
            month,
            revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tezza_core::{LineItem, LineItemRequest, PricingOptions, Product, ProductCategory};

    fn day(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 12, 0, 0).unwrap()
    }

    fn order(number: &str, status: OrderStatus, total_cents: i64, date: DateTime<Utc>) -> Order {
        let mut order = Order::new(number, None, &PricingOptions::default(), date);
        order.status = status;
        order.total_amount = Money::from_cents(total_cents);
        order
    }

    fn with_item(mut order: Order, name: &str, quantity: i64) -> Order {
        let product = Product::new("SKU-1", name, ProductCategory::Bags, Money::from_cents(1000));
        let request = LineItemRequest {
            product_id: product.id.clone(),
            quantity,
            customization: Default::default(),
            logo_details: None,
            personalization_details: None,
            production_notes: None,
        };
        let item = LineItem::from_product(&order.id, &product, &request, &PricingOptions::default(), order.order_date)
            .unwrap();
        order.items.push(item);
        order
    }

    #[test]
    fn test_kanban_groups_open_orders() {
        let orders = vec![
            order("TW-3", OrderStatus::Quote, 100, day(3, 3)),
            order("TW-1", OrderStatus::Quote, 100, day(3, 1)),
            order("TW-2", OrderStatus::InProduction, 100, day(3, 2)),
            order("TW-4", OrderStatus::Delivered, 100, day(3, 4)),
            order("TW-5", OrderStatus::Cancelled, 100, day(3, 5)),
        ];

        let board = kanban_board(&orders);
        assert_eq!(board.columns.len(), 4);

        let quotes = board.column(OrderStatus::Quote).unwrap();
        let numbers: Vec<&str> = quotes.orders.iter().map(|card| card.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["TW-1", "TW-3"]);

        assert_eq!(board.column(OrderStatus::InProduction).unwrap().orders.len(), 1);
        assert!(board.column(OrderStatus::Shipped).unwrap().orders.is_empty());
        assert!(board.column(OrderStatus::Delivered).is_none());
    }

    #[test]
    fn test_summary_totals() {
        let orders = vec![
            order("TW-1", OrderStatus::Quote, 10000, day(3, 1)),
            order("TW-2", OrderStatus::Quote, 5000, day(3, 2)),
            order("TW-3", OrderStatus::Shipped, 2001, day(3, 3)),
        ];

        let summary = summarize(&orders, &OrderFilter::default(), day(3, 10));
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_revenue.cents(), 17001);
        // 170.01 / 3 = 56.67
        assert_eq!(summary.average_order_value.cents(), 5667);
        assert_eq!(summary.by_status.len(), 2);
        assert_eq!(summary.by_status[0].status, OrderStatus::Quote);
        assert_eq!(summary.by_status[0].count, 2);
        assert_eq!(summary.by_status[0].revenue.cents(), 15000);
    }

    #[test]
    fn test_summary_of_nothing() {
        let orders: Vec<Order> = Vec::new();
        let summary = summarize(&orders, &OrderFilter::default(), day(3, 10));
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.average_order_value, Money::zero());
        assert!(summary.by_status.is_empty());
    }

    #[test]
    fn test_top_products_by_quantity() {
        let names = ["Tote", "Mug", "Bottle", "Pen", "Hoodie", "Cap"];
        let mut orders = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let base = order(&format!("TW-{}", i), OrderStatus::Quote, 0, day(3, 1));
            orders.push(with_item(base, name, (i as i64 + 1) * 10));
        }
        orders.push(with_item(order("TW-X", OrderStatus::Quote, 0, day(3, 2)), "Tote", 100));

        let summary = summarize(&orders, &OrderFilter::default(), day(3, 10));
        assert_eq!(summary.top_products.len(), TOP_PRODUCTS_LIMIT);
        assert_eq!(summary.top_products[0].name, "Tote");
        assert_eq!(summary.top_products[0].quantity, 110);
        assert_eq!(summary.top_products[1].name, "Cap");
        assert!(summary.top_products.iter().all(|p| p.name != "Mug"));
    }

    #[test]
    fn test_monthly_trend_and_filter() {
        let orders = vec![
            order("TW-OLD", OrderStatus::Delivered, 9999, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            order("TW-1", OrderStatus::Delivered, 1000, day(1, 15)),
            order("TW-2", OrderStatus::Quote, 2000, day(3, 1)),
            order("TW-3", OrderStatus::Quote, 500, day(3, 20)),
        ];
        let filter = OrderFilter {
            status: Some(OrderStatus::Quote),
            ..OrderFilter::default()
        };

        let summary = summarize(&orders, &filter, day(3, 31));
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_revenue.cents(), 2500);

        let months: Vec<(i32, u32, i64)> = summary
            .monthly_revenue
            .iter()
            .map(|m| (m.year, m.month, m.revenue.cents()))
            .collect();
        assert_eq!(months, vec![(2025, 1, 1000), (2025, 3, 2500)]);
    }
}
