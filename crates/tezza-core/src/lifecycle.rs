//! # Order Lifecycle
//!
//! Status transitions and recalculation, both as value transformations:
//! each takes an `&Order` and returns the next `Order`. The caller decides
//! whether to persist the result, and a rejected call leaves the input as it
//! was.
//!
//! ## Date Stamping
//! ```text
//! ┌───────────────┬──────────────────────────────────────────────────────┐
//! │ entering      │ sets (only if still unset)                           │
//! ├───────────────┼──────────────────────────────────────────────────────┤
//! │ CONFIRMED     │ confirmed_date                                       │
//! │ IN_PRODUCTION │ production_start_date, estimated_completion_date     │
//! │ SHIPPED       │ ship_date                                            │
//! │ DELIVERED     │ delivery_date                                        │
//! └───────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions never recalculate money; recalculation never touches status
//! or dates.

use chrono::{DateTime, Duration, Utc};

use crate::config::PricingOptions;
use crate::costs::estimate_costs;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::{Order, OrderStatus};
use crate::pricing::profit_margin;
use crate::totals::{compute_totals, TotalsInput};

// =============================================================================
// Transitions
// =============================================================================

/// Moves an order to `target`, stamping the stage date on first entry.
///
/// ## Errors
/// `InvalidTransition` when the order is terminal or the transition table
/// of `options.transition_policy` does not allow the move. `InvalidQuantity`
/// when the completion estimate falls outside the calendar range.
pub fn transition(
    order: &Order,
    target: OrderStatus,
    now: DateTime<Utc>,
    options: &PricingOptions,
) -> CoreResult<Order> {
    if !order.status.can_transition_to(target, options.transition_policy) {
        return Err(CoreError::InvalidTransition {
            from: order.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    let mut next = order.clone();
    match target {
        OrderStatus::Confirmed => stamp(&mut next.confirmed_date, now),
        OrderStatus::InProduction => {
            if next.production_start_date.is_none() {
                next.production_start_date = Some(now);
                next.estimated_completion_date =
                    Some(estimated_completion(now, next.total_quantity(), options)?);
            }
        }
        OrderStatus::Shipped => stamp(&mut next.ship_date, now),
        OrderStatus::Delivered => stamp(&mut next.delivery_date, now),
        OrderStatus::Quote | OrderStatus::Cancelled => {}
    }

    if next.status != target {
        next.status = target;
        next.updated_at = now;
    }
    Ok(next)
}

/// Like [`transition`], with the target given by name.
///
/// An unrecognised name is an `InvalidTransition`, not a validation error:
/// the order cannot move there either way.
pub fn transition_named(
    order: &Order,
    target: &str,
    now: DateTime<Utc>,
    options: &PricingOptions,
) -> CoreResult<Order> {
    let status = target
        .parse::<OrderStatus>()
        .map_err(|_| CoreError::InvalidTransition {
            from: order.status.as_str().to_string(),
            to: target.to_string(),
        })?;
    transition(order, status, now, options)
}

fn stamp(date: &mut Option<DateTime<Utc>>, now: DateTime<Utc>) {
    if date.is_none() {
        *date = Some(now);
    }
}

/// Production start plus `total_quantity / capacity` whole days plus the
/// fixed buffer.
///
/// ## Errors
/// `InvalidQuantity` when the day count or the resulting date is out of range.
pub fn estimated_completion(
    production_start: DateTime<Utc>,
    total_quantity: i64,
    options: &PricingOptions,
) -> CoreResult<DateTime<Utc>> {
    // Capacity below 1 counts as 1.
    let capacity = options.production_units_per_day.max(1);
    (total_quantity / capacity)
        .checked_add(options.production_buffer_days)
        .and_then(Duration::try_days)
        .and_then(|days| production_start.checked_add_signed(days))
        .ok_or(CoreError::InvalidQuantity {
            quantity: total_quantity,
        })
}

// =============================================================================
// Recalculation
// =============================================================================

/// Re-derives every money and cost field of an order from its items.
///
/// Line totals are re-summed from the stored unit prices, then the cost
/// estimator and the totals step run over the result. Running it twice on
/// an unchanged order yields the same order.
pub fn recalculate(order: &Order, options: &PricingOptions) -> CoreResult<Order> {
    let mut next = order.clone();

    let mut subtotal = Money::zero();
    for item in &mut next.items {
        item.refresh(options)?;
        subtotal = subtotal
            .checked_add(item.line_total)
            .ok_or_else(|| CoreError::amount_overflow("subtotal"))?;
    }

    let costs = estimate_costs(&next.items, options)?;
    let totals = compute_totals(
        &TotalsInput {
            subtotal,
            discount_percentage: next.discount_percentage,
            tax_rate: Some(next.tax_rate),
            shipping_cost: next.shipping_cost,
        },
        options,
    )?;

    next.subtotal = totals.subtotal;
    next.discount_amount = totals.discount_amount;
    next.tax_amount = totals.tax_amount;
    next.total_amount = totals.total_amount;

    next.materials_cost = costs.materials_cost;
    next.labor_hours = costs.labor_hours;
    next.labor_cost = costs.labor_cost;
    next.overhead_cost = costs.overhead_cost;
    next.total_cost = costs.total_cost;
    next.profit_margin = profit_margin(totals.total_amount, costs.total_cost);

    Ok(next)
}

// =============================================================================
// Unit Tests
// =============================================================================
