//! Money calculation utilities using rust_decimal for precision
//!
//! Every subtotal, delivery fee and total in the engine is derived here, so
//! the cart page, checkout, the order editor and the POS composer can never
//! disagree about what an order costs.

use crate::orders::OrderError;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::order::{LineItem, OrderType};
use std::str::FromStr;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Flat delivery fee, charged only on delivery orders
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Maximum amount accepted as cash tender (1,000,000)
const MAX_TENDER_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum unit price of a menu item (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Derived monetary totals of a cart or order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Delivery fee for an order type
pub fn delivery_fee(order_type: OrderType) -> Decimal {
    match order_type {
        OrderType::Delivery => DELIVERY_FEE,
        OrderType::Pickup => Decimal::ZERO,
    }
}

/// Sum of line totals
pub fn subtotal<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> Decimal {
    lines.into_iter().map(LineItem::line_total).sum()
}

/// `subtotal + delivery_fee`, the single source of truth for totals
pub fn compute_totals<'a>(
    lines: impl IntoIterator<Item = &'a LineItem>,
    order_type: OrderType,
) -> Totals {
    let subtotal = subtotal(lines);
    let delivery_fee = delivery_fee(order_type);
    Totals {
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
    }
}

/// Unit price must be non-negative and at most [`MAX_PRICE`]
///
/// Keeps every `quantity * unit_price` and the sums built from it far from
/// `Decimal` overflow.
pub fn validate_unit_price(item_id: &str, price: Decimal) -> Result<(), OrderError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(OrderError::validation(
            "unit_price",
            format!("unit_price for {item_id} must not be negative, got {price}"),
        ));
    }
    if price > MAX_PRICE {
        return Err(OrderError::validation(
            "unit_price",
            format!("unit_price for {item_id} exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    Ok(())
}

/// Round to 2 decimal places, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse an amount typed by staff ("200", "199.5", " 1,250.00 ")
///
/// Thousands separators and surrounding whitespace are tolerated; blank,
/// negative, non-numeric or absurdly large input is rejected.
pub fn parse_amount(input: &str, field: &'static str) -> Result<Decimal, OrderError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Err(OrderError::validation(field, format!("{field} is required")));
    }
    let value = Decimal::from_str(&cleaned).map_err(|_| {
        OrderError::validation(field, format!("{field} is not a valid amount: {input:?}"))
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(OrderError::validation(
            field,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    if value > MAX_TENDER_AMOUNT {
        return Err(OrderError::validation(
            field,
            format!("{field} exceeds maximum allowed ({MAX_TENDER_AMOUNT}), got {value}"),
        ));
    }
    Ok(round_money(value))
}

#[cfg(test)]
mod tests;
