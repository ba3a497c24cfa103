//! Shared types for carts and orders

use crate::models::MenuItemRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Type
// ============================================================================

/// 订单类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// 外送 - carries the delivery fee
    #[default]
    Delivery,
    /// 自取
    Pickup,
}

// ============================================================================
// Payment Method
// ============================================================================

/// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    /// E-wallet / online transfer, verified outside the engine
    Online,
}

impl PaymentMethod {
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// One product line in a cart or order
///
/// `line_total` is always derived from `quantity * unit_price`; there is no
/// way to set it directly, and deserialization recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "LineItemRepr")]
pub struct LineItem {
    menu_item_id: String,
    item_name: String,
    unit_price: Decimal,
    quantity: i32,
    line_total: Decimal,
}

#[derive(Deserialize)]
struct LineItemRepr {
    menu_item_id: String,
    item_name: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<LineItemRepr> for LineItem {
    fn from(repr: LineItemRepr) -> Self {
        LineItem::new(repr.menu_item_id, repr.item_name, repr.unit_price, repr.quantity)
    }
}

impl LineItem {
    pub fn new(
        menu_item_id: impl Into<String>,
        item_name: impl Into<String>,
        unit_price: Decimal,
        quantity: i32,
    ) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            item_name: item_name.into(),
            unit_price,
            quantity,
            line_total: unit_price.saturating_mul(Decimal::from(quantity)),
        }
    }

    /// Start a line with the snapshot's current name and price
    pub fn from_menu_item(item: &MenuItemRef, quantity: i32) -> Self {
        Self::new(item.id.clone(), item.name.clone(), item.price, quantity)
    }

    pub fn menu_item_id(&self) -> &str {
        &self.menu_item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }

    /// Callers guarantee `quantity >= 1`; removal is handled by the owner of the line.
    pub fn set_quantity(&mut self, quantity: i32) {
        debug_assert!(quantity >= 1, "line quantity must stay positive");
        self.quantity = quantity;
        self.recompute();
    }

    /// Take name and price from a newer snapshot of the same item
    pub fn refresh_from(&mut self, item: &MenuItemRef) {
        debug_assert_eq!(item.id, self.menu_item_id);
        self.item_name = item.name.clone();
        self.unit_price = item.price;
        self.recompute();
    }

    // Saturates; out-of-range prices are rejected by order validation
    fn recompute(&mut self) {
        self.line_total = self.unit_price.saturating_mul(Decimal::from(self.quantity));
    }
}

// ============================================================================
// Per-item fulfilment
// ============================================================================

/// 单品收货状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Received,
}

/// Per-line fulfilment tracking within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemState {
    /// Line id (one line per menu item)
    pub menu_item_id: String,
    pub item_status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<i64>,
}

impl OrderItemState {
    pub fn pending(menu_item_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            item_status: ItemStatus::Pending,
            received_at: None,
        }
    }

    pub fn is_received(&self) -> bool {
        self.item_status == ItemStatus::Received
    }
}

// ============================================================================
// POS table assignment
// ============================================================================

/// Table and guest a POS order is placed against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableAssignment {
    pub table_number: u32,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
}
