//! Order snapshot - a composed draft or a backend-confirmed order
//!
//! A snapshot without `order_id` is a draft that has not been accepted by the
//! backing store yet. Once confirmed, the backend assigns the id and the
//! snapshot only changes through lifecycle transitions or Pending-only edits.

use super::types::{LineItem, OrderItemState, OrderType, PaymentMethod, TableAssignment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Ready,
    OnTheWay,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// No transition out of a terminal status is ever valid
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Lines, address, phone, payment method and notes are editable
    pub fn can_edit(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Customer or staff may still cancel
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Per-item receipt may be recorded
    pub fn accepts_receipts(&self) -> bool {
        matches!(self, OrderStatus::OnTheWay | OrderStatus::Completed)
    }
}

/// Order snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by the backend on confirmation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    /// Account that placed the order (online orders only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Lines in display order
    pub lines: Vec<LineItem>,
    /// Receipt tracking, one entry per line
    #[serde(default)]
    pub item_states: Vec<OrderItemState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// POS table (dine-in orders only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableAssignment>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Draft not yet accepted by the backend
    pub fn is_draft(&self) -> bool {
        self.order_id.is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Order id for logs, `"<draft>"` before confirmation
    pub fn display_id(&self) -> &str {
        self.order_id.as_deref().unwrap_or("<draft>")
    }

    pub fn line(&self, menu_item_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.menu_item_id() == menu_item_id)
    }

    pub fn item_state(&self, menu_item_id: &str) -> Option<&OrderItemState> {
        self.item_states
            .iter()
            .find(|s| s.menu_item_id == menu_item_id)
    }

    /// Sum of quantities across lines
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(LineItem::quantity).sum()
    }

    /// Every line has been marked received
    pub fn all_items_received(&self) -> bool {
        !self.item_states.is_empty() && self.item_states.iter().all(OrderItemState::is_received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(!OrderStatus::OnTheWay.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(OrderStatus::Pending.can_edit());
        for status in [
            OrderStatus::Ready,
            OrderStatus::OnTheWay,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!status.can_edit(), "{:?} must not be editable", status);
        }
    }

    #[test]
    fn test_status_wire_name() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OnTheWay).unwrap(),
            "\"ON_THE_WAY\""
        );
    }
}
