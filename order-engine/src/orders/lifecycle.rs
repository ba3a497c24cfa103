//! Order lifecycle state machine
//!
//! ```text
//! Pending ──► Ready ──► OnTheWay ──► Completed      (delivery)
//!    │          └─────────────────► Completed      (pickup)
//!    └──► Cancelled
//! ```
//!
//! Every legal move is a row in [`TRANSITIONS`]; anything not listed there is
//! a [`OrderError::StateConflict`]. Per-item receipt is tracked separately and
//! only while the order is `OnTheWay` or `Completed`.

use serde::{Deserialize, Serialize};
use shared::order::{ItemStatus, Order, OrderItemState, OrderStatus, OrderType};
use shared::util::now_millis;

use super::error::{OrderError, OrderResult};

/// Who is asking for a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "customer_id", rename_all = "snake_case")]
pub enum Actor {
    /// Customer account id
    Customer(String),
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permit {
    StaffOnly,
    OwnerOrStaff,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: OrderStatus,
    to: OrderStatus,
    /// `None` = any order type
    order_type: Option<OrderType>,
    permit: Permit,
}

const fn rule(
    from: OrderStatus,
    to: OrderStatus,
    order_type: Option<OrderType>,
    permit: Permit,
) -> Transition {
    Transition {
        from,
        to,
        order_type,
        permit,
    }
}

/// 状态转换表
const TRANSITIONS: &[Transition] = &[
    rule(OrderStatus::Pending, OrderStatus::Cancelled, None, Permit::OwnerOrStaff),
    rule(OrderStatus::Pending, OrderStatus::Ready, None, Permit::StaffOnly),
    rule(OrderStatus::Ready, OrderStatus::OnTheWay, Some(OrderType::Delivery), Permit::StaffOnly),
    rule(OrderStatus::Ready, OrderStatus::Completed, Some(OrderType::Pickup), Permit::StaffOnly),
    rule(OrderStatus::OnTheWay, OrderStatus::Completed, Some(OrderType::Delivery), Permit::StaffOnly),
];

fn applies_to(t: &Transition, order_type: OrderType) -> bool {
    t.order_type.is_none_or(|ty| ty == order_type)
}

/// Statuses reachable from `status` for an order of `order_type`
pub fn next_statuses(status: OrderStatus, order_type: OrderType) -> Vec<OrderStatus> {
    TRANSITIONS
        .iter()
        .filter(|t| t.from == status && applies_to(t, order_type))
        .map(|t| t.to)
        .collect()
}

/// Validate a transition without applying it
pub fn check_transition(order: &Order, target: OrderStatus, actor: &Actor) -> OrderResult<()> {
    let status = order.status;

    // 1. Terminal orders never move
    if status.is_terminal() {
        return Err(OrderError::state_conflict(
            status,
            format!("Order {} is already {:?}", order.display_id(), status),
        ));
    }

    // 2. Edge must exist for this order type
    let mut edges = TRANSITIONS
        .iter()
        .filter(|t| t.from == status && t.to == target)
        .peekable();
    if edges.peek().is_none() {
        return Err(OrderError::state_conflict(
            status,
            format!("Cannot move order from {:?} to {:?}", status, target),
        ));
    }
    let Some(edge) = edges.find(|t| applies_to(t, order.order_type)) else {
        return Err(OrderError::state_conflict(
            status,
            format!(
                "{:?} orders cannot move from {:?} to {:?}",
                order.order_type, status, target
            ),
        ));
    };

    // 3. Actor
    match (edge.permit, actor) {
        (_, Actor::Staff) => Ok(()),
        (Permit::OwnerOrStaff, Actor::Customer(customer_id))
            if order.customer_id.as_deref() == Some(customer_id.as_str()) =>
        {
            Ok(())
        }
        (Permit::OwnerOrStaff, Actor::Customer(_)) => Err(OrderError::Forbidden(format!(
            "Order {} belongs to another customer",
            order.display_id()
        ))),
        (Permit::StaffOnly, Actor::Customer(_)) => Err(OrderError::Forbidden(format!(
            "Only staff can move an order to {:?}",
            target
        ))),
    }
}

/// Validate and apply a transition
pub fn transition(order: &mut Order, target: OrderStatus, actor: &Actor) -> OrderResult<()> {
    if let Err(e) = check_transition(order, target, actor) {
        tracing::warn!(
            order_id = %order.display_id(),
            from = ?order.status,
            to = ?target,
            error = %e,
            "Transition rejected"
        );
        return Err(e);
    }
    let from = order.status;
    order.status = target;
    order.updated_at = now_millis();
    tracing::debug!(order_id = %order.display_id(), ?from, to = ?target, "Order status changed");
    Ok(())
}

/// Pending → Cancelled by the owning customer or staff
pub fn cancel(order: &mut Order, actor: &Actor) -> OrderResult<()> {
    transition(order, OrderStatus::Cancelled, actor)
}

/// Result of a receipt request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptOutcome {
    /// Item moved pending → received
    Marked,
    /// Item was already received; nothing changed
    AlreadyReceived,
}

/// Validate a receipt request without applying it
pub fn check_receipt(order: &Order, line_id: &str) -> OrderResult<ReceiptOutcome> {
    if !order.status.accepts_receipts() {
        return Err(OrderError::state_conflict(
            order.status,
            format!(
                "Items of order {} can only be received once it is on the way, order is {:?}",
                order.display_id(),
                order.status
            ),
        ));
    }
    if order.line(line_id).is_none() {
        return Err(OrderError::not_found("order line", line_id));
    }
    match order.item_state(line_id) {
        Some(state) if state.is_received() => Ok(ReceiptOutcome::AlreadyReceived),
        _ => Ok(ReceiptOutcome::Marked),
    }
}

/// Mark one line received (idempotent)
pub fn mark_item_received(order: &mut Order, line_id: &str) -> OrderResult<ReceiptOutcome> {
    let outcome = match check_receipt(order, line_id) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(order_id = %order.display_id(), line_id, error = %e, "Receipt rejected");
            return Err(e);
        }
    };
    if outcome == ReceiptOutcome::AlreadyReceived {
        tracing::debug!(order_id = %order.display_id(), line_id, "Item already received");
        return Ok(outcome);
    }

    let now = now_millis();
    match order
        .item_states
        .iter_mut()
        .find(|s| s.menu_item_id == line_id)
    {
        Some(state) => {
            state.item_status = ItemStatus::Received;
            state.received_at = Some(now);
        }
        None => order.item_states.push(OrderItemState {
            menu_item_id: line_id.to_string(),
            item_status: ItemStatus::Received,
            received_at: Some(now),
        }),
    }
    order.updated_at = now;
    tracing::debug!(order_id = %order.display_id(), line_id, "Item received");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::order::{LineItem, PaymentMethod};

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Ready,
        OrderStatus::OnTheWay,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    fn order(status: OrderStatus, order_type: OrderType) -> Order {
        Order {
            order_id: Some("ord-1".into()),
            status,
            order_type,
            customer_id: Some("cust-1".into()),
            lines: vec![
                LineItem::new("A", "Adobo", Decimal::from(100), 2),
                LineItem::new("B", "Rice", Decimal::from(20), 1),
            ],
            item_states: vec![OrderItemState::pending("A"), OrderItemState::pending("B")],
            delivery_address: Some("12 Mabini St".into()),
            customer_phone: Some("0917".into()),
            payment_method: PaymentMethod::Cash,
            notes: None,
            table: None,
            subtotal: Decimal::from(220),
            delivery_fee: Decimal::from(50),
            total: Decimal::from(270),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn owner() -> Actor {
        Actor::Customer("cust-1".into())
    }

    #[test]
    fn test_delivery_happy_path() {
        let mut o = order(OrderStatus::Pending, OrderType::Delivery);
        for target in [OrderStatus::Ready, OrderStatus::OnTheWay, OrderStatus::Completed] {
            transition(&mut o, target, &Actor::Staff).unwrap();
            assert_eq!(o.status, target);
        }
        assert!(o.is_terminal());
    }

    #[test]
    fn test_pickup_skips_on_the_way() {
        let mut o = order(OrderStatus::Ready, OrderType::Pickup);
        let err = transition(&mut o, OrderStatus::OnTheWay, &Actor::Staff).unwrap_err();
        assert!(matches!(err, OrderError::StateConflict { .. }));
        assert_eq!(o.status, OrderStatus::Ready);

        transition(&mut o, OrderStatus::Completed, &Actor::Staff).unwrap();
        assert_eq!(o.status, OrderStatus::Completed);
    }

    #[test]
    fn test_delivery_cannot_complete_from_ready() {
        let mut o = order(OrderStatus::Ready, OrderType::Delivery);
        let err = transition(&mut o, OrderStatus::Completed, &Actor::Staff).unwrap_err();
        assert!(matches!(err, OrderError::StateConflict { .. }));
    }

    #[test]
    fn test_no_transition_out_of_terminal() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for target in ALL {
                let o = order(terminal, OrderType::Delivery);
                let err = check_transition(&o, target, &Actor::Staff).unwrap_err();
                assert!(matches!(err, OrderError::StateConflict { status, .. } if status == terminal));
            }
        }
    }

    #[test]
    fn test_cancel_only_while_pending() {
        for status in ALL {
            let mut o = order(status, OrderType::Delivery);
            let result = cancel(&mut o, &owner());
            if status == OrderStatus::Pending {
                assert!(result.is_ok());
                assert_eq!(o.status, OrderStatus::Cancelled);
            } else {
                assert!(matches!(result, Err(OrderError::StateConflict { .. })), "{:?}", status);
                assert_eq!(o.status, status);
            }
        }
    }

    #[test]
    fn test_customer_permissions() {
        let o = order(OrderStatus::Pending, OrderType::Delivery);

        let err = check_transition(&o, OrderStatus::Ready, &owner()).unwrap_err();
        assert!(matches!(err, OrderError::Forbidden(_)));

        let stranger = Actor::Customer("cust-2".into());
        let err = check_transition(&o, OrderStatus::Cancelled, &stranger).unwrap_err();
        assert!(matches!(err, OrderError::Forbidden(_)));

        check_transition(&o, OrderStatus::Cancelled, &Actor::Staff).unwrap();
    }

    #[test]
    fn test_customer_cannot_cancel_pos_order() {
        let mut o = order(OrderStatus::Pending, OrderType::Pickup);
        o.customer_id = None;
        let err = cancel(&mut o, &owner()).unwrap_err();
        assert!(matches!(err, OrderError::Forbidden(_)));
        assert_eq!(o.status, OrderStatus::Pending);
    }

    #[test]
    fn test_next_statuses() {
        assert_eq!(
            next_statuses(OrderStatus::Pending, OrderType::Delivery),
            vec![OrderStatus::Cancelled, OrderStatus::Ready]
        );
        assert_eq!(
            next_statuses(OrderStatus::Ready, OrderType::Delivery),
            vec![OrderStatus::OnTheWay]
        );
        assert_eq!(
            next_statuses(OrderStatus::Ready, OrderType::Pickup),
            vec![OrderStatus::Completed]
        );
        assert!(next_statuses(OrderStatus::OnTheWay, OrderType::Pickup).is_empty());
        assert!(next_statuses(OrderStatus::Completed, OrderType::Delivery).is_empty());
        assert!(next_statuses(OrderStatus::Cancelled, OrderType::Pickup).is_empty());
    }

    #[test]
    fn test_every_listed_next_status_is_accepted() {
        for status in ALL {
            for order_type in [OrderType::Delivery, OrderType::Pickup] {
                let o = order(status, order_type);
                for target in ALL {
                    let listed = next_statuses(status, order_type).contains(&target);
                    let accepted = check_transition(&o, target, &Actor::Staff).is_ok();
                    assert_eq!(listed, accepted, "{:?} {:?} -> {:?}", order_type, status, target);
                }
            }
        }
    }

    #[test]
    fn test_receipt_is_idempotent() {
        let mut o = order(OrderStatus::OnTheWay, OrderType::Delivery);

        assert_eq!(mark_item_received(&mut o, "A").unwrap(), ReceiptOutcome::Marked);
        let received_at = o.item_state("A").unwrap().received_at;
        assert!(received_at.is_some());

        assert_eq!(
            mark_item_received(&mut o, "A").unwrap(),
            ReceiptOutcome::AlreadyReceived
        );
        assert_eq!(o.item_state("A").unwrap().received_at, received_at);
        assert!(o.item_state("A").unwrap().is_received());
        assert!(!o.all_items_received());

        mark_item_received(&mut o, "B").unwrap();
        assert!(o.all_items_received());
    }

    #[test]
    fn test_receipt_requires_on_the_way_or_completed() {
        for status in [OrderStatus::Pending, OrderStatus::Ready, OrderStatus::Cancelled] {
            let mut o = order(status, OrderType::Delivery);
            let err = mark_item_received(&mut o, "A").unwrap_err();
            assert!(matches!(err, OrderError::StateConflict { .. }), "{:?}", status);
            assert!(!o.item_state("A").unwrap().is_received());
        }

        let mut o = order(OrderStatus::Completed, OrderType::Pickup);
        assert_eq!(mark_item_received(&mut o, "B").unwrap(), ReceiptOutcome::Marked);
    }

    #[test]
    fn test_receipt_unknown_line() {
        let mut o = order(OrderStatus::OnTheWay, OrderType::Delivery);
        let err = mark_item_received(&mut o, "Z").unwrap_err();
        assert_eq!(err, OrderError::not_found("order line", "Z"));
    }

    #[test]
    fn test_receipt_survives_completion() {
        let mut o = order(OrderStatus::OnTheWay, OrderType::Delivery);
        mark_item_received(&mut o, "A").unwrap();
        transition(&mut o, OrderStatus::Completed, &Actor::Staff).unwrap();
        assert!(o.item_state("A").unwrap().is_received());
    }

    #[test]
    fn test_actor_wire_format() {
        let json = serde_json::to_value(owner()).unwrap();
        assert_eq!(json["role"], "customer");
        assert_eq!(json["customer_id"], "cust-1");
        let json = serde_json::to_value(Actor::Staff).unwrap();
        assert_eq!(json["role"], "staff");
    }
}
