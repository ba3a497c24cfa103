//! Order composer
//!
//! Turns a cart, a POS selection, or a revision of a pending order into a
//! candidate [`Order`]. Composing never talks to the backing store; the result
//! is a draft (no `order_id`) or a revised copy, and the inputs are never
//! modified.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::order::{
    LineItem, Order, OrderItemState, OrderStatus, OrderType, PaymentMethod, TableAssignment,
};
use shared::util::now_millis;

use super::cart::Cart;
use super::draft::DraftOrder;
use super::error::{OrderError, OrderResult};
use crate::core::Limits;
use crate::order_money::{self, Totals};
use crate::utils::validation::{normalize_text, validate_optional_text, validate_required_text};

/// Customer checkout form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub customer_id: Option<String>,
    pub delivery_address: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// POS order form (table + guest)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PosDetails {
    pub table_number: Option<u32>,
    pub customer_name: Option<String>,
    pub staff_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Fields to replace on a pending order; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRevision {
    pub lines: Option<Vec<LineItem>>,
    pub delivery_address: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl OrderRevision {
    pub fn is_empty(&self) -> bool {
        self.lines.is_none()
            && self.delivery_address.is_none()
            && self.customer_phone.is_none()
            && self.payment_method.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderComposer {
    limits: Limits,
}

impl OrderComposer {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Compose a customer order from the cart
    ///
    /// Totals are copied from the cart as they are at compose time.
    pub fn compose_from_cart(&self, cart: &Cart, details: CheckoutDetails) -> OrderResult<Order> {
        let order_type = cart.order_type();
        let address = normalize_text(details.delivery_address);
        let phone = normalize_text(details.customer_phone);
        let notes = normalize_text(details.notes);

        // 1. Required fields by order type
        if order_type == OrderType::Delivery {
            validate_required_text(
                address.as_deref(),
                "delivery_address",
                self.limits.max_address_len,
            )?;
        }
        validate_required_text(phone.as_deref(), "customer_phone", self.limits.max_phone_len)?;
        validate_optional_text(notes.as_deref(), "notes", self.limits.max_note_len)?;

        // 2. Lines
        if cart.is_empty() {
            return Err(OrderError::validation("lines", "at least one line is required"));
        }

        // 3. Build draft
        let mut order = new_draft(order_type, cart.lines().to_vec(), cart.totals());
        order.customer_id = normalize_text(details.customer_id);
        order.delivery_address = match order_type {
            OrderType::Delivery => address,
            OrderType::Pickup => None,
        };
        order.customer_phone = phone;
        order.payment_method = details.payment_method;
        order.notes = notes;

        tracing::debug!(
            order_type = ?order_type,
            lines = order.lines.len(),
            total = %order.total,
            "Order composed from cart"
        );
        Ok(order)
    }

    /// Compose a staff POS order from a freeform selection
    ///
    /// POS orders are served at the counter/table, so they carry no delivery fee.
    pub fn compose_from_selection(
        &self,
        lines: &[LineItem],
        details: PosDetails,
    ) -> OrderResult<Order> {
        let customer_name = normalize_text(details.customer_name);
        let phone = normalize_text(details.customer_phone);
        let notes = normalize_text(details.notes);

        // 1. Table + guest
        let Some(table_number) = details.table_number else {
            return Err(OrderError::validation("table_number", "table_number is required"));
        };
        if table_number == 0 {
            return Err(OrderError::validation(
                "table_number",
                "table_number must be positive",
            ));
        }
        validate_required_text(customer_name.as_deref(), "customer_name", self.limits.max_name_len)?;
        validate_optional_text(phone.as_deref(), "customer_phone", self.limits.max_phone_len)?;
        validate_optional_text(notes.as_deref(), "notes", self.limits.max_note_len)?;

        // 2. Lines
        self.validate_lines(lines)?;

        // 3. Build draft
        let order_type = OrderType::Pickup;
        let totals = order_money::compute_totals(lines, order_type);
        let mut order = new_draft(order_type, lines.to_vec(), totals);
        order.customer_phone = phone;
        order.payment_method = details.payment_method;
        order.notes = notes;
        order.table = Some(TableAssignment {
            table_number,
            // validated above
            customer_name: customer_name.unwrap_or_default(),
            staff_name: normalize_text(details.staff_name),
        });

        tracing::debug!(
            table_number,
            lines = order.lines.len(),
            total = %order.total,
            "Order composed from POS selection"
        );
        Ok(order)
    }

    /// Compose a POS order from a draft built line by line
    pub fn compose_from_draft(&self, draft: &DraftOrder, details: PosDetails) -> OrderResult<Order> {
        self.compose_from_selection(draft.lines(), details)
    }

    /// Apply a revision to a pending order
    ///
    /// Returns the revised copy; `order` is untouched whether or not this
    /// succeeds.
    pub fn revise_existing_order(
        &self,
        order: &Order,
        revision: OrderRevision,
    ) -> OrderResult<Order> {
        // 1. Only pending orders are editable
        if !order.status.can_edit() {
            tracing::warn!(
                order_id = %order.display_id(),
                status = ?order.status,
                "Revision rejected: order is not pending"
            );
            return Err(OrderError::state_conflict(
                order.status,
                format!(
                    "Order {} is {:?}, only pending orders can be edited",
                    order.display_id(),
                    order.status
                ),
            ));
        }

        let mut revised = order.clone();

        // 2. Lines (quantity < 1 means removal)
        if let Some(lines) = revision.lines {
            let lines: Vec<LineItem> = lines.into_iter().filter(|l| l.quantity() >= 1).collect();
            self.validate_lines(&lines)?;
            revised.item_states = lines
                .iter()
                .map(|line| {
                    order
                        .item_state(line.menu_item_id())
                        .cloned()
                        .unwrap_or_else(|| OrderItemState::pending(line.menu_item_id()))
                })
                .collect();
            revised.lines = lines;
        }

        // 3. Scalar fields
        if let Some(address) = revision.delivery_address {
            revised.delivery_address = normalize_text(Some(address));
        }
        if let Some(phone) = revision.customer_phone {
            revised.customer_phone = normalize_text(Some(phone));
        }
        if let Some(method) = revision.payment_method {
            revised.payment_method = method;
        }
        if let Some(notes) = revision.notes {
            revised.notes = normalize_text(Some(notes));
        }

        // 4. Required fields must still hold after the edit
        if revised.order_type == OrderType::Delivery {
            validate_required_text(
                revised.delivery_address.as_deref(),
                "delivery_address",
                self.limits.max_address_len,
            )?;
        }
        if revised.table.is_some() {
            validate_optional_text(
                revised.customer_phone.as_deref(),
                "customer_phone",
                self.limits.max_phone_len,
            )?;
        } else {
            validate_required_text(
                revised.customer_phone.as_deref(),
                "customer_phone",
                self.limits.max_phone_len,
            )?;
        }
        validate_optional_text(revised.notes.as_deref(), "notes", self.limits.max_note_len)?;

        // 5. Re-derive totals
        let totals = order_money::compute_totals(&revised.lines, revised.order_type);
        apply_totals(&mut revised, totals);
        revised.updated_at = now_millis();

        tracing::debug!(
            order_id = %revised.display_id(),
            total = %revised.total,
            "Order revised"
        );
        Ok(revised)
    }

    /// At least one line, quantities in range, one line per menu item
    fn validate_lines(&self, lines: &[LineItem]) -> OrderResult<()> {
        if lines.is_empty() {
            return Err(OrderError::validation("lines", "at least one line is required"));
        }
        let mut seen = HashSet::new();
        for line in lines {
            if line.quantity() < 1 || line.quantity() > self.limits.max_line_quantity {
                return Err(OrderError::validation(
                    "quantity",
                    format!(
                        "quantity for {} must be between 1 and {}, got {}",
                        line.menu_item_id(),
                        self.limits.max_line_quantity,
                        line.quantity()
                    ),
                ));
            }
            order_money::validate_unit_price(line.menu_item_id(), line.unit_price())?;
            if !seen.insert(line.menu_item_id()) {
                return Err(OrderError::validation(
                    "lines",
                    format!("duplicate line for menu item {}", line.menu_item_id()),
                ));
            }
        }
        Ok(())
    }
}

fn new_draft(order_type: OrderType, lines: Vec<LineItem>, totals: Totals) -> Order {
    let now = now_millis();
    let item_states = lines
        .iter()
        .map(|l| OrderItemState::pending(l.menu_item_id()))
        .collect();
    let mut order = Order {
        order_id: None,
        status: OrderStatus::Pending,
        order_type,
        customer_id: None,
        lines,
        item_states,
        delivery_address: None,
        customer_phone: None,
        payment_method: PaymentMethod::default(),
        notes: None,
        table: None,
        subtotal: Default::default(),
        delivery_fee: Default::default(),
        total: Default::default(),
        created_at: now,
        updated_at: now,
    };
    apply_totals(&mut order, totals);
    order
}

fn apply_totals(order: &mut Order, totals: Totals) {
    order.subtotal = totals.subtotal;
    order.delivery_fee = totals.delivery_fee;
    order.total = totals.total;
}
