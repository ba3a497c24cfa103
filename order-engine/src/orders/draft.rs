//! Drafts under composition
//!
//! - [`DraftOrder`]: POS selection built line by line before submission
//! - [`OrderEditor`]: line edits on an already-submitted pending order
//!
//! Both go through [`LineBook`], so a draft follows the same stock-bound rules
//! as the cart.

use shared::models::MenuItemRef;
use shared::order::{LineItem, Order, OrderType, PaymentMethod};

use super::composer::OrderRevision;
use super::error::{OrderError, OrderResult};
use super::lines::{LineBook, StockIssue};
use crate::core::Limits;
use crate::order_money::{self, Totals};

/// 草稿订单
#[derive(Debug, Clone)]
pub struct DraftOrder {
    book: LineBook,
    order_type: OrderType,
}

impl DraftOrder {
    pub fn new(order_type: OrderType, limits: &Limits) -> Self {
        Self {
            book: LineBook::new(limits.max_line_quantity),
            order_type,
        }
    }

    /// Empty POS draft (no delivery fee)
    pub fn pos(limits: &Limits) -> Self {
        Self::new(OrderType::Pickup, limits)
    }

    pub fn add_line_from_menu_item(&mut self, item: &MenuItemRef) -> OrderResult<i32> {
        self.book.add_from_menu_item(item)
    }

    /// `new_quantity < 1` removes the line
    pub fn update_line_quantity(
        &mut self,
        item_id: &str,
        new_quantity: i32,
        fresh: Option<&MenuItemRef>,
    ) -> OrderResult<()> {
        self.book.set_quantity(item_id, new_quantity, fresh)
    }

    pub fn remove_line(&mut self, item_id: &str) -> bool {
        self.book.remove(item_id)
    }

    pub fn observe(&mut self, snapshot: &MenuItemRef) {
        self.book.observe(snapshot);
    }

    pub fn reconcile(&mut self, snapshots: &[MenuItemRef]) -> Vec<StockIssue> {
        self.book.reconcile(snapshots)
    }

    pub fn lines(&self) -> &[LineItem] {
        self.book.lines()
    }

    pub fn line(&self, item_id: &str) -> Option<&LineItem> {
        self.book.get(item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Derived on read; the draft stores lines only
    pub fn totals(&self) -> Totals {
        order_money::compute_totals(self.book.lines(), self.order_type)
    }

    pub fn item_count(&self) -> i32 {
        self.book.item_count()
    }

    pub fn into_lines(self) -> Vec<LineItem> {
        self.book.into_lines()
    }
}

/// Editing session over a pending order
///
/// Collects line and field edits locally; [`OrderEditor::into_revision`]
/// hands them to [`super::OrderComposer::revise_existing_order`]. The source
/// order is never touched.
#[derive(Debug, Clone)]
pub struct OrderEditor {
    order_id: Option<String>,
    draft: DraftOrder,
    lines_touched: bool,
    revision: OrderRevision,
}

impl OrderEditor {
    /// Open a pending order for editing
    pub fn begin(order: &Order, limits: &Limits) -> OrderResult<Self> {
        if !order.status.can_edit() {
            tracing::warn!(
                order_id = %order.display_id(),
                status = ?order.status,
                "Edit rejected: order is not pending"
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

        Ok(Self {
            order_id: order.order_id.clone(),
            draft: DraftOrder {
                book: LineBook::from_lines(order.lines.clone(), limits.max_line_quantity),
                order_type: order.order_type,
            },
            lines_touched: false,
            revision: OrderRevision::default(),
        })
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn draft(&self) -> &DraftOrder {
        &self.draft
    }

    // ========== Lines ==========

    pub fn add_line_from_menu_item(&mut self, item: &MenuItemRef) -> OrderResult<i32> {
        let quantity = self.draft.add_line_from_menu_item(item)?;
        self.lines_touched = true;
        Ok(quantity)
    }

    pub fn update_line_quantity(
        &mut self,
        item_id: &str,
        new_quantity: i32,
        fresh: Option<&MenuItemRef>,
    ) -> OrderResult<()> {
        self.draft.update_line_quantity(item_id, new_quantity, fresh)?;
        self.lines_touched = true;
        Ok(())
    }

    pub fn remove_line(&mut self, item_id: &str) -> bool {
        let removed = self.draft.remove_line(item_id);
        self.lines_touched |= removed;
        removed
    }

    pub fn observe(&mut self, snapshot: &MenuItemRef) {
        self.draft.observe(snapshot);
    }

    // ========== Fields ==========

    pub fn set_delivery_address(&mut self, address: impl Into<String>) {
        self.revision.delivery_address = Some(address.into());
    }

    pub fn set_customer_phone(&mut self, phone: impl Into<String>) {
        self.revision.customer_phone = Some(phone.into());
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.revision.payment_method = Some(method);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.revision.notes = Some(notes.into());
    }

    /// Edits collected so far; lines are included only if any were changed
    pub fn into_revision(self) -> OrderRevision {
        let mut revision = self.revision;
        if self.lines_touched {
            revision.lines = Some(self.draft.into_lines());
        }
        revision
    }
}
