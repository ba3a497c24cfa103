//! Customer cart
//!
//! Single-writer container for the pre-checkout selection. Totals are stored
//! next to the lines and recomputed inside every mutating call, so a reader
//! never sees a cart whose totals lag behind its lines.

use rust_decimal::Decimal;
use shared::models::MenuItemRef;
use shared::order::{LineItem, OrderType};

use super::error::OrderResult;
use super::lines::{LineBook, StockIssue};
use crate::core::Limits;
use crate::order_money::{self, Totals};

#[derive(Debug, Clone)]
pub struct Cart {
    book: LineBook,
    order_type: OrderType,
    totals: Totals,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::with_limits(&Limits::default())
    }

    pub fn with_limits(limits: &Limits) -> Self {
        let mut cart = Self {
            book: LineBook::new(limits.max_line_quantity),
            order_type: OrderType::default(),
            totals: Totals::default(),
        };
        cart.refresh_totals();
        cart
    }

    fn refresh_totals(&mut self) {
        self.totals = order_money::compute_totals(self.book.lines(), self.order_type);
    }

    // ========== Mutations ==========

    /// Add one serving of `item` (new line, or +1 on the existing line)
    pub fn add_item(&mut self, item: &MenuItemRef) -> OrderResult<()> {
        self.book.add_from_menu_item(item)?;
        self.refresh_totals();
        Ok(())
    }

    /// Set a line's quantity against the latest snapshot seen; `< 1` removes
    pub fn set_quantity(&mut self, item_id: &str, new_quantity: i32) -> OrderResult<()> {
        self.book.set_quantity(item_id, new_quantity, None)?;
        self.refresh_totals();
        Ok(())
    }

    /// Same as [`Cart::set_quantity`] with a snapshot fetched for this call
    pub fn set_quantity_with_snapshot(
        &mut self,
        snapshot: &MenuItemRef,
        new_quantity: i32,
    ) -> OrderResult<()> {
        self.book
            .set_quantity(&snapshot.id, new_quantity, Some(snapshot))?;
        self.refresh_totals();
        Ok(())
    }

    /// Delete a line (no-op if absent)
    pub fn remove_item(&mut self, item_id: &str) {
        if self.book.remove(item_id) {
            self.refresh_totals();
        }
    }

    /// Empty the cart and reset the order type to delivery
    pub fn clear(&mut self) {
        self.book.clear();
        self.order_type = OrderType::default();
        self.refresh_totals();
        tracing::debug!("Cart cleared");
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
        self.refresh_totals();
    }

    /// Record a newer snapshot for an item (reprices its line)
    pub fn observe(&mut self, snapshot: &MenuItemRef) {
        self.book.observe(snapshot);
        self.refresh_totals();
    }

    /// Refresh against new snapshots and report lines that no longer fit
    pub fn reconcile(&mut self, snapshots: &[MenuItemRef]) -> Vec<StockIssue> {
        let issues = self.book.reconcile(snapshots);
        self.refresh_totals();
        issues
    }

    // ========== Reads ==========

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

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn subtotal(&self) -> Decimal {
        self.totals.subtotal
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.totals.delivery_fee
    }

    pub fn total(&self) -> Decimal {
        self.totals.total
    }

    /// Sum of quantities across lines
    pub fn item_count(&self) -> i32 {
        self.book.item_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrderError;

    fn menu(id: &str, price: i64, servings: i32) -> MenuItemRef {
        MenuItemRef::new(id, format!("Item {id}"), Decimal::from(price), servings)
    }

    fn assert_total_identity(cart: &Cart) {
        let expected_subtotal: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.unit_price() * Decimal::from(l.quantity()))
            .sum();
        let expected_fee = match cart.order_type() {
            OrderType::Delivery => Decimal::from(50),
            OrderType::Pickup => Decimal::ZERO,
        };
        assert_eq!(cart.subtotal(), expected_subtotal);
        assert_eq!(cart.delivery_fee(), expected_fee);
        assert_eq!(cart.total(), expected_subtotal + expected_fee);
    }

    #[test]
    fn test_new_cart_defaults_to_delivery() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.order_type(), OrderType::Delivery);
        assert_eq!(cart.total(), Decimal::from(50));
        assert_total_identity(&cart);
    }

    #[test]
    fn test_add_twice_then_stock_exceeded() {
        let mut cart = Cart::new();
        let a = menu("A", 100, 2);

        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line("A").unwrap().quantity(), 2);
        assert_eq!(cart.subtotal(), Decimal::from(200));

        let err = cart.add_item(&a).unwrap_err();
        assert!(matches!(err, OrderError::StockExceeded { .. }));
        assert_eq!(cart.line("A").unwrap().quantity(), 2);
        assert_eq!(cart.subtotal(), Decimal::from(200));
        assert_total_identity(&cart);
    }

    #[test]
    fn test_add_rejects_price_out_of_range() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(&MenuItemRef::new("A", "Lobster", Decimal::MAX, 3))
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation { field: "unit_price", .. }));
        assert!(cart.is_empty());
        assert_total_identity(&cart);
    }

    #[test]
    fn test_order_type_switch_keeps_lines() {
        let mut cart = Cart::new();
        let a = menu("A", 100, 2);
        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        assert_eq!(cart.total(), Decimal::from(250));

        let lines_before = cart.lines().to_vec();
        cart.set_order_type(OrderType::Pickup);
        assert_eq!(cart.total(), Decimal::from(200));
        assert_eq!(cart.lines(), lines_before.as_slice());
        assert_total_identity(&cart);
    }

    #[test]
    fn test_add_is_set_quantity_plus_one() {
        let a = menu("A", 80, 5);

        let mut via_add = Cart::new();
        via_add.add_item(&a).unwrap();
        let mut via_set = via_add.clone();

        via_add.add_item(&a).unwrap();
        via_set.set_quantity("A", 2).unwrap();

        assert_eq!(via_add.lines(), via_set.lines());
        assert_eq!(via_add.totals(), via_set.totals());
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut cart = Cart::new();
        cart.add_item(&menu("A", 100, 5)).unwrap();
        cart.add_item(&menu("B", 60, 5)).unwrap();
        let mut other = cart.clone();

        cart.set_quantity("A", 0).unwrap();
        other.remove_item("A");

        assert_eq!(cart.lines(), other.lines());
        assert_eq!(cart.totals(), other.totals());
        assert_eq!(cart.subtotal(), Decimal::from(60));
    }

    #[test]
    fn test_set_quantity_rejects_above_servings() {
        let mut cart = Cart::new();
        cart.add_item(&menu("A", 100, 3)).unwrap();

        let err = cart.set_quantity("A", 4).unwrap_err();
        assert_eq!(err, OrderError::stock_exceeded("A", 4, 3));
        assert_eq!(cart.line("A").unwrap().quantity(), 1);
        assert_total_identity(&cart);
    }

    #[test]
    fn test_set_quantity_with_fresh_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(&menu("A", 100, 3)).unwrap();

        // Fresh read says only 1 left: increase refused, nothing repriced
        let err = cart
            .set_quantity_with_snapshot(&menu("A", 90, 1), 2)
            .unwrap_err();
        assert!(matches!(err, OrderError::StockExceeded { available: 1, .. }));
        assert_eq!(cart.subtotal(), Decimal::from(100));

        cart.set_quantity_with_snapshot(&menu("A", 90, 4), 3).unwrap();
        assert_eq!(cart.subtotal(), Decimal::from(270));
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = Cart::new();
        let err = cart.set_quantity("ghost", 2).unwrap_err();
        assert!(matches!(err, OrderError::NotFound { .. }));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        let a = menu("A", 10, 5);
        cart.add_item(&a).unwrap();
        cart.add_item(&a).unwrap();
        cart.add_item(&menu("B", 10, 5)).unwrap();
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_clear_resets_order_type() {
        let mut cart = Cart::new();
        cart.add_item(&menu("A", 10, 5)).unwrap();
        cart.set_order_type(OrderType::Pickup);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.order_type(), OrderType::Delivery);
        assert_total_identity(&cart);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&menu("A", 10, 5)).unwrap();
        let before = cart.totals();
        cart.remove_item("Z");
        assert_eq!(cart.totals(), before);
    }

    #[test]
    fn test_reconcile_reprices_totals() {
        let mut cart = Cart::new();
        cart.set_order_type(OrderType::Pickup);
        cart.add_item(&menu("A", 100, 5)).unwrap();

        let issues = cart.reconcile(&[menu("A", 125, 0)]);
        assert_eq!(issues.len(), 1);
        assert_eq!(cart.total(), Decimal::from(125));
        assert_total_identity(&cart);
    }
}
