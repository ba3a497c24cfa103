//! Customer checkout session
//!
//! Owns one [`Cart`] and fetches a fresh menu snapshot before every mutation
//! that could raise a quantity. The cart is cleared only after the backend
//! has confirmed the order; any rejection leaves it as it was.

use std::sync::Arc;

use shared::order::{Order, OrderType};

use crate::backend::OrderBackend;
use crate::catalog::MenuCatalog;
use crate::core::Limits;
use crate::orders::{Cart, CheckoutDetails, OrderComposer, OrderError, OrderResult, StockIssue};

pub struct CheckoutSession<C: ?Sized, B: ?Sized> {
    catalog: Arc<C>,
    backend: Arc<B>,
    composer: OrderComposer,
    cart: Cart,
}

impl<C, B> CheckoutSession<C, B>
where
    C: MenuCatalog + ?Sized,
    B: OrderBackend + ?Sized,
{
    pub fn new(catalog: Arc<C>, backend: Arc<B>, limits: Limits) -> Self {
        Self {
            catalog,
            backend,
            composer: OrderComposer::new(limits),
            cart: Cart::with_limits(&limits),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn add_item(&mut self, item_id: &str) -> OrderResult<()> {
        let snapshot = self.catalog.get_menu_item(item_id).await?;
        self.cart.add_item(&snapshot)
    }

    /// `quantity < 1` removes the line without a catalog round trip
    pub async fn set_quantity(&mut self, item_id: &str, quantity: i32) -> OrderResult<()> {
        if quantity < 1 {
            return self.cart.set_quantity(item_id, quantity);
        }
        if self.cart.line(item_id).is_none() {
            return Err(OrderError::not_found("order line", item_id));
        }
        let snapshot = self.catalog.get_menu_item(item_id).await?;
        self.cart.set_quantity_with_snapshot(&snapshot, quantity)
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.cart.remove_item(item_id);
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.cart.set_order_type(order_type);
    }

    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Re-read every line's snapshot and report what no longer fits
    pub async fn refresh(&mut self) -> OrderResult<Vec<StockIssue>> {
        let ids: Vec<String> = self
            .cart
            .lines()
            .iter()
            .map(|l| l.menu_item_id().to_string())
            .collect();
        let snapshots = self.catalog.get_menu_items(&ids).await?;
        Ok(self.cart.reconcile(&snapshots))
    }

    /// Compose from the cart and submit
    pub async fn checkout(&mut self, details: CheckoutDetails) -> OrderResult<Order> {
        let draft = self.composer.compose_from_cart(&self.cart, details)?;

        let confirmed = match self.backend.submit_order(&draft).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(error = %e, "Checkout rejected, cart kept");
                return Err(e.into());
            }
        };

        self.cart.clear();
        tracing::info!(order_id = %confirmed.display_id(), total = %confirmed.total, "Checkout confirmed");
        Ok(confirmed)
    }
}
