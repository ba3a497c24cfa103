//! Order submission backend
//!
//! [`OrderBackend`] is the authoritative side: it assigns ids, arbitrates
//! stock and table occupancy, and confirms status changes. Its rejections
//! reach callers unchanged as [`OrderError::Rejected`].
//!
//! [`InMemoryBackend`] is a complete in-process implementation backed by
//! [`InMemoryCatalog`] for serving counts.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::TableSession;
use shared::order::{LineItem, Order, OrderStatus, RejectionReason, SubmissionRejection};
use shared::util::now_millis;
use thiserror::Error;

use crate::catalog::{CatalogError, InMemoryCatalog};
use crate::orders::lifecycle::{self, Actor};
use crate::orders::OrderError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error(transparent)]
    Rejected(#[from] SubmissionRejection),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),
}

impl From<BackendError> for OrderError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected(rejection) => OrderError::Rejected(rejection),
            BackendError::NotFound(id) => OrderError::not_found("order", id),
            BackendError::Unreachable(msg) => OrderError::Backend(msg),
        }
    }
}

fn reject(reason: RejectionReason, detail: impl Into<String>) -> BackendError {
    BackendError::Rejected(SubmissionRejection::new(reason, detail))
}

/// Authoritative order store
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Accept a draft; returns the confirmed order with its id
    async fn submit_order(&self, draft: &Order) -> Result<Order, BackendError>;

    /// Replace a pending order with its revised copy
    async fn submit_revision(&self, order_id: &str, revised: &Order) -> Result<Order, BackendError>;

    async fn load_order(&self, order_id: &str) -> Result<Order, BackendError>;

    async fn request_transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &Actor,
    ) -> Result<Order, BackendError>;

    async fn mark_item_received(&self, order_id: &str, line_id: &str)
    -> Result<Order, BackendError>;
}

/// 内存订单存储
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    catalog: InMemoryCatalog,
    /// order_id → order
    orders: Arc<DashMap<String, Order>>,
    /// table_number → session
    tables: Arc<DashMap<u32, TableSession>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryBackend {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Simulate a network outage; every call fails with `Unreachable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn table(&self, table_number: u32) -> TableSession {
        self.tables
            .get(&table_number)
            .map(|t| t.value().clone())
            .unwrap_or_else(|| TableSession::vacant(table_number))
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("order backend is offline".into()));
        }
        Ok(())
    }

    /// Apply per-item serving deltas, all or nothing
    ///
    /// Positive deltas reserve, negative ones restock.
    fn apply_stock_deltas(&self, deltas: &[(String, i32)]) -> Result<(), BackendError> {
        let mut applied: Vec<(&str, i32)> = Vec::with_capacity(deltas.len());
        for (item_id, delta) in deltas {
            if *delta <= 0 {
                continue;
            }
            if let Err(e) = self.catalog.reserve(item_id, *delta) {
                for (id, qty) in applied {
                    self.catalog.restock(id, qty);
                }
                let detail = e.to_string();
                return Err(match e {
                    CatalogError::NotFound(_) => reject(RejectionReason::ValidationFailed, detail),
                    _ => reject(RejectionReason::StockExceeded, detail),
                });
            }
            applied.push((item_id.as_str(), *delta));
        }
        for (item_id, delta) in deltas {
            if *delta < 0 {
                self.catalog.restock(item_id, -delta);
            }
        }
        Ok(())
    }

    fn restock_lines(&self, lines: &[LineItem]) {
        for line in lines {
            self.catalog.restock(line.menu_item_id(), line.quantity());
        }
    }

    fn release_table(&self, order: &Order) {
        let (Some(table), Some(order_id)) = (&order.table, &order.order_id) else {
            return;
        };
        if let Some(mut session) = self.tables.get_mut(&table.table_number)
            && session.release_for(order_id)
        {
            tracing::debug!(table_number = table.table_number, %order_id, "Table released");
        }
    }
}

fn line_quantities(lines: &[LineItem]) -> HashMap<&str, i32> {
    lines
        .iter()
        .map(|l| (l.menu_item_id(), l.quantity()))
        .collect()
}

fn lifecycle_rejection(err: OrderError) -> BackendError {
    match err {
        OrderError::Forbidden(msg) => reject(RejectionReason::Unauthorized, msg),
        other => reject(RejectionReason::ValidationFailed, other.to_string()),
    }
}

#[async_trait]
impl OrderBackend for InMemoryBackend {
    async fn submit_order(&self, draft: &Order) -> Result<Order, BackendError> {
        self.ensure_online()?;

        // 1. Shape checks
        if !draft.is_draft() {
            return Err(reject(
                RejectionReason::ValidationFailed,
                format!("Order {} was already submitted", draft.display_id()),
            ));
        }
        if draft.lines.is_empty() {
            return Err(reject(
                RejectionReason::ValidationFailed,
                "Order has no lines",
            ));
        }

        let order_id = uuid::Uuid::new_v4().to_string();

        // 2. Seat the table (POS only)
        if let Some(table) = &draft.table {
            let mut session = self
                .tables
                .entry(table.table_number)
                .or_insert_with(|| TableSession::vacant(table.table_number));
            if let Err(e) = session.occupy(
                order_id.clone(),
                table.customer_name.clone(),
                table.staff_name.clone(),
            ) {
                tracing::warn!(table_number = table.table_number, "Submission rejected: table occupied");
                return Err(reject(RejectionReason::TableOccupied, e.message));
            }
        }

        // 3. Reserve servings
        let deltas: Vec<(String, i32)> = draft
            .lines
            .iter()
            .map(|l| (l.menu_item_id().to_string(), l.quantity()))
            .collect();
        if let Err(e) = self.apply_stock_deltas(&deltas) {
            if let Some(table) = &draft.table
                && let Some(mut session) = self.tables.get_mut(&table.table_number)
            {
                session.release_for(&order_id);
            }
            tracing::warn!(error = %e, "Submission rejected");
            return Err(e);
        }

        // 4. Confirm
        let now = now_millis();
        let mut order = draft.clone();
        order.order_id = Some(order_id.clone());
        order.status = OrderStatus::Pending;
        order.created_at = now;
        order.updated_at = now;
        self.orders.insert(order_id.clone(), order.clone());

        tracing::info!(%order_id, total = %order.total, "Order accepted");
        Ok(order)
    }

    async fn submit_revision(&self, order_id: &str, revised: &Order) -> Result<Order, BackendError> {
        self.ensure_online()?;

        let mut current = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| BackendError::NotFound(order_id.to_string()))?;

        if !current.status.can_edit() {
            return Err(reject(
                RejectionReason::ValidationFailed,
                format!("Order {} is {:?} and can no longer be edited", order_id, current.status),
            ));
        }
        if revised.lines.is_empty() {
            return Err(reject(RejectionReason::ValidationFailed, "Order has no lines"));
        }

        // Only the difference against what is already reserved
        let old = line_quantities(&current.lines);
        let new = line_quantities(&revised.lines);
        let mut deltas: Vec<(String, i32)> = revised
            .lines
            .iter()
            .map(|l| {
                let before = old.get(l.menu_item_id()).copied().unwrap_or(0);
                (l.menu_item_id().to_string(), l.quantity() - before)
            })
            .collect();
        deltas.extend(
            current
                .lines
                .iter()
                .filter(|l| !new.contains_key(l.menu_item_id()))
                .map(|l| (l.menu_item_id().to_string(), -l.quantity())),
        );
        self.apply_stock_deltas(&deltas)?;

        let mut order = revised.clone();
        order.order_id = current.order_id.clone();
        order.status = current.status;
        order.customer_id = current.customer_id.clone();
        order.table = current.table.clone();
        order.created_at = current.created_at;
        order.updated_at = now_millis();
        *current = order.clone();

        tracing::info!(order_id, total = %order.total, "Order revision accepted");
        Ok(order)
    }

    async fn load_order(&self, order_id: &str) -> Result<Order, BackendError> {
        self.ensure_online()?;
        self.orders
            .get(order_id)
            .map(|o| o.value().clone())
            .ok_or_else(|| BackendError::NotFound(order_id.to_string()))
    }

    async fn request_transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &Actor,
    ) -> Result<Order, BackendError> {
        self.ensure_online()?;

        let mut order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| BackendError::NotFound(order_id.to_string()))?;

        lifecycle::transition(&mut order, target, actor).map_err(lifecycle_rejection)?;

        if target == OrderStatus::Cancelled {
            self.restock_lines(&order.lines);
        }
        if order.is_terminal() {
            self.release_table(&order);
        }

        tracing::info!(order_id, status = ?order.status, "Order status confirmed");
        Ok(order.clone())
    }

    async fn mark_item_received(
        &self,
        order_id: &str,
        line_id: &str,
    ) -> Result<Order, BackendError> {
        self.ensure_online()?;

        let mut order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| BackendError::NotFound(order_id.to_string()))?;

        lifecycle::mark_item_received(&mut order, line_id).map_err(lifecycle_rejection)?;
        Ok(order.clone())
    }
}
