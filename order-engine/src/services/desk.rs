//! Order desk - staff and customer requests against confirmed orders
//!
//! Every request is checked locally first (so obviously illegal requests
//! never leave the process) and then sent to the backend. The returned order
//! is always the backend's copy; nothing is applied locally ahead of it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::{Order, OrderStatus};

use crate::backend::OrderBackend;
use crate::core::Limits;
use crate::orders::lifecycle::{self, Actor, ReceiptOutcome};
use crate::orders::{DraftOrder, OrderComposer, OrderEditor, OrderResult, OrderRevision, PosDetails};
use crate::pos::{self, CashTender};

/// Confirmed POS order plus the cash tender used to pay it
#[derive(Debug, Clone, Serialize)]
pub struct PosReceipt {
    pub order: Order,
    /// Present for cash orders only
    pub tender: Option<CashTender>,
}

pub struct OrderDesk<B: ?Sized> {
    backend: Arc<B>,
    composer: OrderComposer,
}

impl<B> OrderDesk<B>
where
    B: OrderBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, limits: Limits) -> Self {
        Self {
            backend,
            composer: OrderComposer::new(limits),
        }
    }

    pub fn composer(&self) -> &OrderComposer {
        &self.composer
    }

    pub async fn load(&self, order_id: &str) -> OrderResult<Order> {
        Ok(self.backend.load_order(order_id).await?)
    }

    /// Submit an already composed draft
    pub async fn submit(&self, draft: &Order) -> OrderResult<Order> {
        Ok(self.backend.submit_order(draft).await?)
    }

    /// Compose a POS order from `draft`, check the cash tender, submit
    ///
    /// `draft` is only read; on any failure it can be corrected and resubmitted.
    pub async fn submit_pos(
        &self,
        draft: &DraftOrder,
        details: PosDetails,
        amount_tendered: Option<Decimal>,
    ) -> OrderResult<PosReceipt> {
        let order = self.composer.compose_from_draft(draft, details)?;
        let tender = pos::validate_for_submission(&order, amount_tendered)?;

        let order = match self.backend.submit_order(&order).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(error = %e, "POS submission rejected, draft kept");
                return Err(e.into());
            }
        };
        tracing::info!(
            order_id = %order.display_id(),
            total = %order.total,
            change = ?tender.map(|t| t.change),
            "POS order confirmed"
        );
        Ok(PosReceipt { order, tender })
    }

    /// Open a confirmed order for line editing
    pub async fn begin_edit(&self, order_id: &str) -> OrderResult<OrderEditor> {
        let order = self.load(order_id).await?;
        OrderEditor::begin(&order, self.composer.limits())
    }

    /// Revise a pending order against its latest backend copy
    pub async fn revise(&self, order_id: &str, revision: OrderRevision) -> OrderResult<Order> {
        let current = self.load(order_id).await?;
        let revised = self.composer.revise_existing_order(&current, revision)?;
        Ok(self.backend.submit_revision(order_id, &revised).await?)
    }

    /// Request a status change; the result is the backend-confirmed order
    pub async fn request_transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &Actor,
    ) -> OrderResult<Order> {
        let current = self.load(order_id).await?;
        if let Err(e) = lifecycle::check_transition(&current, target, actor) {
            tracing::warn!(order_id, from = ?current.status, to = ?target, error = %e, "Transition refused locally");
            return Err(e);
        }
        Ok(self
            .backend
            .request_transition(order_id, target, actor)
            .await?)
    }

    pub async fn cancel(&self, order_id: &str, actor: &Actor) -> OrderResult<Order> {
        self.request_transition(order_id, OrderStatus::Cancelled, actor)
            .await
    }

    /// Mark a line received; a repeat call is a no-op success
    pub async fn mark_item_received(
        &self,
        order_id: &str,
        line_id: &str,
    ) -> OrderResult<(Order, ReceiptOutcome)> {
        let current = self.load(order_id).await?;
        match lifecycle::check_receipt(&current, line_id)? {
            ReceiptOutcome::AlreadyReceived => Ok((current, ReceiptOutcome::AlreadyReceived)),
            ReceiptOutcome::Marked => {
                let order = self.backend.mark_item_received(order_id, line_id).await?;
                Ok((order, ReceiptOutcome::Marked))
            }
        }
    }
}
