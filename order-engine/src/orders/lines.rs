//! Stock-bound line collection
//!
//! `LineBook` is the one place quantity-vs-servings rules live. The cart,
//! POS drafts and the order editor all hold one, so a quantity can only grow
//! past what the most recent menu snapshot allows by going through the same
//! checks everywhere.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::MenuItemRef;
use shared::order::LineItem;

use super::error::{OrderError, OrderResult};
use crate::order_money;

/// A line that no longer fits the latest snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockIssue {
    /// Quantity is above the servings now left
    Exceeded {
        item_id: String,
        quantity: i32,
        available: i32,
    },
    /// Item was switched off in the catalog
    Unavailable { item_id: String },
}

/// Ordered lines plus the latest menu snapshot seen for each item
#[derive(Debug, Clone)]
pub struct LineBook {
    lines: Vec<LineItem>,
    snapshots: HashMap<String, MenuItemRef>,
    /// Servings already held by the backend for these lines (submitted
    /// orders only); snapshots count them as taken
    reserved: HashMap<String, i32>,
    max_line_quantity: i32,
}

impl LineBook {
    pub fn new(max_line_quantity: i32) -> Self {
        Self {
            lines: Vec::new(),
            snapshots: HashMap::new(),
            reserved: HashMap::new(),
            max_line_quantity,
        }
    }

    /// Seed from lines of a submitted order (no snapshots seen yet)
    ///
    /// The order's quantities are already reserved, so they are added back
    /// on top of a snapshot's servings when checking an increase.
    pub fn from_lines(lines: Vec<LineItem>, max_line_quantity: i32) -> Self {
        let reserved = lines
            .iter()
            .map(|l| (l.menu_item_id().to_string(), l.quantity()))
            .collect();
        Self {
            lines,
            snapshots: HashMap::new(),
            reserved,
            max_line_quantity,
        }
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineItem> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, item_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.menu_item_id() == item_id)
    }

    /// Latest snapshot seen for an item
    pub fn snapshot(&self, item_id: &str) -> Option<&MenuItemRef> {
        self.snapshots.get(item_id)
    }

    /// Sum of quantities (not the number of lines)
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(LineItem::quantity).sum()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.menu_item_id() == item_id)
    }

    /// Servings this book may hold for `snapshot`'s item
    fn available(&self, snapshot: &MenuItemRef) -> i32 {
        let held = self.reserved.get(&snapshot.id).copied().unwrap_or(0);
        snapshot.available_servings.saturating_add(held)
    }

    /// Record a newer snapshot; an existing line takes its name and price
    ///
    /// A snapshot with an out-of-range price is remembered (so increases are
    /// refused) but never copied onto a line.
    pub fn observe(&mut self, item: &MenuItemRef) {
        if let Some(idx) = self.position(&item.id) {
            match order_money::validate_unit_price(&item.id, item.price) {
                Ok(()) => self.lines[idx].refresh_from(item),
                Err(e) => tracing::warn!(item_id = %item.id, error = %e, "Snapshot price ignored"),
            }
        }
        self.snapshots.insert(item.id.clone(), item.clone());
    }

    /// Check that `quantity` may be held according to `snapshot`
    fn check_bound(&self, snapshot: &MenuItemRef, quantity: i32) -> OrderResult<()> {
        order_money::validate_unit_price(&snapshot.id, snapshot.price)?;
        if !snapshot.is_available {
            return Err(OrderError::Unavailable(snapshot.id.clone()));
        }
        let available = self.available(snapshot);
        if quantity > available {
            return Err(OrderError::stock_exceeded(
                snapshot.id.clone(),
                quantity,
                available,
            ));
        }
        if quantity > self.max_line_quantity {
            return Err(OrderError::validation(
                "quantity",
                format!(
                    "quantity exceeds maximum allowed ({}), got {}",
                    self.max_line_quantity, quantity
                ),
            ));
        }
        Ok(())
    }

    /// Add one serving of `item`, creating the line on first add
    ///
    /// Returns the line's new quantity. On error nothing changes, including
    /// the remembered snapshot.
    pub fn add_from_menu_item(&mut self, item: &MenuItemRef) -> OrderResult<i32> {
        let requested = self.get(&item.id).map_or(1, |l| l.quantity() + 1);
        if let Err(e) = self.check_bound(item, requested) {
            tracing::warn!(item_id = %item.id, requested, error = %e, "Add item rejected");
            return Err(e);
        }

        self.observe(item);
        match self.position(&item.id) {
            Some(idx) => self.lines[idx].set_quantity(requested),
            None => self.lines.push(LineItem::from_menu_item(item, 1)),
        }
        tracing::debug!(item_id = %item.id, quantity = requested, "Line quantity updated");
        Ok(requested)
    }

    /// Set a line's quantity, validating increases against the latest snapshot
    ///
    /// `fresh` is a snapshot fetched for this call; when absent the last one
    /// observed is used. `new_quantity < 1` removes the line.
    pub fn set_quantity(
        &mut self,
        item_id: &str,
        new_quantity: i32,
        fresh: Option<&MenuItemRef>,
    ) -> OrderResult<()> {
        if new_quantity < 1 {
            self.remove(item_id);
            return Ok(());
        }
        let Some(idx) = self.position(item_id) else {
            return Err(OrderError::not_found("order line", item_id));
        };
        if let Some(snapshot) = fresh
            && snapshot.id != item_id
        {
            tracing::warn!(item_id, snapshot_id = %snapshot.id, "Snapshot is for another item");
            return Err(OrderError::validation(
                "menu_item_id",
                format!("snapshot for {} cannot bound line {}", snapshot.id, item_id),
            ));
        }

        let current = self.lines[idx].quantity();
        if new_quantity > current {
            let snapshot = match fresh.or_else(|| self.snapshots.get(item_id)) {
                Some(s) => s,
                None => {
                    tracing::warn!(item_id, "No menu snapshot seen, refusing to increase quantity");
                    return Err(OrderError::not_found("menu snapshot", item_id));
                }
            };
            if let Err(e) = self.check_bound(snapshot, new_quantity) {
                tracing::warn!(item_id, requested = new_quantity, error = %e, "Quantity change rejected");
                return Err(e);
            }
        }

        if let Some(snapshot) = fresh {
            self.observe(snapshot);
        }
        self.lines[idx].set_quantity(new_quantity);
        tracing::debug!(item_id, quantity = new_quantity, "Line quantity updated");
        Ok(())
    }

    /// Delete a line; absent lines are ignored
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.menu_item_id() != item_id);
        let removed = self.lines.len() != before;
        if removed {
            tracing::debug!(item_id, "Line removed");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.snapshots.clear();
        self.reserved.clear();
    }

    /// Take in freshly fetched snapshots and report lines that no longer fit
    ///
    /// Prices are refreshed; quantities are never changed here, the caller
    /// decides how to resolve each issue.
    pub fn reconcile(&mut self, snapshots: &[MenuItemRef]) -> Vec<StockIssue> {
        for snapshot in snapshots {
            self.observe(snapshot);
        }

        let issues: Vec<StockIssue> = self
            .lines
            .iter()
            .filter_map(|line| {
                let snapshot = self.snapshots.get(line.menu_item_id())?;
                let available = self.available(snapshot);
                if !snapshot.is_available {
                    Some(StockIssue::Unavailable {
                        item_id: snapshot.id.clone(),
                    })
                } else if line.quantity() > available {
                    Some(StockIssue::Exceeded {
                        item_id: snapshot.id.clone(),
                        quantity: line.quantity(),
                        available,
                    })
                } else {
                    None
                }
            })
            .collect();

        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Lines exceed latest menu snapshot");
        }
        issues
    }
}
