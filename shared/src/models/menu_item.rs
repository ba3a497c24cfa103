//! Menu Item Snapshot Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time read of a catalog entry (菜品快照)
///
/// Snapshots are never mutated by the engine; a newer read replaces an older
/// one wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemRef {
    pub id: String,
    pub name: String,
    /// Unit price
    pub price: Decimal,
    pub category: String,
    /// Servings left at the time of the read
    pub available_servings: i32,
    pub is_available: bool,
}

impl MenuItemRef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        available_servings: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: String::new(),
            available_servings,
            is_available: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }

    /// Whether `quantity` servings could be ordered according to this snapshot
    pub fn can_serve(&self, quantity: i32) -> bool {
        self.is_available && quantity <= self.available_servings
    }
}
