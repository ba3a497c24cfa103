//! Menu snapshot provider
//!
//! [`MenuCatalog`] is the read side the engine consumes. [`InMemoryCatalog`]
//! additionally owns the serving counts, so the in-memory backend can reserve
//! and restock against the same numbers customers read.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::MenuItemRef;
use thiserror::Error;

use crate::orders::OrderError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Not enough servings of {item_id}: requested {requested}, available {available}")]
    OutOfStock {
        item_id: String,
        requested: i32,
        available: i32,
    },

    #[error("Catalog unreachable: {0}")]
    Unreachable(String),
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => OrderError::not_found("menu item", id),
            CatalogError::ItemUnavailable(id) => OrderError::Unavailable(id),
            CatalogError::OutOfStock {
                item_id,
                requested,
                available,
            } => OrderError::stock_exceeded(item_id, requested, available),
            CatalogError::Unreachable(msg) => OrderError::Backend(msg),
        }
    }
}

/// Read-only catalog access
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Fresh snapshot of one item
    async fn get_menu_item(&self, id: &str) -> Result<MenuItemRef, CatalogError>;

    /// Fresh snapshots of several items, failing on the first missing one
    async fn get_menu_items(&self, ids: &[String]) -> Result<Vec<MenuItemRef>, CatalogError> {
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            items.push(self.get_menu_item(id).await?);
        }
        Ok(items)
    }
}

/// 内存菜单 - 测试与演示用
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// menu_item_id → snapshot
    items: Arc<DashMap<String, MenuItemRef>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = MenuItemRef>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.upsert(item);
        }
        catalog
    }

    pub fn upsert(&self, item: MenuItemRef) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn remove(&self, id: &str) -> Option<MenuItemRef> {
        self.items.remove(id).map(|(_, item)| item)
    }

    /// Current snapshot without going through the async trait
    pub fn snapshot(&self, id: &str) -> Option<MenuItemRef> {
        self.items.get(id).map(|item| item.value().clone())
    }

    /// Returns `false` if the item does not exist
    pub fn set_servings(&self, id: &str, servings: i32) -> bool {
        match self.items.get_mut(id) {
            Some(mut item) => {
                item.available_servings = servings.max(0);
                true
            }
            None => false,
        }
    }

    /// Returns `false` if the item does not exist
    pub fn set_available(&self, id: &str, available: bool) -> bool {
        match self.items.get_mut(id) {
            Some(mut item) => {
                item.is_available = available;
                true
            }
            None => false,
        }
    }

    /// Take `quantity` servings, all or nothing
    pub fn reserve(&self, id: &str, quantity: i32) -> Result<(), CatalogError> {
        let mut item = self
            .items
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        if !item.is_available {
            return Err(CatalogError::ItemUnavailable(id.to_string()));
        }
        if quantity > item.available_servings {
            return Err(CatalogError::OutOfStock {
                item_id: id.to_string(),
                requested: quantity,
                available: item.available_servings,
            });
        }
        item.available_servings -= quantity;
        tracing::debug!(item_id = id, quantity, remaining = item.available_servings, "Servings reserved");
        Ok(())
    }

    /// Give servings back (cancelled order, reduced line)
    pub fn restock(&self, id: &str, quantity: i32) {
        if let Some(mut item) = self.items.get_mut(id) {
            item.available_servings += quantity;
            tracing::debug!(item_id = id, quantity, remaining = item.available_servings, "Servings restocked");
        }
    }
}

#[async_trait]
impl MenuCatalog for InMemoryCatalog {
    async fn get_menu_item(&self, id: &str) -> Result<MenuItemRef, CatalogError> {
        self.snapshot(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_items([
            MenuItemRef::new("A", "Adobo", Decimal::from(100), 2),
            MenuItemRef::new("B", "Sinigang", Decimal::from(150), 5).unavailable(),
        ])
    }

    #[tokio::test]
    async fn test_get_menu_item() {
        let catalog = catalog();
        let item = catalog.get_menu_item("A").await.unwrap();
        assert_eq!(item.name, "Adobo");

        let err = catalog.get_menu_item("Z").await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound("Z".into()));
    }

    #[tokio::test]
    async fn test_get_menu_items_fails_on_missing() {
        let catalog = catalog();
        let items = catalog
            .get_menu_items(&["A".to_string(), "B".to_string()])
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        assert!(catalog
            .get_menu_items(&["A".to_string(), "Z".to_string()])
            .await
            .is_err());
    }

    #[test]
    fn test_reserve_all_or_nothing() {
        let catalog = catalog();
        let err = catalog.reserve("A", 3).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfStock { available: 2, .. }));
        assert_eq!(catalog.snapshot("A").unwrap().available_servings, 2);

        catalog.reserve("A", 2).unwrap();
        assert_eq!(catalog.snapshot("A").unwrap().available_servings, 0);

        catalog.restock("A", 1);
        assert_eq!(catalog.snapshot("A").unwrap().available_servings, 1);
    }

    #[test]
    fn test_reserve_unavailable_item() {
        let catalog = catalog();
        let err = catalog.reserve("B", 1).unwrap_err();
        assert_eq!(err, CatalogError::ItemUnavailable("B".into()));

        assert!(catalog.set_available("B", true));
        catalog.reserve("B", 1).unwrap();
    }

    #[test]
    fn test_set_servings_clamps_and_reports_missing() {
        let catalog = catalog();
        assert!(catalog.set_servings("A", -4));
        assert_eq!(catalog.snapshot("A").unwrap().available_servings, 0);
        assert!(!catalog.set_servings("Z", 1));
    }

    #[test]
    fn test_catalog_error_maps_to_order_error() {
        let err: OrderError = CatalogError::NotFound("Z".into()).into();
        assert_eq!(err, OrderError::not_found("menu item", "Z"));

        let err: OrderError = CatalogError::Unreachable("timeout".into()).into();
        assert!(err.is_remote());
    }
}
