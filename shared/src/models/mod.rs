//! Data models
//!
//! Read-only catalog snapshots and POS table occupancy.

pub mod dining_table;
pub mod menu_item;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
