//! Shared types for the ordering engine
//!
//! Serializable domain types used by every ordering surface: menu snapshots,
//! line items, orders, table sessions, and the unified error codes.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{MenuItemRef, TableSession, TableStatus};
pub use order::{
    ItemStatus, LineItem, Order, OrderItemState, OrderStatus, OrderType, PaymentMethod,
    RejectionReason, SubmissionRejection, TableAssignment,
};
