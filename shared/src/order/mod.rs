//! Cart and order types
//!
//! This module provides the types every ordering surface shares:
//! - Line items and order metadata (order type, payment method)
//! - Order snapshots and their lifecycle status
//! - Per-item receipt state
//! - Structured backend rejections

pub mod rejection;
pub mod snapshot;
pub mod types;

// Re-exports
pub use rejection::{RejectionReason, SubmissionRejection};
pub use snapshot::{Order, OrderStatus};
pub use types::*;
