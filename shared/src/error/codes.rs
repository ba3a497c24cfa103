//! Numeric error codes
//!
//! Cart page, checkout, staff editor and POS all report failures with these
//! codes; the presentation layer owns the localised text. Ranges:
//! - 0xxx: General
//! - 2xxx: Permission
//! - 4xxx: Order
//! - 5xxx: Payment
//! - 6xxx: Menu item / stock
//! - 7xxx: Table
//! - 9xxx: System

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 错误码 (序列化为数字)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx
    ValidationFailed = 2,
    NotFound = 3,

    // 2xxx
    /// Customer attempted a staff-only action
    PermissionDenied = 2001,

    // 4xxx
    OrderNotFound = 4001,
    OrderAlreadyCompleted = 4003,
    OrderAlreadyCancelled = 4004,
    OrderItemNotFound = 4006,
    /// Transition or edit not legal in the current status
    InvalidStatusTransition = 4008,

    // 5xxx
    PaymentInsufficientAmount = 5002,

    // 6xxx
    ProductNotFound = 6001,
    ProductUnavailable = 6004,
    /// Requested quantity exceeds available servings
    StockExceeded = 6005,

    // 7xxx
    TableOccupied = 7002,

    // 9xxx
    /// Backend or catalog could not be reached
    NetworkError = 9003,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 14] = [
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::PermissionDenied,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderAlreadyCompleted,
        ErrorCode::OrderAlreadyCancelled,
        ErrorCode::OrderItemNotFound,
        ErrorCode::InvalidStatusTransition,
        ErrorCode::PaymentInsufficientAmount,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductUnavailable,
        ErrorCode::StockExceeded,
        ErrorCode::TableOccupied,
        ErrorCode::NetworkError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message, used when no specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order is already completed",
            ErrorCode::OrderAlreadyCancelled => "Order is already cancelled",
            ErrorCode::OrderItemNotFound => "Order line not found",
            ErrorCode::InvalidStatusTransition => "Not allowed in the current order status",
            ErrorCode::PaymentInsufficientAmount => "Amount tendered is below the total",
            ErrorCode::ProductNotFound => "Menu item not found",
            ErrorCode::ProductUnavailable => "Menu item is unavailable",
            ErrorCode::StockExceeded => "Not enough servings left",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::NetworkError => "Order service unreachable",
        }
    }

    /// The caller can retry unchanged; every other code needs different input
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::NetworkError)
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
