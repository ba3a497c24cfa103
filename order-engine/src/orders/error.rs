use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::order::{OrderStatus, SubmissionRejection};
use thiserror::Error;

/// Engine errors
///
/// Every variant is a rejected operation: the cart or order it was raised
/// against is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Stock exceeded for {item_id}: requested {requested}, available {available}")]
    StockExceeded {
        item_id: String,
        requested: i32,
        available: i32,
    },

    #[error("Item unavailable: {0}")]
    Unavailable(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{message}")]
    StateConflict {
        status: OrderStatus,
        message: String,
    },

    #[error("Insufficient payment: tendered {tendered}, total {total}")]
    PaymentInsufficient { total: Decimal, tendered: Decimal },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Rejection from the submission layer, passed through untouched
    #[error("Rejected by backend: {0}")]
    Rejected(SubmissionRejection),

    #[error("Backend unreachable: {0}")]
    Backend(String),
}

impl OrderError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn state_conflict(status: OrderStatus, message: impl Into<String>) -> Self {
        Self::StateConflict {
            status,
            message: message.into(),
        }
    }

    pub fn stock_exceeded(item_id: impl Into<String>, requested: i32, available: i32) -> Self {
        Self::StockExceeded {
            item_id: item_id.into(),
            requested,
            available,
        }
    }

    /// Error originated at the backend rather than in local validation
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Backend(_))
    }
}

impl From<SubmissionRejection> for OrderError {
    fn from(rejection: SubmissionRejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// 将引擎错误转换为错误码（前端负责本地化）
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation { field, .. } => {
                AppError::with_message(ErrorCode::ValidationFailed, message)
                    .with_detail("field", field)
            }
            OrderError::StockExceeded {
                item_id,
                requested,
                available,
            } => AppError::with_message(ErrorCode::StockExceeded, message)
                .with_detail("item_id", item_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::Unavailable(item_id) => {
                AppError::with_message(ErrorCode::ProductUnavailable, message)
                    .with_detail("item_id", item_id)
            }
            OrderError::NotFound { resource, id } => {
                let code = match resource {
                    "order" => ErrorCode::OrderNotFound,
                    "order line" => ErrorCode::OrderItemNotFound,
                    "menu item" => ErrorCode::ProductNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            OrderError::StateConflict { status, .. } => {
                let code = match status {
                    OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
                    OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
                    _ => ErrorCode::InvalidStatusTransition,
                };
                AppError::with_message(code, message)
                    .with_detail("status", format!("{:?}", status))
            }
            OrderError::PaymentInsufficient { total, tendered } => {
                AppError::with_message(ErrorCode::PaymentInsufficientAmount, message)
                    .with_detail("total", total.to_string())
                    .with_detail("tendered", tendered.to_string())
            }
            OrderError::Forbidden(_) => AppError::with_message(ErrorCode::PermissionDenied, message),
            OrderError::Rejected(rejection) => rejection.into(),
            OrderError::Backend(_) => {
                tracing::error!(error = %message, "Backend unreachable");
                AppError::with_message(ErrorCode::NetworkError, message)
            }
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
