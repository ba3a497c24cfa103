//! Structured rejections returned by the submission layer

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the backing store refused a submission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    StockExceeded,
    TableOccupied,
    ValidationFailed,
    Unauthorized,
}

impl RejectionReason {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            RejectionReason::StockExceeded => ErrorCode::StockExceeded,
            RejectionReason::TableOccupied => ErrorCode::TableOccupied,
            RejectionReason::ValidationFailed => ErrorCode::ValidationFailed,
            RejectionReason::Unauthorized => ErrorCode::PermissionDenied,
        }
    }
}

/// A backend rejection, surfaced to callers verbatim
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{reason:?}: {detail}")]
pub struct SubmissionRejection {
    pub reason: RejectionReason,
    pub detail: String,
}

impl SubmissionRejection {
    pub fn new(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

impl From<SubmissionRejection> for AppError {
    fn from(rejection: SubmissionRejection) -> Self {
        AppError::with_message(rejection.reason.error_code(), rejection.detail)
            .with_detail("rejected_by", "backend")
    }
}
