use super::category::ErrorCategory;
use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Error shape handed to presentation layers
///
/// `details` carries structured context (field name, item id, amounts) so the
/// UI can highlight the offending input without parsing `message`.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_empty());
        assert_eq!(err.category(), ErrorCategory::Order);
    }

    #[test]
    fn test_details_are_queryable() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "customer_phone is required")
            .with_detail("field", "customer_phone");
        assert_eq!(err.to_string(), "customer_phone is required");
        assert_eq!(err.detail("field").unwrap(), "customer_phone");
        assert!(err.detail("item_id").is_none());
    }

    #[test]
    fn test_wire_shape() {
        let err = AppError::from(ErrorCode::StockExceeded).with_detail("available", 2);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 6005);
        assert_eq!(json["details"]["available"], 2);

        // no details key when empty
        let json = serde_json::to_value(AppError::new(ErrorCode::TableOccupied)).unwrap();
        assert!(json.get("details").is_none());

        let back: AppError =
            serde_json::from_str(r#"{"code":7002,"message":"Table 5 is occupied"}"#).unwrap();
        assert_eq!(back.code, ErrorCode::TableOccupied);
    }
}
