use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// 错误分类 - 由错误码的千位决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Permission,
    Order,
    Payment,
    Product,
    Table,
    /// 9xxx and any unassigned range
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            2 => Self::Permission,
            4 => Self::Order,
            5 => Self::Payment,
            6 => Self::Product,
            7 => Self::Table,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
