//! 统一错误码
//!
//! [`ErrorCode`] is the numeric code every surface reports, [`ErrorCategory`]
//! groups codes by their thousands digit, and [`AppError`] pairs a code with a
//! message and structured details.
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::StockExceeded)
//!     .with_detail("item_id", "A")
//!     .with_detail("available", 2);
//! assert_eq!(err.code.code(), 6005);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
