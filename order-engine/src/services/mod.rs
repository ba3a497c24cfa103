//! 服务层 - 组合菜单、订单引擎与后端
//!
//! - [`checkout`] - 顾客购物车结账会话
//! - [`desk`] - POS 下单、订单修订与状态流转

pub mod checkout;
pub mod desk;

pub use checkout::CheckoutSession;
pub use desk::{OrderDesk, PosReceipt};
