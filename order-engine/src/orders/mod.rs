//! Orders module - cart, composer, drafts and lifecycle
//!
//! # 模块结构
//!
//! - [`lines`] - 行项目簿（库存约束的共享逻辑）
//! - [`cart`] - 顾客购物车
//! - [`draft`] - POS 草稿与待处理订单编辑器
//! - [`composer`] - 订单组装与修订
//! - [`lifecycle`] - 订单状态机与单品收货
//! - [`error`] - 引擎错误类型

pub mod cart;
pub mod composer;
pub mod draft;
pub mod error;
pub mod lifecycle;
pub mod lines;

pub use cart::Cart;
pub use composer::{CheckoutDetails, OrderComposer, OrderRevision, PosDetails};
pub use draft::{DraftOrder, OrderEditor};
pub use error::{OrderError, OrderResult};
pub use lifecycle::{Actor, ReceiptOutcome};
pub use lines::{LineBook, StockIssue};
