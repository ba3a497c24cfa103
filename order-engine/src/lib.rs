//! Order Engine - 餐厅点单引擎
//!
//! Builds orders from a stock-bound cart or a POS selection, submits them to
//! an authoritative backend, and drives them through their lifecycle.
//!
//! # 模块结构
//!
//! ```text
//! order-engine/
//! ├── core/          # 配置 (EngineConfig, Limits)
//! ├── order_money/   # 金额计算 (小计、配送费、总额)
//! ├── orders/        # 购物车、草稿、组装、状态机
//! ├── pos/           # 现金找零与提交前校验
//! ├── catalog        # 菜单快照接口
//! ├── backend        # 订单提交后端接口
//! ├── services/      # 结账会话与订单台
//! └── utils/         # 日志、输入校验
//! ```

pub mod backend;
pub mod catalog;
pub mod core;
pub mod order_money;
pub mod orders;
pub mod pos;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use backend::{BackendError, InMemoryBackend, OrderBackend};
pub use catalog::{CatalogError, InMemoryCatalog, MenuCatalog};
pub use core::{EngineConfig, Limits};
pub use order_money::{DELIVERY_FEE, Totals, compute_totals};
pub use orders::{Cart, DraftOrder, OrderComposer, OrderError, OrderResult};
pub use services::{CheckoutSession, OrderDesk, PosReceipt};
pub use utils::{init_logger, init_logger_with_file};

/// 设置环境 (dotenv, 配置, 日志)
///
/// Call once at process start; a second call fails because the global
/// subscriber is already installed.
pub fn setup_environment() -> anyhow::Result<EngineConfig> {
    dotenv::dotenv().ok();

    let config = EngineConfig::from_env();
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        max_line_quantity = config.limits.max_line_quantity,
        "Order engine environment ready"
    );
    Ok(config)
}
