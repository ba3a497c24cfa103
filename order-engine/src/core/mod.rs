//! 核心模块 - 引擎配置
//!
//! - [`EngineConfig`] - 引擎配置
//! - [`Limits`] - 输入上限

pub mod config;

pub use config::{EngineConfig, Limits};
