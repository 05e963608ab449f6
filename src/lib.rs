//! # 商品目录服务
//!
//! 基于 Axum + SQLx 的商品 / 分类 REST 服务，分层结构：
//! - `app`：处理器、业务服务、仓储
//! - `core`：错误处理、分页、中间件
//! - `infrastructure`：数据库连接池、日志
//! - `config`：配置加载

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{create_router, AppState};
pub use config::Config;
pub use crate::core::{CoreError, CoreResult};
