//! 基础设施层：数据库与日志

#[cfg(feature = "database")]
pub mod database;
pub mod logger;

#[cfg(feature = "database")]
pub use database::DatabaseManager;
pub use logger::Logger;
