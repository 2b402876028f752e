//! 核心模块 - 配置、状态、服务器
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 所有服务的共享引用
//! - [`Server`] - HTTP 服务启动与关闭

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
