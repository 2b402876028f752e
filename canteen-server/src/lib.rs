//! Canteen Server - 校园食堂点餐后端
//!
//! # 架构概述
//!
//! 学生浏览菜单、加入购物车、选择取餐时段下单，凭每日取餐号取餐；
//! 食堂管理员推进订单状态、维护菜单、查看统计。
//!
//! # 模块结构
//!
//! ```text
//! canteen-server/src/
//! ├── core/           # 配置、状态、服务器
//! ├── auth/           # 账号、验证码、JWT、中间件
//! ├── api/            # HTTP 路由和处理器
//! ├── storage/        # redb 记录存储
//! ├── menu/           # 菜单目录
//! ├── cart/           # 购物车
//! ├── slots/          # 取餐时段
//! ├── tokens/         # 每日取餐号
//! ├── orders/         # 下单与状态机
//! ├── reviews/        # 评价与评分
//! ├── notifications/  # 站内通知
//! ├── analytics/      # 后台统计
//! └── utils/          # 日志、时区、校验
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod menu;
pub mod money;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod slots;
pub mod storage;
pub mod tokens;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并初始化日志
///
/// `.env` 不存在不是错误；LOG_LEVEL / LOG_DIR 在日志初始化前读取。
pub fn setup_environment() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty());
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __
  / ____/___ _____  / /____  ___  ____
 / /   / __ `/ __ \/ __/ _ \/ _ \/ __ \
/ /___/ /_/ / / / / /_/  __/  __/ / / /
\____/\__,_/_/ /_/\__/\___/\___/_/ /_/
    "#
    );
}
