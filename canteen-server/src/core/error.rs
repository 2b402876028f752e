use thiserror::Error;

use crate::auth::JwtError;
use crate::storage::StorageError;
use crate::utils::AppError;

/// 启动与运行期错误 (非请求级别)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("JWT 配置错误: {0}")]
    Jwt(#[from] JwtError),

    #[error("初始化失败: {0}")]
    Bootstrap(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
