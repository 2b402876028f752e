use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::auth::jwt::MIN_SECRET_LEN;
use crate::slots::{SlotConfig, SlotSeed};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 服务器配置 - 食堂服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | Asia/Kolkata | 业务时区 (取号、时段、报表) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，不设置则只输出到终端 |
/// | SLOT_LEAD_MINUTES | 30 | 最早可约时段距当前的分钟数 |
/// | SLOT_STEP_MINUTES | 15 | 时段间隔 |
/// | SLOT_CLOSE_HOUR | 22 | 最后一个时段 (整点) |
/// | SLOT_CAPACITY | 20 | 每个时段可接单数 |
/// | SLOT_SEED | zero | 时段初始占用: zero / random |
/// | CAMPUS_EMAIL_DOMAIN | iiitkottayam.ac.in | 允许注册的邮箱域名 |
/// | MANAGER_EMAIL | (无) | 启动时确保存在的管理员账号 |
/// | MANAGER_PASSWORD | (无) | 管理员密码 |
/// | SEED_SAMPLE_MENU | true | 菜单为空时写入示例菜品 |
/// | OTP_TTL_MINUTES | 10 | 验证码有效期 |
/// | JWT_SECRET | (开发环境随机) | JWT 密钥，至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | JWT_ISSUER | canteen-server | 签发者 |
/// | JWT_AUDIENCE | canteen-clients | 受众 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/canteen HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// IANA 时区名
    pub timezone: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// JWT_SECRET 是否由环境变量提供
    pub jwt_secret_from_env: bool,
    /// 取餐时段
    pub slots: SlotConfig,
    pub campus_email_domain: String,
    pub manager_email: Option<String>,
    pub manager_password: Option<String>,
    pub seed_sample_menu: bool,
    pub otp_ttl_minutes: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let mut jwt = JwtConfig::default();
        let jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let jwt_secret_from_env = jwt_secret.is_some();
        if let Some(secret) = jwt_secret {
            jwt.secret = secret;
        }
        jwt.expiration_minutes = env_or("JWT_EXPIRATION_MINUTES", jwt.expiration_minutes);
        jwt.issuer = std::env::var("JWT_ISSUER").unwrap_or(jwt.issuer);
        jwt.audience = std::env::var("JWT_AUDIENCE").unwrap_or(jwt.audience);

        let defaults = SlotConfig::default();
        let slots = SlotConfig {
            lead_minutes: env_or("SLOT_LEAD_MINUTES", defaults.lead_minutes),
            step_minutes: env_or("SLOT_STEP_MINUTES", defaults.step_minutes),
            close_hour: env_or("SLOT_CLOSE_HOUR", defaults.close_hour),
            capacity: env_or("SLOT_CAPACITY", defaults.capacity),
            seed: env_or("SLOT_SEED", SlotSeed::Zero),
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            jwt,
            jwt_secret_from_env,
            slots,
            campus_email_domain: std::env::var("CAMPUS_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "iiitkottayam.ac.in".into()),
            manager_email: std::env::var("MANAGER_EMAIL").ok().filter(|s| !s.is_empty()),
            manager_password: std::env::var("MANAGER_PASSWORD").ok().filter(|s| !s.is_empty()),
            seed_sample_menu: env_or("SEED_SAMPLE_MENU", true),
            otp_ttl_minutes: env_or("OTP_TTL_MINUTES", 10),
        }
    }

    /// 测试用配置: 不读环境变量，不写示例菜单
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            environment: "test".into(),
            timezone: "Asia/Kolkata".into(),
            log_level: "debug".into(),
            log_dir: None,
            jwt: JwtConfig::default(),
            jwt_secret_from_env: false,
            slots: SlotConfig::default(),
            campus_email_domain: "iiitkottayam.ac.in".into(),
            manager_email: None,
            manager_password: None,
            seed_sample_menu: false,
            otp_ttl_minutes: 10,
        }
    }

    /// 启动前检查
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            return Err(format!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"));
        }
        if self.is_production() && !self.jwt_secret_from_env {
            return Err("JWT_SECRET environment variable must be set in production".into());
        }
        if self.slots.step_minutes == 0 {
            return Err("SLOT_STEP_MINUTES must be greater than 0".into());
        }
        if self.slots.close_hour > 24 {
            return Err("SLOT_CLOSE_HOUR must be between 0 and 24".into());
        }
        if self.manager_email.is_some() != self.manager_password.is_some() {
            return Err("MANAGER_EMAIL and MANAGER_PASSWORD must be set together".into());
        }
        Ok(())
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("canteen.redb")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
