use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::analytics::AnalyticsService;
use crate::auth::{AuthService, JwtService, LogMailer, Mailer};
use crate::cart::CartService;
use crate::core::{Config, Result, ServerError};
use crate::menu::MenuCatalog;
use crate::notifications::NotificationService;
use crate::orders::OrdersManager;
use crate::reviews::ReviewService;
use crate::slots::TimeSlotAllocator;
use crate::storage::RecordStore;
use crate::utils::time::{now_in, parse_timezone};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 所有服务内部都是 `Arc` 或可廉价克隆的句柄，ServerState 的 clone 是浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | RecordStore | redb 记录存储 |
/// | menu | MenuCatalog | 菜单目录 |
/// | carts | CartService | 每个用户的购物车 (内存) |
/// | orders | Arc<OrdersManager> | 下单、状态流转、取号、时段 |
/// | reviews | ReviewService | 评价与评分聚合 |
/// | notifications | NotificationService | 站内通知 |
/// | auth | AuthService | 注册、验证码、登录 |
/// | analytics | AnalyticsService | 后台统计 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | tz | Tz | 业务时区 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 记录存储
    pub store: RecordStore,
    pub menu: MenuCatalog,
    pub carts: CartService,
    pub orders: Arc<OrdersManager>,
    pub reviews: ReviewService,
    pub notifications: NotificationService,
    pub auth: AuthService,
    pub analytics: AnalyticsService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 业务时区
    pub tz: Tz,
}

impl ServerState {
    /// 用已打开的存储组装所有服务
    pub fn new(config: Config, store: RecordStore, mailer: Arc<dyn Mailer>) -> Result<Self> {
        config.validate().map_err(ServerError::Config)?;

        let tz = parse_timezone(&config.timezone);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone())?);

        let menu = MenuCatalog::new(store.clone());
        let carts = CartService::new(menu.clone());
        let notifications = NotificationService::new(store.clone());
        let orders = Arc::new(OrdersManager::new(
            store.clone(),
            TimeSlotAllocator::new(config.slots.clone()),
            notifications.clone(),
        ));
        let reviews = ReviewService::new(store.clone(), menu.clone());
        let auth = AuthService::new(
            store.clone(),
            jwt_service.clone(),
            mailer,
            config.campus_email_domain.clone(),
            config.otp_ttl_minutes,
        );
        let analytics = AnalyticsService::new(orders.clone(), reviews.clone(), menu.clone(), tz);

        Ok(Self {
            config,
            store,
            menu,
            carts,
            orders,
            reviews,
            notifications,
            auth,
            analytics,
            jwt_service,
            tz,
        })
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保存在)
    /// 2. 数据库 (work_dir/canteen.redb)
    /// 3. 各服务
    /// 4. 示例菜单、管理员账号
    pub fn initialize(config: &Config) -> Result<Self> {
        if !config.jwt_secret_from_env {
            tracing::warn!("JWT_SECRET not set, using a generated secret (tokens will not survive restarts)");
        }

        std::fs::create_dir_all(&config.work_dir)?;
        let store = RecordStore::open(config.database_path())?;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        let state = Self::new(config.clone(), store, Arc::new(LogMailer))?;
        state.bootstrap()?;
        Ok(state)
    }

    /// 内存数据库状态，测试使用
    pub fn in_memory(config: Config, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let store = RecordStore::open_in_memory()?;
        let state = Self::new(config, store, mailer)?;
        state.bootstrap()?;
        Ok(state)
    }

    fn bootstrap(&self) -> Result<()> {
        if self.config.seed_sample_menu {
            self.menu.seed_if_empty()?;
        }
        if let (Some(email), Some(password)) =
            (&self.config.manager_email, &self.config.manager_password)
        {
            let id = self.auth.ensure_manager(email, password, "Canteen Manager")?;
            tracing::info!(user_id = %id, email = %email, "Manager account ready");
        }
        Ok(())
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 业务时区的当前时间
    pub fn now(&self) -> NaiveDateTime {
        now_in(self.tz).naive_local()
    }

    /// 业务时区的今天
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
