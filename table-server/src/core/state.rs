use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::models::StoreInfo;
use crate::db::repository::StoreInfoRepository;
use crate::payment::{MockPaymentProvider, PaymentProvider};
use crate::utils::AppError;
use crate::utils::validation::validate_tax_rate;

/// 服务器状态 - 持有所有共享服务的引用
///
/// ServerState 是服务的核心数据结构。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | payment | Arc<dyn PaymentProvider> | 支付提供商 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 支付提供商
    pub payment: Arc<dyn PaymentProvider>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, db: Surreal<Db>, payment: Arc<dyn PaymentProvider>) -> Self {
        Self {
            config,
            db,
            payment,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/tabletap.db)
    /// 3. store_info 单例 (首次启动时写入默认税率)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("tabletap.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let state = Self::new(
            config.clone(),
            db_service.db,
            Arc::new(MockPaymentProvider::new()),
        );
        state.seed_store_info().await?;
        Ok(state)
    }

    /// 初始化内存数据库状态 (测试用)
    pub async fn initialize_mem(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new_mem().await?;
        let state = Self::new(
            config.clone(),
            db_service.db,
            Arc::new(MockPaymentProvider::new()),
        );
        state.seed_store_info().await?;
        Ok(state)
    }

    /// 替换支付提供商 (测试用)
    pub fn with_payment_provider(mut self, payment: Arc<dyn PaymentProvider>) -> Self {
        self.payment = payment;
        self
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    async fn seed_store_info(&self) -> Result<(), AppError> {
        validate_tax_rate(self.config.default_tax_rate)?;
        let repo = StoreInfoRepository::new(self.db.clone());
        let info = repo
            .seed_if_missing(StoreInfo::with_defaults(
                self.config.default_tax_rate,
                self.config.auto_confirm_on_payment,
            ))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        tracing::info!(tax_rate = %info.tax_rate, "Store info ready");
        Ok(())
    }
}
