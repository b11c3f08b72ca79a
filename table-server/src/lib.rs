//! TableTap Server - 餐厅桌边点餐服务
//!
//! # 模块结构
//!
//! ```text
//! table-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (嵌入式 SurrealDB)
//! ├── cart/          # 购物车定价引擎
//! ├── orders/        # 订单生命周期
//! ├── requests/      # 服务请求追踪
//! ├── import/        # 菜单批量导入
//! ├── payment/       # 支付提供商接口
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod cart;
pub mod core;
pub mod db;
pub mod import;
pub mod orders;
pub mod payment;
pub mod requests;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use payment::{MockPaymentProvider, PaymentProvider};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use shared::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
  ______      __    __    ______
 /_  __/___ _/ /_  / /__ /_  __/___ _____
  / / / __ `/ __ \/ / _ \ / / / __ `/ __ \
 / / / /_/ / /_/ / /  __// / / /_/ / /_/ /
/_/  \__,_/_.___/_/\___//_/  \__,_/ .___/
                                 /_/
    "#
    );
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
