use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/tabletap | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | DEFAULT_TAX_RATE | 0.08 | 默认税率 (首次启动时写入 store_info) |
/// | AUTO_CONFIRM_ON_PAYMENT | false | 支付完成后自动确认订单 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tabletap HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 默认税率 (首次启动时写入 store_info 单例)
    pub default_tax_rate: Decimal,
    /// 支付完成后自动确认订单
    pub auto_confirm_on_payment: bool,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/tabletap".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            default_tax_rate: std::env::var("DEFAULT_TAX_RATE")
                .ok()
                .and_then(|v| Decimal::from_str(&v).ok())
                .unwrap_or_else(|| Decimal::new(8, 2)),
            auto_confirm_on_payment: std::env::var("AUTO_CONFIRM_ON_PAYMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录: work_dir/database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录: work_dir/logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/tabletap-test", 8080);
        assert_eq!(config.work_dir, "/tmp/tabletap-test");
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_default_tax_rate() {
        let config = Config::with_overrides("/tmp/tabletap-test", 0);
        assert_eq!(config.default_tax_rate, Decimal::new(8, 2));
    }
}
