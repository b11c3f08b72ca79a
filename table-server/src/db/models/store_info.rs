//! Store Info Model (Singleton)
//!
//! 店铺信息，整个部署只有一条记录

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Store info entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 店铺名称
    pub name: String,
    /// 店铺地址
    #[serde(default)]
    pub address: String,
    /// 联系电话
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 税率 (0.08 = 8%)
    pub tax_rate: Decimal,
    /// 支付完成后自动确认订单
    #[serde(default)]
    pub auto_confirm_on_payment: bool,
    /// 更新时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl StoreInfo {
    /// Seed values for a fresh deployment
    pub fn with_defaults(tax_rate: Decimal, auto_confirm_on_payment: bool) -> Self {
        Self {
            id: None,
            name: "TableTap".to_string(),
            address: String::new(),
            phone: None,
            tax_rate,
            auto_confirm_on_payment,
            updated_at: None,
        }
    }
}

/// Update store info payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_confirm_on_payment: Option<bool>,
}
