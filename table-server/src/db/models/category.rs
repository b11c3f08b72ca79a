//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Lowercased name used for case-insensitive duplicate checks
    #[serde(default)]
    pub name_key: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn new(name: String) -> Self {
        let name_key = name.trim().to_lowercase();
        Self {
            id: None,
            name,
            name_key,
            sort_order: 0,
            is_active: true,
        }
    }
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
