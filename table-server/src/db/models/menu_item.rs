//! Menu Item Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// An option inside a customization group, with its surcharge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomizationOption {
    pub name: String,
    /// Surcharge added per unit when selected (may be zero)
    #[serde(default)]
    pub price_delta: Decimal,
}

/// How many options may be picked from a group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionRule {
    /// At most one option
    #[default]
    Single,
    /// Up to max_selections options
    Multi { max_selections: u32 },
}

/// A named group of customization options embedded in a menu item
///
/// e.g. group "Crust Type" with options Thin / Regular / Stuffed (+2.00)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomizationGroup {
    pub name: String,
    #[serde(default)]
    pub selection: SelectionRule,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<CustomizationOption>,
}

impl CustomizationGroup {
    /// Look up an option by name (exact match)
    pub fn find_option(&self, name: &str) -> Option<&CustomizationOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Lowercased name used for case-insensitive duplicate checks
    #[serde(default)]
    pub name_key: String,
    #[serde(default)]
    pub description: String,
    /// Base unit price
    pub price: Decimal,
    /// Record link to category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Declared allergens, e.g. ["gluten", "dairy"]
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Dietary labels, e.g. ["vegetarian", "gluten-free"]
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub customization_groups: Vec<CustomizationGroup>,
    #[serde(default)]
    pub sort_order: i32,
    /// Unavailable items stay listed but cannot be ordered
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Look up a customization group by name (exact match)
    pub fn find_group(&self, name: &str) -> Option<&CustomizationGroup> {
        self.customization_groups.iter().find(|g| g.name == name)
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    pub image_url: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub customization_groups: Vec<CustomizationGroup>,
    pub sort_order: Option<i32>,
    pub is_available: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub category: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization_groups: Option<Vec<CustomizationGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
