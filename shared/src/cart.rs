//! Cart line types shared between client submissions and order snapshots
//!
//! Clients submit [`CartLineInput`] values at checkout. The server never
//! trusts client-side prices: every line is re-priced against the live
//! catalog and frozen into a [`PricedLine`] snapshot on the order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customization choice as submitted by the client (names only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionInput {
    /// Customization group name, e.g. "Crust Type"
    pub group: String,
    /// Option name within the group, e.g. "Thin"
    pub option: String,
}

/// A customization choice with its price frozen at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    pub group: String,
    pub option: String,
    /// Surcharge per unit for this option (may be zero)
    pub price_delta: Decimal,
}

/// One cart line as submitted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Menu item record id ("menu_item:xyz")
    pub menu_item: String,
    /// Requested quantity (must be positive)
    pub quantity: i32,
    /// Selected customization options
    #[serde(default)]
    pub selections: Vec<SelectionInput>,
    /// Per-line allergen preferences, e.g. "no peanuts"
    #[serde(default)]
    pub allergen_preferences: Vec<String>,
}

/// One line of an order after server-side re-pricing
///
/// Decoupled from the live menu item so later edits never retroactively
/// alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedLine {
    /// Stable line identity (content hash of item id + selections)
    pub line_id: String,
    /// Menu item record id at order time
    pub menu_item: String,
    /// Item name snapshot
    pub name: String,
    /// Base unit price snapshot
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub selections: Vec<SelectedOption>,
    #[serde(default)]
    pub allergen_preferences: Vec<String>,
    /// (unit_price + selection surcharges) × quantity, rounded to 2dp
    pub line_total: Decimal,
}

/// Checkout submission creating an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Dining table record id ("dining_table:xyz")
    pub table: String,
    pub lines: Vec<CartLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}
