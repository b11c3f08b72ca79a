//! Order Model
//!
//! Orders are immutable price snapshots: lines carry the name and unit
//! price captured at checkout, so later menu edits never change totals.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::cart::PricedLine;
use shared::{OrderStatus, PaymentStatus};
use surrealdb::RecordId;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-facing order number, e.g. "T-20260830-0001"
    pub order_number: String,
    /// Record link to dining table
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    /// Table name snapshot at checkout
    pub table_name: String,
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    /// Tax rate applied at checkout
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Provider reference for the active payment intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Why the order was cancelled, when it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Staff-only notes added while working the order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the order reaches Confirmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Set when the order reaches Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Status change payload for PATCH endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    /// Optional note recorded alongside the change
    pub staff_notes: Option<String>,
}

/// Cancellation payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderCancel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
