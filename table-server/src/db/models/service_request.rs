//! Service Request Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{RequestCategory, RequestPriority, RequestStatus};
use surrealdb::RecordId;

/// Service request entity (guest calls for staff attention)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Record link to dining table
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    /// Table name snapshot at creation
    pub table_name: String,
    #[serde(default)]
    pub category: RequestCategory,
    pub priority: RequestPriority,
    #[serde(default)]
    pub status: RequestStatus,
    /// Short label shown on the staff board, e.g. "Bill please"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text message from the guest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Predefined options the guest ticked, e.g. ["extra napkins"]
    #[serde(default)]
    pub selected_options: Vec<String>,
    /// Staff-only notes added while working the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the request reaches Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Create service request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestCreate {
    /// Dining table record id ("dining_table:xyz")
    pub dining_table: String,
    #[serde(default)]
    pub category: RequestCategory,
    /// Explicit priority override; defaults from the category when absent
    pub priority: Option<RequestPriority>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<String>,
}

/// Status change payload (staff-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestStatusUpdate {
    pub status: RequestStatus,
    /// Optional note recorded alongside the change
    pub staff_notes: Option<String>,
}
