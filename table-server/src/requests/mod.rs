//! Service request tracking
//!
//! Guests raise requests from the table; staff work them on a board
//! ordered by priority. Status rules live in `shared::request`.

use chrono::Utc;
use shared::request::{self};
use shared::{AppError, ErrorCode, RequestPriority, RequestStatus};

use crate::core::ServerState;
use crate::db::models::{ServiceRequest, ServiceRequestCreate};
use crate::db::repository::{DiningTableRepository, ServiceRequestRepository};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};

/// Create a service request
///
/// Priority defaults from the category (dietary concerns are high).
/// Guests may lower or raise it, but Urgent is reserved for staff.
pub async fn create(
    state: &ServerState,
    req: ServiceRequestCreate,
) -> Result<ServiceRequest, AppError> {
    validate_optional_text(&req.title, "title", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.message, "message", MAX_NOTE_LEN)?;

    if req.priority == Some(RequestPriority::Urgent) {
        return Err(AppError::validation(
            "Urgent priority can only be assigned by staff",
        ));
    }

    let table_repo = DiningTableRepository::new(state.get_db());
    let table = table_repo
        .find_by_id(&req.dining_table)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::TableNotFound,
                format!("Table {} not found", req.dining_table),
            )
        })?;

    let priority = req.priority.unwrap_or_else(|| req.category.default_priority());
    let now = Utc::now();
    let record = ServiceRequest {
        id: None,
        dining_table: table
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Table record missing id"))?,
        table_name: table.name.clone(),
        category: req.category,
        priority,
        status: RequestStatus::Pending,
        title: req.title,
        message: req.message,
        selected_options: req.selected_options,
        staff_notes: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };

    let repo = ServiceRequestRepository::new(state.get_db());
    let created = repo.create(record).await.map_err(AppError::from)?;
    tracing::info!(
        table = %created.table_name,
        category = ?created.category,
        priority = ?created.priority,
        "service request created"
    );
    Ok(created)
}

/// Move a request to a new status
///
/// Pending may jump straight to Completed (a passing waiter handled it
/// without tapping "in progress" first).
pub async fn transition(
    state: &ServerState,
    id: &str,
    target: RequestStatus,
    staff_notes: Option<String>,
) -> Result<ServiceRequest, AppError> {
    validate_optional_text(&staff_notes, "staff_notes", MAX_NOTE_LEN)?;
    let repo = ServiceRequestRepository::new(state.get_db());
    let current = repo
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RequestNotFound,
                format!("Service request {} not found", id),
            )
        })?;

    let next = request::transition(current.status, target)?;
    let updated = repo
        .set_status(id, next, staff_notes)
        .await
        .map_err(AppError::from)?;
    tracing::info!(request = %id, status = ?next, "service request updated");
    Ok(updated)
}
