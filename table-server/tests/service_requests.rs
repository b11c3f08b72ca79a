//! Service request flow against an in-memory database: default priorities,
//! status transitions, the staff-only Urgent rule, board ordering.

use shared::{ErrorCode, RequestCategory, RequestPriority, RequestStatus};
use table_server::core::{Config, ServerState};
use table_server::db::models::{DiningTable, DiningTableCreate, ServiceRequestCreate};
use table_server::db::repository::{DiningTableRepository, ServiceRequestRepository};
use table_server::requests;

async fn setup() -> (ServerState, DiningTable) {
    let config = Config::with_overrides("/tmp/tabletap-test", 0);
    let state = ServerState::initialize_mem(&config).await.unwrap();

    let tables = DiningTableRepository::new(state.get_db());
    let table = tables
        .create(DiningTableCreate {
            name: "T7".into(),
            capacity: Some(2),
        })
        .await
        .unwrap();
    (state, table)
}

fn create_req(
    table: &DiningTable,
    category: RequestCategory,
    priority: Option<RequestPriority>,
) -> ServiceRequestCreate {
    ServiceRequestCreate {
        dining_table: table.id.as_ref().unwrap().to_string(),
        category,
        priority,
        title: None,
        message: None,
        selected_options: vec![],
    }
}

#[tokio::test]
async fn dietary_requests_default_to_high_priority() {
    let (state, table) = setup().await;

    let req = requests::create(&state, create_req(&table, RequestCategory::Dietary, None))
        .await
        .unwrap();
    assert_eq!(req.priority, RequestPriority::High);
    assert_eq!(req.status, RequestStatus::Pending);

    let req = requests::create(&state, create_req(&table, RequestCategory::Beverage, None))
        .await
        .unwrap();
    assert_eq!(req.priority, RequestPriority::Low);

    let req = requests::create(&state, create_req(&table, RequestCategory::Payment, None))
        .await
        .unwrap();
    assert_eq!(req.priority, RequestPriority::Medium);
}

#[tokio::test]
async fn guest_override_is_honored_except_urgent() {
    let (state, table) = setup().await;

    let req = requests::create(
        &state,
        create_req(&table, RequestCategory::Beverage, Some(RequestPriority::High)),
    )
    .await
    .unwrap();
    assert_eq!(req.priority, RequestPriority::High);

    let err = requests::create(
        &state,
        create_req(&table, RequestCategory::Beverage, Some(RequestPriority::Urgent)),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn request_requires_existing_table() {
    let (state, table) = setup().await;
    let mut req = create_req(&table, RequestCategory::Untyped, None);
    req.dining_table = "dining_table:missing".into();

    let err = requests::create(&state, req).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);
}

#[tokio::test]
async fn status_transitions_including_direct_completion() {
    let (state, table) = setup().await;

    // Full path: Pending -> InProgress -> Completed
    let a = requests::create(&state, create_req(&table, RequestCategory::Untyped, None))
        .await
        .unwrap();
    let a_id = a.id.as_ref().unwrap().to_string();
    let a = requests::transition(&state, &a_id, RequestStatus::InProgress, None)
        .await
        .unwrap();
    assert_eq!(a.status, RequestStatus::InProgress);
    let a = requests::transition(&state, &a_id, RequestStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(a.status, RequestStatus::Completed);
    assert!(a.completed_at.is_some());

    // Skip path: Pending -> Completed in one tap
    let b = requests::create(&state, create_req(&table, RequestCategory::Beverage, None))
        .await
        .unwrap();
    let b_id = b.id.as_ref().unwrap().to_string();
    let b = requests::transition(&state, &b_id, RequestStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(b.status, RequestStatus::Completed);

    // Completed is terminal
    let err = requests::transition(&state, &b_id, RequestStatus::InProgress, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RequestInvalidTransition);
}

#[tokio::test]
async fn staff_can_cancel_open_requests() {
    let (state, table) = setup().await;

    let req = requests::create(&state, create_req(&table, RequestCategory::Seating, None))
        .await
        .unwrap();
    let id = req.id.as_ref().unwrap().to_string();

    let req = requests::transition(
        &state,
        &id,
        RequestStatus::Cancelled,
        Some("guest left".into()),
    )
    .await
    .unwrap();
    assert_eq!(req.status, RequestStatus::Cancelled);
    assert_eq!(req.staff_notes.as_deref(), Some("guest left"));
    assert!(req.completed_at.is_none());

    // Cancelled is terminal
    let err = requests::transition(&state, &id, RequestStatus::InProgress, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RequestInvalidTransition);
}

#[tokio::test]
async fn create_carries_title_and_selected_options() {
    let (state, table) = setup().await;

    let mut payload = create_req(&table, RequestCategory::Beverage, None);
    payload.title = Some("Refill please".into());
    payload.selected_options = vec!["still water".into(), "ice".into()];

    let req = requests::create(&state, payload).await.unwrap();
    assert_eq!(req.title.as_deref(), Some("Refill please"));
    assert_eq!(req.selected_options, vec!["still water", "ice"]);
}

#[tokio::test]
async fn open_board_orders_by_priority_then_age() {
    let (state, table) = setup().await;

    let beverage = requests::create(&state, create_req(&table, RequestCategory::Beverage, None))
        .await
        .unwrap();
    let dietary = requests::create(&state, create_req(&table, RequestCategory::Dietary, None))
        .await
        .unwrap();
    let payment = requests::create(&state, create_req(&table, RequestCategory::Payment, None))
        .await
        .unwrap();
    let done = requests::create(&state, create_req(&table, RequestCategory::Untyped, None))
        .await
        .unwrap();
    requests::transition(
        &state,
        &done.id.as_ref().unwrap().to_string(),
        RequestStatus::Completed,
        None,
    )
    .await
    .unwrap();

    let repo = ServiceRequestRepository::new(state.get_db());
    let board = repo.find_open().await.unwrap();

    // Completed requests drop off the board
    assert_eq!(board.len(), 3);
    // High before Medium before Low
    assert_eq!(board[0].id, dietary.id);
    assert_eq!(board[1].id, payment.id);
    assert_eq!(board[2].id, beverage.id);
}

#[tokio::test]
async fn requests_are_queryable_by_table() {
    let (state, table) = setup().await;
    requests::create(&state, create_req(&table, RequestCategory::Seating, None))
        .await
        .unwrap();
    requests::create(&state, create_req(&table, RequestCategory::Beverage, None))
        .await
        .unwrap();

    let repo = ServiceRequestRepository::new(state.get_db());
    let for_table = repo
        .find_by_table(&table.id.as_ref().unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(for_table.len(), 2);
}
