//! Order lifecycle service
//!
//! Checkout re-prices every submitted line against the live catalog and
//! freezes the result into the order. Status changes go through the pure
//! state machines in `shared::order`; this module only adds persistence
//! and the payment provider calls around them.

use chrono::Utc;
use shared::cart::CheckoutRequest;
use shared::order::{self};
use shared::{AppError, ErrorCode, OrderStatus, PaymentStatus};

use crate::cart::Cart;
use crate::core::ServerState;
use crate::db::models::{Order, StoreInfo};
use crate::db::repository::{
    DiningTableRepository, MenuItemRepository, OrderRepository, StoreInfoRepository,
};
use crate::payment::{PaymentIntent, PaymentOutcome};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};

async fn store_info(state: &ServerState) -> Result<StoreInfo, AppError> {
    let repo = StoreInfoRepository::new(state.get_db());
    repo.get()
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::with_message(ErrorCode::ConfigError, "Store info not initialized"))
}

/// Human-facing order number: T-YYYYMMDD-NNNN
async fn next_order_number(repo: &OrderRepository) -> Result<String, AppError> {
    let seq = repo.count_today().await.map_err(AppError::from)? + 1;
    Ok(format!("T-{}-{:04}", Utc::now().format("%Y%m%d"), seq))
}

/// Create an order from a checkout submission
///
/// Every line is re-priced server-side; the client's idea of prices is
/// ignored. The store's current tax rate is captured on the order.
pub async fn checkout(state: &ServerState, req: CheckoutRequest) -> Result<Order, AppError> {
    if req.lines.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    validate_optional_text(&req.customer_name, "customer_name", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(
        &req.special_instructions,
        "special_instructions",
        MAX_NOTE_LEN,
    )?;

    let table_repo = DiningTableRepository::new(state.get_db());
    let table = table_repo
        .find_by_id(&req.table)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", req.table))
        })?;
    if !table.is_active {
        return Err(AppError::validation(format!(
            "Table '{}' is not in service",
            table.name
        )));
    }

    let item_repo = MenuItemRepository::new(state.get_db());
    let mut cart = Cart::new();
    for line in &req.lines {
        let item = item_repo
            .find_by_id(&line.menu_item)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("Menu item {} not found", line.menu_item),
                )
            })?;
        cart.add_line(crate::cart::price_line(&item, line)?)?;
    }

    let info = store_info(state).await?;
    let totals = cart.totals(info.tax_rate)?;

    let order_repo = OrderRepository::new(state.get_db());
    let now = Utc::now();
    let order = Order {
        id: None,
        order_number: next_order_number(&order_repo).await?,
        dining_table: table
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Table record missing id"))?,
        table_name: table.name.clone(),
        lines: cart.into_lines(),
        subtotal: totals.subtotal,
        tax_rate: info.tax_rate,
        tax: totals.tax,
        total: totals.total,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_ref: None,
        customer_name: req.customer_name,
        customer_phone: req.customer_phone,
        special_instructions: req.special_instructions,
        cancel_reason: None,
        staff_notes: None,
        created_at: now,
        updated_at: now,
        confirmed_at: None,
        completed_at: None,
    };

    let created = order_repo.create(order).await.map_err(AppError::from)?;
    tracing::info!(
        order = %created.order_number,
        table = %created.table_name,
        total = %created.total,
        "order created"
    );
    Ok(created)
}

async fn load_order(state: &ServerState, id: &str) -> Result<Order, AppError> {
    let repo = OrderRepository::new(state.get_db());
    repo.find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
        })
}

/// Advance an order one step along the fulfillment path
pub async fn advance(
    state: &ServerState,
    id: &str,
    target: OrderStatus,
    staff_notes: Option<String>,
) -> Result<Order, AppError> {
    validate_optional_text(&staff_notes, "staff_notes", MAX_NOTE_LEN)?;
    let current = load_order(state, id).await?;
    let next = order::advance(current.status, target)?;

    let repo = OrderRepository::new(state.get_db());
    let updated = repo
        .set_status(id, next, staff_notes)
        .await
        .map_err(AppError::from)?;
    tracing::info!(order = %updated.order_number, status = ?next, "order status advanced");
    Ok(updated)
}

/// Wipe all orders (explicit admin reset)
pub async fn reset_all(state: &ServerState) -> Result<(), AppError> {
    let repo = OrderRepository::new(state.get_db());
    repo.delete_all().await.map_err(AppError::from)?;
    tracing::warn!("all orders deleted by admin reset");
    Ok(())
}

/// Cancel an order (allowed until it has been served)
pub async fn cancel(state: &ServerState, id: &str, reason: Option<String>) -> Result<Order, AppError> {
    validate_optional_text(&reason, "reason", MAX_NOTE_LEN)?;
    let current = load_order(state, id).await?;
    order::cancel(current.status)?;

    let repo = OrderRepository::new(state.get_db());
    let updated = repo
        .set_cancelled(id, reason)
        .await
        .map_err(AppError::from)?;
    tracing::info!(order = %updated.order_number, "order cancelled");
    Ok(updated)
}

/// Start collecting payment: moves the payment axis to Processing and
/// returns the provider intent for the client to confirm
pub async fn create_payment_intent(
    state: &ServerState,
    id: &str,
) -> Result<(Order, PaymentIntent), AppError> {
    let current = load_order(state, id).await?;
    if current.status == OrderStatus::Cancelled {
        return Err(AppError::conflict(
            ErrorCode::OrderAlreadyCancelled,
            "Cannot take payment for a cancelled order",
        ));
    }
    order::transition_payment(current.payment_status, PaymentStatus::Processing)?;

    let order_ref = current
        .id
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_else(|| id.to_string());
    let intent = state
        .payment
        .create_intent(&order_ref, current.total)
        .await
        .map_err(|e| {
            AppError::with_message(ErrorCode::PaymentProviderError, e.to_string())
        })?;

    let repo = OrderRepository::new(state.get_db());
    let updated = repo
        .set_payment(id, PaymentStatus::Processing, Some(intent.reference.clone()))
        .await
        .map_err(AppError::from)?;
    tracing::info!(order = %updated.order_number, reference = %intent.reference, "payment intent created");
    Ok((updated, intent))
}

/// Confirm the active payment intent with the provider
///
/// On success the payment axis completes and, when the store has
/// auto-confirm enabled, a Pending order moves to Confirmed in the same
/// call. A decline lands on Failed, from which a new intent may be created.
pub async fn confirm_payment(state: &ServerState, id: &str) -> Result<Order, AppError> {
    let current = load_order(state, id).await?;
    if current.payment_status != PaymentStatus::Processing {
        return Err(AppError::conflict(
            ErrorCode::PaymentInvalidTransition,
            format!(
                "No payment in progress for order {} (payment status {:?})",
                current.order_number, current.payment_status
            ),
        ));
    }
    let reference = current.payment_ref.clone().ok_or_else(|| {
        AppError::with_message(ErrorCode::PaymentFailed, "Order has no payment reference")
    })?;

    let outcome = state.payment.confirm(&reference).await.map_err(|e| {
        AppError::with_message(ErrorCode::PaymentProviderError, e.to_string())
    })?;

    let repo = OrderRepository::new(state.get_db());
    match outcome {
        PaymentOutcome::Succeeded => {
            order::transition_payment(current.payment_status, PaymentStatus::Completed)?;
            let mut updated = repo
                .set_payment(id, PaymentStatus::Completed, None)
                .await
                .map_err(AppError::from)?;

            let info = store_info(state).await?;
            if info.auto_confirm_on_payment && updated.status == OrderStatus::Pending {
                updated = repo
                    .set_status(id, OrderStatus::Confirmed, None)
                    .await
                    .map_err(AppError::from)?;
            }
            tracing::info!(order = %updated.order_number, "payment completed");
            Ok(updated)
        }
        PaymentOutcome::Declined(reason) => {
            order::transition_payment(current.payment_status, PaymentStatus::Failed)?;
            let updated = repo
                .set_payment(id, PaymentStatus::Failed, None)
                .await
                .map_err(AppError::from)?;
            tracing::warn!(order = %updated.order_number, reason, "payment declined");
            Err(AppError::with_message(ErrorCode::PaymentFailed, reason))
        }
    }
}

/// Refund a completed payment
pub async fn refund_payment(state: &ServerState, id: &str) -> Result<Order, AppError> {
    let current = load_order(state, id).await?;
    order::transition_payment(current.payment_status, PaymentStatus::Refunded)?;

    let reference = current.payment_ref.clone().ok_or_else(|| {
        AppError::with_message(ErrorCode::PaymentFailed, "Order has no payment reference")
    })?;
    state.payment.refund(&reference).await.map_err(|e| {
        AppError::with_message(ErrorCode::PaymentProviderError, e.to_string())
    })?;

    let repo = OrderRepository::new(state.get_db());
    let updated = repo
        .set_payment(id, PaymentStatus::Refunded, None)
        .await
        .map_err(AppError::from)?;
    tracing::info!(order = %updated.order_number, "payment refunded");
    Ok(updated)
}
