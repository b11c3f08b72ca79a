//! Order lifecycle and payment state machines
//!
//! An order moves forward through fulfillment one step at a time and can
//! never move backward. Payment runs on a separate, loosely-coupled axis:
//! a failed payment leaves the order where it is so the customer can retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Fulfillment status of an order
///
/// Forward chain: `Pending → Confirmed → Preparing → Ready → Served →
/// Completed`. `Cancelled` is reachable from any state before `Served`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation
    #[default]
    Pending,
    /// Accepted by the restaurant
    Confirmed,
    /// Kitchen is working on it
    Preparing,
    /// Ready for pickup/serving
    Ready,
    /// Delivered to the table
    Served,
    /// Closed out
    Completed,
    /// Cancelled before being served
    Cancelled,
}

impl OrderStatus {
    /// Position in the forward chain; `None` for `Cancelled`
    pub const fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::Ready => Some(3),
            Self::Served => Some(4),
            Self::Completed => Some(5),
            Self::Cancelled => None,
        }
    }

    /// The single allowed forward step, if any
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Served),
            Self::Served => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Terminal states accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Cancellation window: anything strictly before `Served`
    pub const fn can_cancel(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::Preparing | Self::Ready
        )
    }
}

/// Payment status of an order (separate axis from fulfillment)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No payment attempt yet
    #[default]
    Pending,
    /// Payment intent created, awaiting provider outcome
    Processing,
    /// Payment cleared
    Completed,
    /// Provider rejected the payment; order stays in place for retry
    Failed,
    /// Completed payment later refunded
    Refunded,
}

impl PaymentStatus {
    /// Whether `self → next` is a legal payment transition
    pub const fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
                // manual retry after a failure
                | (Self::Failed, Self::Processing)
                | (Self::Completed, Self::Refunded)
        )
    }
}

/// Rejected transition on either axis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot advance order from {from:?} to {to:?}: only single forward steps are allowed")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },

    #[error("order is already completed")]
    AlreadyCompleted,

    #[error("order is already cancelled")]
    AlreadyCancelled,

    #[error("cannot cancel an order that has been served")]
    CancelAfterServed { status: OrderStatus },

    #[error("cannot move payment from {from:?} to {to:?}")]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        let code = match &err {
            TransitionError::AlreadyCompleted => ErrorCode::OrderAlreadyCompleted,
            TransitionError::AlreadyCancelled => ErrorCode::OrderAlreadyCancelled,
            TransitionError::InvalidOrderTransition { .. }
            | TransitionError::CancelAfterServed { .. } => ErrorCode::OrderInvalidTransition,
            TransitionError::InvalidPaymentTransition { .. } => {
                ErrorCode::PaymentInvalidTransition
            }
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Validate a staff advance to `target`; the only legal target is the
/// single next step in the forward chain.
pub fn advance(current: OrderStatus, target: OrderStatus) -> Result<OrderStatus, TransitionError> {
    match current {
        OrderStatus::Completed => return Err(TransitionError::AlreadyCompleted),
        OrderStatus::Cancelled => return Err(TransitionError::AlreadyCancelled),
        _ => {}
    }
    match current.next() {
        Some(next) if next == target => Ok(target),
        _ => Err(TransitionError::InvalidOrderTransition {
            from: current,
            to: target,
        }),
    }
}

/// Validate a cancellation; allowed from any state before `Served`.
pub fn cancel(current: OrderStatus) -> Result<OrderStatus, TransitionError> {
    match current {
        OrderStatus::Completed => Err(TransitionError::AlreadyCompleted),
        OrderStatus::Cancelled => Err(TransitionError::AlreadyCancelled),
        s if s.can_cancel() => Ok(OrderStatus::Cancelled),
        s => Err(TransitionError::CancelAfterServed { status: s }),
    }
}

/// Validate a payment-axis transition.
pub fn transition_payment(
    current: PaymentStatus,
    target: PaymentStatus,
) -> Result<PaymentStatus, TransitionError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(TransitionError::InvalidPaymentTransition {
            from: current,
            to: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORWARD: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Completed,
    ];

    #[test]
    fn test_forward_chain_single_steps() {
        for pair in FORWARD.windows(2) {
            assert_eq!(advance(pair[0], pair[1]), Ok(pair[1]));
        }
    }

    #[test]
    fn test_skip_ahead_rejected() {
        // Confirmed → Served must pass through Preparing and Ready
        let result = advance(OrderStatus::Confirmed, OrderStatus::Served);
        assert_eq!(
            result,
            Err(TransitionError::InvalidOrderTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Served,
            })
        );
    }

    #[test]
    fn test_backward_rejected() {
        assert!(advance(OrderStatus::Ready, OrderStatus::Preparing).is_err());
        assert!(advance(OrderStatus::Served, OrderStatus::Pending).is_err());
    }

    #[test]
    fn test_ranks_are_non_decreasing_along_chain() {
        let mut last = None;
        for status in FORWARD {
            let rank = status.rank();
            assert!(rank >= last);
            last = rank;
        }
        assert_eq!(OrderStatus::Cancelled.rank(), None);
    }

    #[test]
    fn test_cancel_window() {
        assert_eq!(cancel(OrderStatus::Pending), Ok(OrderStatus::Cancelled));
        assert_eq!(cancel(OrderStatus::Confirmed), Ok(OrderStatus::Cancelled));
        assert_eq!(cancel(OrderStatus::Preparing), Ok(OrderStatus::Cancelled));
        assert_eq!(cancel(OrderStatus::Ready), Ok(OrderStatus::Cancelled));
        assert_eq!(
            cancel(OrderStatus::Served),
            Err(TransitionError::CancelAfterServed {
                status: OrderStatus::Served
            })
        );
        assert_eq!(
            cancel(OrderStatus::Completed),
            Err(TransitionError::AlreadyCompleted)
        );
        assert_eq!(
            cancel(OrderStatus::Cancelled),
            Err(TransitionError::AlreadyCancelled)
        );
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for target in FORWARD {
            assert!(advance(OrderStatus::Completed, target).is_err());
            assert!(advance(OrderStatus::Cancelled, target).is_err());
        }
    }

    #[test]
    fn test_payment_happy_path() {
        assert_eq!(
            transition_payment(PaymentStatus::Pending, PaymentStatus::Processing),
            Ok(PaymentStatus::Processing)
        );
        assert_eq!(
            transition_payment(PaymentStatus::Processing, PaymentStatus::Completed),
            Ok(PaymentStatus::Completed)
        );
    }

    #[test]
    fn test_payment_failure_and_retry() {
        assert_eq!(
            transition_payment(PaymentStatus::Processing, PaymentStatus::Failed),
            Ok(PaymentStatus::Failed)
        );
        // retry goes back through Processing
        assert_eq!(
            transition_payment(PaymentStatus::Failed, PaymentStatus::Processing),
            Ok(PaymentStatus::Processing)
        );
    }

    #[test]
    fn test_payment_refund_only_after_completed() {
        assert_eq!(
            transition_payment(PaymentStatus::Completed, PaymentStatus::Refunded),
            Ok(PaymentStatus::Refunded)
        );
        assert!(transition_payment(PaymentStatus::Pending, PaymentStatus::Refunded).is_err());
        assert!(transition_payment(PaymentStatus::Failed, PaymentStatus::Refunded).is_err());
    }

    #[test]
    fn test_payment_rejects_shortcuts() {
        assert!(transition_payment(PaymentStatus::Pending, PaymentStatus::Completed).is_err());
        assert!(transition_payment(PaymentStatus::Refunded, PaymentStatus::Processing).is_err());
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
        let json = serde_json::to_string(&PaymentStatus::Refunded).unwrap();
        assert_eq!(json, "\"REFUNDED\"");
    }

    #[test]
    fn test_transition_error_maps_to_app_error() {
        let err: AppError = advance(OrderStatus::Confirmed, OrderStatus::Served)
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);
    }
}
