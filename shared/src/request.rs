//! Service-request state machine
//!
//! Service requests are non-order assistance tickets raised from a table
//! (water refill, bill request, ...). The lifecycle is deliberately looser
//! than the order lifecycle: staff may resolve a pending request in one
//! touch, so `Pending → Completed` is legal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Status of a service request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self → next` is a legal transition (staff-only)
    pub const fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

/// Predefined request categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestCategory {
    Takeout,
    Dietary,
    Payment,
    Special,
    Family,
    Beverage,
    Seating,
    Menu,
    /// Free-form request with no predefined category
    #[default]
    Untyped,
}

/// Priority of a service request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestPriority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl RequestCategory {
    /// Default priority assigned at creation.
    ///
    /// Dietary requests carry allergen-safety weight and start High;
    /// payment, seating and family requests are time-sensitive; the rest
    /// start Low. Urgent is reserved for staff escalation.
    pub const fn default_priority(&self) -> RequestPriority {
        match self {
            Self::Dietary => RequestPriority::High,
            Self::Payment | Self::Seating | Self::Family => RequestPriority::Medium,
            Self::Takeout | Self::Special | Self::Beverage | Self::Menu | Self::Untyped => {
                RequestPriority::Low
            }
        }
    }
}

/// Rejected service-request transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move service request from {from:?} to {to:?}")]
pub struct RequestTransitionError {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

impl From<RequestTransitionError> for AppError {
    fn from(err: RequestTransitionError) -> Self {
        AppError::with_message(ErrorCode::RequestInvalidTransition, err.to_string())
    }
}

/// Validate a staff transition to `target`.
pub fn transition(
    current: RequestStatus,
    target: RequestStatus,
) -> Result<RequestStatus, RequestTransitionError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(RequestTransitionError {
            from: current,
            to: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_flow() {
        assert_eq!(
            transition(RequestStatus::Pending, RequestStatus::InProgress),
            Ok(RequestStatus::InProgress)
        );
        assert_eq!(
            transition(RequestStatus::InProgress, RequestStatus::Completed),
            Ok(RequestStatus::Completed)
        );
    }

    #[test]
    fn test_pending_to_completed_directly_is_allowed() {
        // Unlike orders, a request can be resolved in one touch.
        assert_eq!(
            transition(RequestStatus::Pending, RequestStatus::Completed),
            Ok(RequestStatus::Completed)
        );
    }

    #[test]
    fn test_cancel_from_pending_and_in_progress() {
        assert_eq!(
            transition(RequestStatus::Pending, RequestStatus::Cancelled),
            Ok(RequestStatus::Cancelled)
        );
        assert_eq!(
            transition(RequestStatus::InProgress, RequestStatus::Cancelled),
            Ok(RequestStatus::Cancelled)
        );
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for target in [
            RequestStatus::Pending,
            RequestStatus::InProgress,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ] {
            assert!(transition(RequestStatus::Completed, target).is_err());
            assert!(transition(RequestStatus::Cancelled, target).is_err());
        }
    }

    #[test]
    fn test_no_backward_moves() {
        assert!(transition(RequestStatus::InProgress, RequestStatus::Pending).is_err());
    }

    #[test]
    fn test_dietary_defaults_to_high_priority() {
        assert_eq!(
            RequestCategory::Dietary.default_priority(),
            RequestPriority::High
        );
    }

    #[test]
    fn test_default_priorities() {
        assert_eq!(
            RequestCategory::Payment.default_priority(),
            RequestPriority::Medium
        );
        assert_eq!(
            RequestCategory::Seating.default_priority(),
            RequestPriority::Medium
        );
        assert_eq!(
            RequestCategory::Beverage.default_priority(),
            RequestPriority::Low
        );
        assert_eq!(
            RequestCategory::Untyped.default_priority(),
            RequestPriority::Low
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(RequestPriority::Urgent > RequestPriority::High);
        assert!(RequestPriority::High > RequestPriority::Medium);
        assert!(RequestPriority::Medium > RequestPriority::Low);
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let json = serde_json::to_string(&RequestCategory::Dietary).unwrap();
        assert_eq!(json, "\"DIETARY\"");
    }
}
