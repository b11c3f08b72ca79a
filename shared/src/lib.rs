//! Shared types for the TableTap table-ordering system
//!
//! Common types used by the server and any client frontends:
//! error codes and the unified API response envelope, the order and
//! payment lifecycle state machines, the service-request state machine,
//! and the cart line types submitted at checkout.

pub mod cart;
pub mod error;
pub mod order;
pub mod request;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{OrderStatus, PaymentStatus};
pub use request::{RequestCategory, RequestPriority, RequestStatus};
