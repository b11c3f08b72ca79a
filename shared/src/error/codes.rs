//! Unified error codes for the TableTap system
//!
//! Error codes are shared between the server and frontends and are
//! organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 8xxx: Service-request errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Transition not allowed from the current order status
    OrderInvalidTransition = 4002,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order has no line items
    OrderEmpty = 4005,
    /// Line quantity is invalid
    OrderInvalidQuantity = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Transition not allowed from the current payment status
    PaymentInvalidTransition = 5002,
    /// Payment provider returned an error
    PaymentProviderError = 5003,
    /// Payment has already been refunded
    PaymentAlreadyRefunded = 5004,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is not available for ordering
    MenuItemUnavailable = 6002,
    /// Menu item name already exists in the category
    MenuItemNameExists = 6003,
    /// Menu item has an invalid price
    MenuItemInvalidPrice = 6004,
    /// Customization selection is invalid for the item
    InvalidCustomization = 6005,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has menu items
    CategoryHasItems = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table name already exists
    TableNameExists = 7002,

    // ==================== 8xxx: Service Request ====================
    /// Service request not found
    RequestNotFound = 8001,
    /// Transition not allowed from the current request status
    RequestInvalidTransition = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Order status transition not allowed",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order has no line items",
            ErrorCode::OrderInvalidQuantity => "Line quantity is invalid",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentInvalidTransition => "Payment status transition not allowed",
            ErrorCode::PaymentProviderError => "Payment provider returned an error",
            ErrorCode::PaymentAlreadyRefunded => "Payment has already been refunded",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::MenuItemNameExists => "Menu item name already exists in this category",
            ErrorCode::MenuItemInvalidPrice => "Menu item has an invalid price",
            ErrorCode::InvalidCustomization => "Customization selection is invalid",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has associated menu items",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNameExists => "Table name already exists",

            // Service Request
            ErrorCode::RequestNotFound => "Service request not found",
            ErrorCode::RequestInvalidTransition => "Request status transition not allowed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderEmpty),
            4006 => Ok(ErrorCode::OrderInvalidQuantity),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentInvalidTransition),
            5003 => Ok(ErrorCode::PaymentProviderError),
            5004 => Ok(ErrorCode::PaymentAlreadyRefunded),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),
            6003 => Ok(ErrorCode::MenuItemNameExists),
            6004 => Ok(ErrorCode::MenuItemInvalidPrice),
            6005 => Ok(ErrorCode::InvalidCustomization),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasItems),
            6103 => Ok(ErrorCode::CategoryNameExists),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNameExists),

            // Service Request
            8001 => Ok(ErrorCode::RequestNotFound),
            8002 => Ok(ErrorCode::RequestInvalidTransition),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::OrderInvalidTransition,
            ErrorCode::PaymentFailed,
            ErrorCode::MenuItemNotFound,
            ErrorCode::TableNotFound,
            ErrorCode::RequestInvalidTransition,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(back, ErrorCode::OrderNotFound);
    }
}
