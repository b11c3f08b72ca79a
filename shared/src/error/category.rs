//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Order errors
/// - 5xxx: Payment errors
/// - 6xxx: Menu errors
/// - 7xxx: Table errors
/// - 8xxx: Service-request errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Order errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Menu errors (6xxx)
    Menu,
    /// Table errors (7xxx)
    Table,
    /// Service-request errors (8xxx)
    Request,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..4000 => Self::General,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Menu,
            7000..8000 => Self::Table,
            8000..9000 => Self::Request,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::Request => "request",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(7), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6101), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Table);
        assert_eq!(ErrorCategory::from_code(8002), ErrorCategory::Request);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::OrderNotFound.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::PaymentFailed.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::MenuItemNotFound.category(), ErrorCategory::Menu);
        assert_eq!(ErrorCode::TableNotFound.category(), ErrorCategory::Table);
        assert_eq!(
            ErrorCode::RequestNotFound.category(),
            ErrorCategory::Request
        );
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::General.name(), "general");
        assert_eq!(ErrorCategory::Order.name(), "order");
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
