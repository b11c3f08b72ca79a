//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound
            | Self::RequestNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (duplicates and rejected state transitions)
            Self::AlreadyExists
            | Self::OrderInvalidTransition
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::PaymentInvalidTransition
            | Self::PaymentAlreadyRefunded
            | Self::MenuItemNameExists
            | Self::CategoryNameExists
            | Self::CategoryHasItems
            | Self::TableNameExists
            | Self::RequestInvalidTransition => StatusCode::CONFLICT,

            // 402 Payment Required
            Self::PaymentFailed => StatusCode::PAYMENT_REQUIRED,

            // 502 Bad Gateway (external dependency failed)
            Self::PaymentProviderError => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::OrderInvalidTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::PaymentFailed.http_status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ErrorCode::PaymentProviderError.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
