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
            | Self::CustomerNotFound
            | Self::RestaurantNotFound
            | Self::ProductNotFound
            | Self::OrderNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::CustomerEmailExists
            | Self::RestaurantNameExists
            | Self::ProductInUse
            | Self::OrderInvalidTransition => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (referenced entity in the wrong state)
            Self::CustomerInactive
            | Self::RestaurantInactive
            | Self::ProductUnavailable
            | Self::ProductWrongRestaurant => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
