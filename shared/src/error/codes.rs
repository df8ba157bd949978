//! Unified error codes for the delivery platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Restaurant errors
//! - 3xxx: Product errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes travel as plain `u16` values in JSON responses.
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
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 1001,
    /// Customer is inactive
    CustomerInactive = 1002,
    /// Email already registered
    CustomerEmailExists = 1003,

    // ==================== 2xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 2001,
    /// Restaurant is inactive
    RestaurantInactive = 2002,
    /// Restaurant name already registered
    RestaurantNameExists = 2003,

    // ==================== 3xxx: Product ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Price must be positive
    ProductInvalidPrice = 3002,
    /// Product is not available
    ProductUnavailable = 3003,
    /// Product belongs to another restaurant
    ProductWrongRestaurant = 3004,
    /// Product is referenced by orders
    ProductInUse = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status change not allowed from the current status
    OrderInvalidTransition = 4002,
    /// Order has no products
    OrderEmpty = 4003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
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
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerInactive => "Customer is inactive",
            ErrorCode::CustomerEmailExists => "Email is already registered",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is inactive",
            ErrorCode::RestaurantNameExists => "Restaurant name is already registered",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product price must be greater than zero",
            ErrorCode::ProductUnavailable => "Product is unavailable",
            ErrorCode::ProductWrongRestaurant => "Product does not belong to the restaurant",
            ErrorCode::ProductInUse => "Product is referenced by existing orders",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",
            ErrorCode::OrderEmpty => "Order must contain at least one product",

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
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Customer
            1001 => Ok(ErrorCode::CustomerNotFound),
            1002 => Ok(ErrorCode::CustomerInactive),
            1003 => Ok(ErrorCode::CustomerEmailExists),

            // Restaurant
            2001 => Ok(ErrorCode::RestaurantNotFound),
            2002 => Ok(ErrorCode::RestaurantInactive),
            2003 => Ok(ErrorCode::RestaurantNameExists),

            // Product
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductInvalidPrice),
            3003 => Ok(ErrorCode::ProductUnavailable),
            3004 => Ok(ErrorCode::ProductWrongRestaurant),
            3005 => Ok(ErrorCode::ProductInUse),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderEmpty),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
