//! Unified error system for the delivery platform
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: JSON body for failed requests
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Restaurant errors
//! - 3xxx: Product errors
//! - 4xxx: Order errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let not_found = AppError::new(ErrorCode::CustomerNotFound);
//! assert_eq!(not_found.http_status(), shared::http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::validation("Name must have at least 2 characters")
//!     .with_detail("field", "name");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
