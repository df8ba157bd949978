//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// True when the error is a unique constraint violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            // A concurrent insert won the race past the uniqueness pre-check
            return ServiceError::App(AppError::new(ErrorCode::AlreadyExists));
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_db_error_becomes_internal() {
        let err: ServiceError = sqlx::Error::PoolTimedOut.into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
        assert_eq!(app.message, "Internal server error");
    }

    #[test]
    fn test_row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: ServiceError = AppError::new(ErrorCode::CustomerEmailExists).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
