//! Request extractors answering with the `ApiResponse` error body
//!
//! Same as axum's `Json`, `Query` and `Path`, but a rejected request gets a
//! 400 with `ErrorCode::InvalidRequest` instead of a plain-text body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use shared::error::AppError;

use crate::error::ServiceError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServiceError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServiceError))]
pub struct ApiPath<T>(pub T);

fn invalid(source: &str, reason: String) -> ServiceError {
    AppError::invalid_request(reason)
        .with_detail("source", source)
        .into()
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        invalid("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        invalid("query", rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        invalid("path", rejection.body_text())
    }
}
