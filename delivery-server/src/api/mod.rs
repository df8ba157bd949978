//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness and build info
//! - [`customers`] - customer registry
//! - [`restaurants`] - restaurant registry and delivery fees
//! - [`products`] - product catalog
//! - [`orders`] - order placement and lifecycle
//! - [`reports`] - order aggregates

pub mod customers;
pub mod extract;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod restaurants;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;

/// Result type returned by every handler
pub type ApiResult<T> = Result<T, ServiceError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(restaurants::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(reports::router())
}

/// Build the application with middleware and state attached
pub fn build_app(state: AppState) -> Router {
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// App backed by a pool that never connects; only DB-free routes work
    fn offline_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        build_app(AppState::from_pool(pool))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, http::HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, headers, body) = get_json(offline_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "delivery-server");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_i64());
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_info() {
        let (status, _, body) = get_json(offline_app(), "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["application"], "delivery-server");
        assert_eq!(body["framework"], "axum");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = offline_app()
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = offline_app()
            .oneshot(Request::get("/api/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(method: http::Method, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_bad_path_parameter_is_rejected_before_db() {
        let (status, _, body) = get_json(offline_app(), "/api/customers/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
        assert_eq!(body["details"]["source"], "path");
    }

    #[tokio::test]
    async fn test_malformed_body_gets_error_envelope() {
        // wrong field type
        let (status, body) = send_json(
            offline_app(),
            json_request(http::Method::POST, "/api/orders", r#"{"customer_id":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
        assert_eq!(body["details"]["source"], "body");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        // unknown status name
        let (status, body) = send_json(
            offline_app(),
            json_request(http::Method::PATCH, "/api/orders/1/status", r#"{"status":"LOST"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);

        // not JSON at all
        let (status, body) = send_json(
            offline_app(),
            json_request(http::Method::POST, "/api/customers", "{name:"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_error_envelope() {
        let request = Request::post("/api/customers")
            .body(Body::from(r#"{"name":"Ana","email":"ana@example.com"}"#))
            .unwrap();
        let (status, body) = send_json(offline_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
    }

    #[tokio::test]
    async fn test_missing_query_parameter_gets_error_envelope() {
        let request = Request::patch("/api/customers/1/status")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(offline_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
        assert_eq!(body["details"]["source"], "query");
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected_before_db() {
        let (status, body) = send_json(
            offline_app(),
            json_request(http::Method::POST, "/api/customers", r#"{"name":"","email":"x@y.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 7);
        assert_eq!(body["details"]["field"], "name");
    }
}
