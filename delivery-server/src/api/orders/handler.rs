//! Order API Handlers
//!
//! Placement and status changes go through [`crate::services::order`];
//! reads hit the db layer directly.

use axum::{Json, extract::State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderQuote, OrderStatusUpdate};
use shared::order::OrderStatus;

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::db::orders;
use crate::services::order as order_service;
use crate::state::AppState;

/// Orders returned by the recent-orders listing
const RECENT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub status: Option<OrderStatus>,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("order_id", id)
}

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<OrderCreate>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = order_service::create_order(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/orders/quote - price an order without placing it
pub async fn quote(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<OrderCreate>,
) -> ApiResult<Json<OrderQuote>> {
    let quote = order_service::quote_order(&state.pool, &payload).await?;
    Ok(Json(quote))
}

/// GET /api/orders?status= - most recent orders, newest first
pub async fn list_recent(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = orders::list_recent(&state.pool, query.status, RECENT_LIMIT).await?;
    Ok(Json(orders))
}

/// GET /api/orders/number/{order_number}
pub async fn get_by_number(
    State(state): State<AppState>,
    ApiPath(order_number): ApiPath<String>,
) -> ApiResult<Json<Order>> {
    let order_number = order_number.trim();
    let order = orders::find_by_number(&state.pool, order_number)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {order_number} not found"),
            )
            .with_detail("order_number", order_number)
        })?;
    Ok(Json(order))
}

/// GET /api/orders/customer/{customer_id} - newest first
pub async fn list_by_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = orders::list_by_customer(&state.pool, customer_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Order>> {
    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status - move along the status graph
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<OrderStatusUpdate>,
) -> ApiResult<Json<Order>> {
    let order = order_service::update_status(&state.pool, id, payload.status).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id} - cancel
pub async fn cancel(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<Json<Order>> {
    let order = order_service::cancel_order(&state.pool, id).await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_query_status_is_optional() {
        let q: RecentQuery = serde_json::from_str("{}").unwrap();
        assert!(q.status.is_none());
        let q: RecentQuery = serde_json::from_str(r#"{"status":"PREPARING"}"#).unwrap();
        assert_eq!(q.status, Some(OrderStatus::Preparing));
    }

    #[test]
    fn test_not_found_carries_id() {
        let err = not_found(42);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap()["order_id"], 42);
    }
}
