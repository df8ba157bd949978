//! Report API Handlers

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{CustomerRanking, Order, OrderSummary, RestaurantSales, TopProduct};
use shared::order::OrderStatus;

use crate::api::ApiResult;
use crate::api::extract::{ApiPath, ApiQuery};
use crate::db::reports;
use crate::state::AppState;
use crate::utils::time::parse_bound;

const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Report period; an open start means the epoch, an open end means now
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PeriodQuery {
    fn resolve(&self, now: i64) -> Result<(i64, i64), AppError> {
        let from = match self.from.as_deref() {
            Some(v) if !v.trim().is_empty() => parse_bound(v, "from", false)?,
            _ => 0,
        };
        let to = match self.to.as_deref() {
            Some(v) if !v.trim().is_empty() => parse_bound(v, "to", true)?,
            _ => now,
        };
        if from > to {
            return Err(AppError::invalid_request("from must not be after to"));
        }
        Ok((from, to))
    }
}

#[derive(Debug, Deserialize)]
pub struct PeriodStatusQuery {
    #[serde(flatten)]
    pub period: PeriodQuery,
    pub status: Option<OrderStatus>,
}

/// GET /api/reports/sales-by-restaurant
pub async fn sales_by_restaurant(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RestaurantSales>>> {
    let rows = reports::sales_by_restaurant(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/reports/orders-above/{value} - totals strictly above `value`
pub async fn orders_above(
    State(state): State<AppState>,
    ApiPath(value): ApiPath<String>,
) -> ApiResult<Json<Vec<Order>>> {
    let value: Decimal = value.trim().parse().map_err(|_| {
        AppError::invalid_request(format!("{value} is not a valid amount"))
            .with_detail("field", "value")
    })?;
    let orders = reports::orders_above(&state.pool, value).await?;
    Ok(Json(orders))
}

/// GET /api/reports/orders-by-period?from=&to=&status=
pub async fn orders_by_period(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodStatusQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let status = query.status.ok_or_else(|| AppError::required("status"))?;
    let (from, to) = query.period.resolve(shared::util::now_millis())?;
    let orders = reports::orders_by_period_and_status(&state.pool, from, to, status).await?;
    Ok(Json(orders))
}

/// GET /api/reports/order-summary?from=&to=
pub async fn order_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<Json<Vec<OrderSummary>>> {
    let (from, to) = query.resolve(shared::util::now_millis())?;
    let rows = reports::order_summary(&state.pool, from, to).await?;
    Ok(Json(rows))
}

/// GET /api/reports/top-products - five most ordered products
pub async fn top_products(State(state): State<AppState>) -> ApiResult<Json<Vec<TopProduct>>> {
    let rows = reports::top_products(&state.pool, TOP_PRODUCTS_LIMIT).await?;
    Ok(Json(rows))
}

/// GET /api/reports/customer-ranking - by order count, descending
pub async fn customer_ranking(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CustomerRanking>>> {
    let rows = reports::customer_ranking(&state.pool).await?;
    Ok(Json(rows))
}
