//! Product API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::PgPool;

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::db::{products, restaurants};
use crate::state::AppState;
use crate::utils::validation::{
    CATEGORY_LEN, DESCRIPTION_LEN, NAME_LEN, positive_price, required_text,
};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub available: bool,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        .with_detail("product_id", id)
}

fn in_use(id: i64, action: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ProductInUse,
        format!("Product {id} is referenced by orders and cannot be {action}"),
    )
    .with_detail("product_id", id)
}

/// Whether an update would hand the product to another restaurant
fn changes_restaurant(current: &Product, target: Option<i64>) -> bool {
    target.is_some_and(|restaurant_id| restaurant_id != current.restaurant_id)
}

fn validate_create(payload: ProductCreate) -> Result<ProductCreate, AppError> {
    Ok(ProductCreate {
        name: required_text(&payload.name, "name", NAME_LEN)?,
        description: required_text(&payload.description, "description", DESCRIPTION_LEN)?,
        price: positive_price(payload.price)?,
        category: required_text(&payload.category, "category", CATEGORY_LEN)?,
        restaurant_id: payload.restaurant_id,
    })
}

fn validate_update(payload: ProductUpdate) -> Result<ProductUpdate, AppError> {
    Ok(ProductUpdate {
        name: payload
            .name
            .map(|v| required_text(&v, "name", NAME_LEN))
            .transpose()?,
        description: payload
            .description
            .map(|v| required_text(&v, "description", DESCRIPTION_LEN))
            .transpose()?,
        price: payload.price.map(positive_price).transpose()?,
        category: payload
            .category
            .map(|v| required_text(&v, "category", CATEGORY_LEN))
            .transpose()?,
        restaurant_id: payload.restaurant_id,
        available: payload.available,
    })
}

/// Products can only point at a restaurant that exists
async fn ensure_restaurant(pool: &PgPool, restaurant_id: i64) -> ApiResult<()> {
    if restaurants::find_by_id(pool, restaurant_id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::RestaurantNotFound,
            format!("Restaurant {restaurant_id} not found"),
        )
        .with_detail("restaurant_id", restaurant_id)
        .into());
    }
    Ok(())
}

/// POST /api/products - create an available product
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductCreate>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let payload = validate_create(payload)?;
    ensure_restaurant(&state.pool, payload.restaurant_id).await?;

    let product = products::create(&state.pool, &payload, true).await?;
    tracing::info!(
        product_id = product.id,
        restaurant_id = product.restaurant_id,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products - all products
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = products::list_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/restaurant/{restaurant_id} - available products of a restaurant
pub async fn list_by_restaurant(
    State(state): State<AppState>,
    ApiPath(restaurant_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = products::list_available_by_restaurant(&state.pool, restaurant_id).await?;
    Ok(Json(products))
}

/// GET /api/products/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = products::list_by_category(&state.pool, category.trim()).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - unavailable products are reported as such
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    let product = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !product.available {
        return Err(AppError::with_message(
            ErrorCode::ProductUnavailable,
            format!("Product {} is not available", product.name),
        )
        .with_detail("product_id", id)
        .into());
    }
    Ok(Json(product))
}

/// PUT /api/products/{id} - update the fields present in the body
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    let payload = validate_update(payload)?;
    let current = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    // Placed orders must keep products of their own restaurant
    if let Some(restaurant_id) = payload.restaurant_id
        && changes_restaurant(&current, Some(restaurant_id))
    {
        if products::is_referenced(&state.pool, id).await? {
            return Err(in_use(id, "moved to another restaurant").into());
        }
        ensure_restaurant(&state.pool, restaurant_id).await?;
    }

    let product = products::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, "Product updated");
    Ok(Json(product))
}

/// PATCH /api/products/{id}/availability?available=
pub async fn set_availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Json<Product>> {
    let product = products::set_available(&state.pool, id, query.available)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, available = query.available, "Product availability changed");
    Ok(Json(product))
}

/// PUT /api/products/{id}/deactivate - mark unavailable
pub async fn deactivate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    let product = products::set_available(&state.pool, id, false)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, "Product deactivated");
    Ok(Json(product))
}

/// DELETE /api/products/{id} - hard delete, refused while orders reference it
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if products::is_referenced(&state.pool, id).await? {
        return Err(in_use(id, "deleted; deactivate it instead").into());
    }

    if !products::delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
