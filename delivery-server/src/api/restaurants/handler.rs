//! Restaurant API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DeliveryFeeQuote, Restaurant, RestaurantCreate, RestaurantUpdate, delivery_fee_for,
};

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::db::restaurants;
use crate::state::AppState;
use crate::utils::validation::{
    CATEGORY_LEN, MAX_PHONE_LEN, NAME_LEN, RESTAURANT_ADDRESS_LEN, non_negative_fee,
    optional_text, rating, required_text,
};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub active: bool,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::RestaurantNotFound,
        format!("Restaurant {id} not found"),
    )
    .with_detail("restaurant_id", id)
}

fn name_taken(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::RestaurantNameExists,
        format!("Restaurant {name} is already registered"),
    )
    .with_detail("name", name)
}

fn validate_create(payload: RestaurantCreate) -> Result<RestaurantCreate, AppError> {
    Ok(RestaurantCreate {
        name: required_text(&payload.name, "name", NAME_LEN)?,
        category: required_text(&payload.category, "category", CATEGORY_LEN)?,
        address: required_text(&payload.address, "address", RESTAURANT_ADDRESS_LEN)?,
        phone: optional_text(payload.phone.as_deref(), "phone", MAX_PHONE_LEN)?,
        delivery_fee: non_negative_fee(payload.delivery_fee)?,
        rating: rating(payload.rating)?,
    })
}

fn validate_update(payload: RestaurantUpdate) -> Result<RestaurantUpdate, AppError> {
    Ok(RestaurantUpdate {
        name: payload
            .name
            .map(|v| required_text(&v, "name", NAME_LEN))
            .transpose()?,
        category: payload
            .category
            .map(|v| required_text(&v, "category", CATEGORY_LEN))
            .transpose()?,
        address: payload
            .address
            .map(|v| required_text(&v, "address", RESTAURANT_ADDRESS_LEN))
            .transpose()?,
        phone: optional_text(payload.phone.as_deref(), "phone", MAX_PHONE_LEN)?,
        delivery_fee: payload.delivery_fee.map(non_negative_fee).transpose()?,
        rating: rating(payload.rating)?,
    })
}

/// POST /api/restaurants - register a restaurant
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RestaurantCreate>,
) -> ApiResult<(StatusCode, Json<Restaurant>)> {
    let payload = validate_create(payload)?;

    if restaurants::name_exists(&state.pool, &payload.name, None).await? {
        return Err(name_taken(&payload.name).into());
    }

    let restaurant =
        restaurants::create(&state.pool, &payload, shared::util::now_millis()).await?;
    tracing::info!(restaurant_id = restaurant.id, "Restaurant registered");
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /api/restaurants - active restaurants
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Restaurant>>> {
    let restaurants = restaurants::list_active(&state.pool).await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let restaurants = restaurants::list_by_category(&state.pool, category.trim()).await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = restaurants::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/{id} - update the fields present in the body
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<RestaurantUpdate>,
) -> ApiResult<Json<Restaurant>> {
    let payload = validate_update(payload)?;

    if let Some(name) = payload.name.as_deref()
        && restaurants::name_exists(&state.pool, name, Some(id)).await?
    {
        return Err(name_taken(name).into());
    }

    let restaurant = restaurants::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(restaurant_id = id, "Restaurant updated");
    Ok(Json(restaurant))
}

/// PATCH /api/restaurants/{id}/status?active= - activate or deactivate
pub async fn set_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = restaurants::set_active(&state.pool, id, query.active)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(restaurant_id = id, active = query.active, "Restaurant status changed");
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/{id}/deactivate - soft delete
pub async fn deactivate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = restaurants::set_active(&state.pool, id, false)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(restaurant_id = id, "Restaurant deactivated");
    Ok(Json(restaurant))
}

/// GET /api/restaurants/{id}/delivery-fee/{postal_code}
pub async fn delivery_fee(
    State(state): State<AppState>,
    ApiPath((id, postal_code)): ApiPath<(i64, String)>,
) -> ApiResult<Json<DeliveryFeeQuote>> {
    let postal_code = postal_code.trim().to_string();
    if postal_code.is_empty() {
        return Err(AppError::required("postal_code").into());
    }

    let base = restaurants::delivery_fee(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DeliveryFeeQuote {
        restaurant_id: id,
        fee: delivery_fee_for(base, &postal_code),
        postal_code,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn payload() -> RestaurantCreate {
        RestaurantCreate {
            name: " Pizza Place ".into(),
            category: "Italiana".into(),
            address: "Rua X, 100".into(),
            phone: None,
            delivery_fee: Decimal::new(500, 2),
            rating: Some(Decimal::new(45, 1)),
        }
    }

    #[test]
    fn test_validate_create() {
        let v = validate_create(payload()).unwrap();
        assert_eq!(v.name, "Pizza Place");
    }

    #[test]
    fn test_validate_create_field_bounds() {
        let mut p = payload();
        p.category = "It".into();
        assert_eq!(validate_create(p).unwrap_err().code, ErrorCode::ValidationFailed);

        let mut p = payload();
        p.address = "Rua".into();
        assert_eq!(validate_create(p).unwrap_err().code, ErrorCode::ValidationFailed);

        let mut p = payload();
        p.delivery_fee = Decimal::new(-1, 0);
        assert_eq!(validate_create(p).unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_free_delivery_is_allowed() {
        let mut p = payload();
        p.delivery_fee = Decimal::ZERO;
        assert!(validate_create(p).is_ok());
    }

    #[test]
    fn test_validate_update_partial() {
        let v = validate_update(RestaurantUpdate {
            delivery_fee: Some(Decimal::new(700, 2)),
            ..Default::default()
        })
        .unwrap();
        assert!(v.name.is_none());
        assert_eq!(v.delivery_fee, Some(Decimal::new(700, 2)));
    }

    #[test]
    fn test_name_taken_is_conflict() {
        assert_eq!(name_taken("Pizza Place").http_status(), StatusCode::CONFLICT);
    }
}
