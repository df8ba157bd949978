//! Customer API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::db::customers;
use crate::state::AppState;
use crate::utils::validation::{
    CUSTOMER_NAME_LEN, MAX_ADDRESS_LEN, MAX_PHONE_LEN, email, optional_text, required_text,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub active: bool,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer {id} not found"))
        .with_detail("customer_id", id)
}

fn email_taken(email: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CustomerEmailExists,
        format!("Email {email} is already registered"),
    )
    .with_detail("email", email)
}

fn validate_create(payload: CustomerCreate) -> Result<CustomerCreate, AppError> {
    Ok(CustomerCreate {
        name: required_text(&payload.name, "name", CUSTOMER_NAME_LEN)?,
        email: email(&payload.email)?,
        phone: optional_text(payload.phone.as_deref(), "phone", MAX_PHONE_LEN)?,
        address: optional_text(payload.address.as_deref(), "address", MAX_ADDRESS_LEN)?,
    })
}

fn validate_update(payload: CustomerUpdate) -> Result<CustomerUpdate, AppError> {
    Ok(CustomerUpdate {
        name: payload
            .name
            .map(|n| required_text(&n, "name", CUSTOMER_NAME_LEN))
            .transpose()?,
        email: payload.email.map(|e| email(&e)).transpose()?,
        phone: optional_text(payload.phone.as_deref(), "phone", MAX_PHONE_LEN)?,
        address: optional_text(payload.address.as_deref(), "address", MAX_ADDRESS_LEN)?,
    })
}

/// POST /api/customers - register a customer
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CustomerCreate>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let payload = validate_create(payload)?;

    if customers::email_exists(&state.pool, &payload.email, None).await? {
        return Err(email_taken(&payload.email).into());
    }

    let customer =
        customers::create(&state.pool, &payload, true, shared::util::now_millis()).await?;
    tracing::info!(customer_id = customer.id, "Customer registered");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers - active customers
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let customers = customers::list_active(&state.pool).await?;
    Ok(Json(customers))
}

/// GET /api/customers/search?name= - case-insensitive name search
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    let term = query.name.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::required("name").into());
    }
    let customers = customers::search_by_name(&state.pool, term).await?;
    Ok(Json(customers))
}

/// GET /api/customers/email/{email}
pub async fn get_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<Customer>> {
    let email = email.trim();
    let customer = customers::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CustomerNotFound,
                format!("Customer with email {email} not found"),
            )
        })?;
    Ok(Json(customer))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Customer>> {
    let customer = customers::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer))
}

/// PUT /api/customers/{id} - update the fields present in the body
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CustomerUpdate>,
) -> ApiResult<Json<Customer>> {
    let payload = validate_update(payload)?;

    if let Some(email) = payload.email.as_deref()
        && customers::email_exists(&state.pool, email, Some(id)).await?
    {
        return Err(email_taken(email).into());
    }

    let customer = customers::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, "Customer updated");
    Ok(Json(customer))
}

/// PATCH /api/customers/{id}/status?active= - activate or deactivate
pub async fn set_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Json<Customer>> {
    let customer = customers::set_active(&state.pool, id, query.active)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, active = query.active, "Customer status changed");
    Ok(Json(customer))
}

/// DELETE /api/customers/{id} - soft delete
pub async fn deactivate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Customer>> {
    let customer = customers::set_active(&state.pool, id, false)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, "Customer deactivated");
    Ok(Json(customer))
}
