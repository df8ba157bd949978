//! Restaurant database operations

use rust_decimal::Decimal;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use sqlx::{PgExecutor, PgPool};

use super::DbResult;

const COLUMNS: &str = "id, name, category, address, phone, delivery_fee, rating, active, created_at";

pub async fn find_by_id(ex: impl PgExecutor<'_>, id: i64) -> DbResult<Option<Restaurant>> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM restaurants WHERE id = $1"))
        .bind(id)
        .fetch_optional(ex)
        .await
}

/// Whether another restaurant already uses `name`
pub async fn name_exists(pool: &PgPool, name: &str, exclude_id: Option<i64>) -> DbResult<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM restaurants WHERE LOWER(name) = LOWER($1) AND id IS DISTINCT FROM $2)",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

pub async fn list_active(pool: &PgPool) -> DbResult<Vec<Restaurant>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM restaurants WHERE active ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await
}

/// Active restaurants of a category (case-insensitive)
pub async fn list_by_category(pool: &PgPool, category: &str) -> DbResult<Vec<Restaurant>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM restaurants WHERE active AND LOWER(category) = LOWER($1) ORDER BY name, id"
    ))
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    data: &RestaurantCreate,
    created_at: i64,
) -> DbResult<Restaurant> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO restaurants (name, category, address, phone, delivery_fee, rating, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.delivery_fee)
    .bind(data.rating)
    .bind(created_at)
    .fetch_one(ex)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &RestaurantUpdate,
) -> DbResult<Option<Restaurant>> {
    sqlx::query_as(&format!(
        r#"
        UPDATE restaurants SET
            name = COALESCE($2, name),
            category = COALESCE($3, category),
            address = COALESCE($4, address),
            phone = COALESCE($5, phone),
            delivery_fee = COALESCE($6, delivery_fee),
            rating = COALESCE($7, rating)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.delivery_fee)
    .bind(data.rating)
    .fetch_optional(pool)
    .await
}

pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> DbResult<Option<Restaurant>> {
    sqlx::query_as(&format!(
        "UPDATE restaurants SET active = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(active)
    .fetch_optional(pool)
    .await
}

/// Base delivery fee, `None` when the restaurant does not exist
pub async fn delivery_fee(pool: &PgPool, id: i64) -> DbResult<Option<Decimal>> {
    sqlx::query_scalar("SELECT delivery_fee FROM restaurants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
