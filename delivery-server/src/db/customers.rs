//! Customer database operations

use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::{PgExecutor, PgPool};

use super::{DbResult, contains_pattern};

const COLUMNS: &str = "id, name, email, phone, address, active, registered_at";

pub async fn find_by_id(ex: impl PgExecutor<'_>, id: i64) -> DbResult<Option<Customer>> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM customers WHERE id = $1"))
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> DbResult<Option<Customer>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM customers WHERE LOWER(email) = LOWER($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Whether another customer already uses `email`
pub async fn email_exists(pool: &PgPool, email: &str, exclude_id: Option<i64>) -> DbResult<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM customers WHERE LOWER(email) = LOWER($1) AND id IS DISTINCT FROM $2)",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

pub async fn list_active(pool: &PgPool) -> DbResult<Vec<Customer>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM customers WHERE active ORDER BY name, id"
    ))
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search on the name
pub async fn search_by_name(pool: &PgPool, term: &str) -> DbResult<Vec<Customer>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM customers WHERE name ILIKE $1 ORDER BY name, id"
    ))
    .bind(contains_pattern(term))
    .fetch_all(pool)
    .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    data: &CustomerCreate,
    active: bool,
    registered_at: i64,
) -> DbResult<Customer> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO customers (name, email, phone, address, active, registered_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(active)
    .bind(registered_at)
    .fetch_one(ex)
    .await
}

/// Apply the present fields of `data`; `None` when the customer does not exist
pub async fn update(pool: &PgPool, id: i64, data: &CustomerUpdate) -> DbResult<Option<Customer>> {
    sqlx::query_as(&format!(
        r#"
        UPDATE customers SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            address = COALESCE($5, address)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .fetch_optional(pool)
    .await
}

pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> DbResult<Option<Customer>> {
    sqlx::query_as(&format!(
        "UPDATE customers SET active = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(active)
    .fetch_optional(pool)
    .await
}

pub async fn is_empty(pool: &PgPool) -> DbResult<bool> {
    sqlx::query_scalar("SELECT NOT EXISTS (SELECT 1 FROM customers)")
        .fetch_one(pool)
        .await
}
