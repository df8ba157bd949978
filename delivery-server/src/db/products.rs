//! Product database operations

use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::{PgExecutor, PgPool};

use super::DbResult;

const COLUMNS: &str = "id, name, description, price, category, available, restaurant_id";

pub async fn find_by_id(ex: impl PgExecutor<'_>, id: i64) -> DbResult<Option<Product>> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn list_all(pool: &PgPool) -> DbResult<Vec<Product>> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
        .fetch_all(pool)
        .await
}

/// Available products of one restaurant
pub async fn list_available_by_restaurant(
    pool: &PgPool,
    restaurant_id: i64,
) -> DbResult<Vec<Product>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM products WHERE restaurant_id = $1 AND available ORDER BY name, id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

/// Products of a category (case-insensitive)
pub async fn list_by_category(pool: &PgPool, category: &str) -> DbResult<Vec<Product>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM products WHERE LOWER(category) = LOWER($1) ORDER BY name, id"
    ))
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    data: &ProductCreate,
    available: bool,
) -> DbResult<Product> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO products (name, description, price, category, available, restaurant_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(available)
    .bind(data.restaurant_id)
    .fetch_one(ex)
    .await
}

pub async fn update(pool: &PgPool, id: i64, data: &ProductUpdate) -> DbResult<Option<Product>> {
    sqlx::query_as(&format!(
        r#"
        UPDATE products SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            category = COALESCE($5, category),
            restaurant_id = COALESCE($6, restaurant_id),
            available = COALESCE($7, available)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.restaurant_id)
    .bind(data.available)
    .fetch_optional(pool)
    .await
}

pub async fn set_available(pool: &PgPool, id: i64, available: bool) -> DbResult<Option<Product>> {
    sqlx::query_as(&format!(
        "UPDATE products SET available = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(available)
    .fetch_optional(pool)
    .await
}

/// Whether any order line item points at the product
pub async fn is_referenced(pool: &PgPool, id: i64) -> DbResult<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM order_products WHERE product_id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Returns false when no row was deleted
pub async fn delete(pool: &PgPool, id: i64) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
