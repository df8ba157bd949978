//! Order database operations

use rust_decimal::Decimal;
use shared::models::Order;
use shared::order::OrderStatus;
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::DbResult;

/// Order columns; line items are folded into `product_ids` in position order
pub(crate) const COLUMNS: &str = r#"
    o.id, o.order_number, o.ordered_at, o.status, o.total, o.notes,
    o.customer_id, o.restaurant_id,
    ARRAY(
        SELECT op.product_id FROM order_products op
        WHERE op.order_id = o.id ORDER BY op.position
    ) AS product_ids
"#;

/// Fully validated order, ready to be written
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub ordered_at: i64,
    pub status: OrderStatus,
    pub total: Decimal,
    pub notes: Option<String>,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub product_ids: Vec<i64>,
}

/// Insert the order row and its line items
///
/// Must run inside the caller's transaction.
pub async fn insert(conn: &mut PgConnection, order: &NewOrder) -> DbResult<Order> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO orders (order_number, ordered_at, status, total, notes, customer_id, restaurant_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&order.order_number)
    .bind(order.ordered_at)
    .bind(order.status)
    .bind(order.total)
    .bind(&order.notes)
    .bind(order.customer_id)
    .bind(order.restaurant_id)
    .fetch_one(&mut *conn)
    .await?;

    let order_ids: Vec<i64> = order.product_ids.iter().map(|_| id).collect();
    let line_count =
        i32::try_from(order.product_ids.len()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let positions: Vec<i32> = (0..line_count).collect();
    sqlx::query(
        "INSERT INTO order_products (order_id, position, product_id) SELECT * FROM UNNEST($1::bigint[], $2::integer[], $3::bigint[])",
    )
    .bind(&order_ids)
    .bind(&positions)
    .bind(&order.product_ids)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders o WHERE o.id = $1"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn find_by_id(ex: impl PgExecutor<'_>, id: i64) -> DbResult<Option<Order>> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders o WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(ex)
        .await
}

pub async fn find_by_number(pool: &PgPool, order_number: &str) -> DbResult<Option<Order>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders o WHERE o.order_number = $1"
    ))
    .bind(order_number)
    .fetch_optional(pool)
    .await
}

pub async fn number_exists(ex: impl PgExecutor<'_>, order_number: &str) -> DbResult<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE order_number = $1)")
        .bind(order_number)
        .fetch_one(ex)
        .await
}

/// Orders of one customer, newest first
pub async fn list_by_customer(pool: &PgPool, customer_id: i64) -> DbResult<Vec<Order>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders o WHERE o.customer_id = $1 ORDER BY o.ordered_at DESC, o.id DESC"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await
}

/// Most recent orders, optionally restricted to one status
pub async fn list_recent(
    pool: &PgPool,
    status: Option<OrderStatus>,
    limit: i64,
) -> DbResult<Vec<Order>> {
    sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM orders o
        WHERE $1::order_status IS NULL OR o.status = $1
        ORDER BY o.ordered_at DESC, o.id DESC
        LIMIT $2
        "#
    ))
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Current status, holding a row lock until the transaction ends
pub async fn lock_status(conn: &mut PgConnection, id: i64) -> DbResult<Option<OrderStatus>> {
    sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn set_status(conn: &mut PgConnection, id: i64, status: OrderStatus) -> DbResult<Order> {
    sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders o WHERE o.id = $1"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}
