//! Order report queries
//!
//! Aggregates skip canceled orders. Listings keep them, since every row
//! carries its status.

use rust_decimal::Decimal;
use shared::models::{CustomerRanking, Order, OrderSummary, RestaurantSales, TopProduct};
use shared::order::OrderStatus;
use sqlx::PgPool;

use super::DbResult;
use super::orders::COLUMNS;

/// Revenue per restaurant name, highest first
pub async fn sales_by_restaurant(pool: &PgPool) -> DbResult<Vec<RestaurantSales>> {
    sqlx::query_as(
        r#"
        SELECT r.name AS restaurant_name, SUM(o.total) AS total_sales
        FROM orders o
        JOIN restaurants r ON r.id = o.restaurant_id
        WHERE o.status <> 'CANCELED'
        GROUP BY r.name
        ORDER BY total_sales DESC, r.name
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Orders whose total is strictly greater than `value`
pub async fn orders_above(pool: &PgPool, value: Decimal) -> DbResult<Vec<Order>> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders o WHERE o.total > $1 ORDER BY o.total DESC, o.id"
    ))
    .bind(value)
    .fetch_all(pool)
    .await
}

/// Orders placed in `[from, to]` (Unix millis) with the given status
pub async fn orders_by_period_and_status(
    pool: &PgPool,
    from: i64,
    to: i64,
    status: OrderStatus,
) -> DbResult<Vec<Order>> {
    sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM orders o
        WHERE o.ordered_at BETWEEN $1 AND $2 AND o.status = $3
        ORDER BY o.ordered_at, o.id
        "#
    ))
    .bind(from)
    .bind(to)
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Number, total and status of every order placed in `[from, to]`
pub async fn order_summary(pool: &PgPool, from: i64, to: i64) -> DbResult<Vec<OrderSummary>> {
    sqlx::query_as(
        r#"
        SELECT order_number, total, status
        FROM orders
        WHERE ordered_at BETWEEN $1 AND $2
        ORDER BY ordered_at, id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Products ordered most often, by line item count
pub async fn top_products(pool: &PgPool, limit: i64) -> DbResult<Vec<TopProduct>> {
    sqlx::query_as(
        r#"
        SELECT p.id AS product_id, p.name AS product_name, COUNT(*) AS quantity
        FROM order_products op
        JOIN orders o ON o.id = op.order_id
        JOIN products p ON p.id = op.product_id
        WHERE o.status <> 'CANCELED'
        GROUP BY p.id, p.name
        ORDER BY quantity DESC, p.id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Customers with at least one order, by order count
pub async fn customer_ranking(pool: &PgPool) -> DbResult<Vec<CustomerRanking>> {
    sqlx::query_as(
        r#"
        SELECT c.id AS customer_id, c.name AS customer_name, COUNT(o.id) AS total_orders
        FROM orders o
        JOIN customers c ON c.id = o.customer_id
        WHERE o.status <> 'CANCELED'
        GROUP BY c.id, c.name
        ORDER BY total_orders DESC, c.id
        "#,
    )
    .fetch_all(pool)
    .await
}
