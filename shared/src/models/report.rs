//! Report rows
//!
//! Aggregates computed by the database for the order reports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Revenue per restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantSales {
    pub restaurant_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
}

/// One line of the order summary report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub order_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Best-selling product, counted by line items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
}

/// Customers ranked by number of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerRanking {
    pub customer_id: i64,
    pub customer_name: String,
    pub total_orders: i64,
}
