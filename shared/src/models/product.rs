//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity, owned by exactly one restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub available: bool,
    pub restaurant_id: i64,
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    pub restaurant_id: i64,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    /// Move the product to another restaurant
    pub restaurant_id: Option<i64>,
    pub available: Option<bool>,
}
