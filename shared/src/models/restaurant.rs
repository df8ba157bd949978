//! Restaurant Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    /// Unique across all restaurants
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    pub active: bool,
    pub created_at: i64,
}

/// Register restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub delivery_fee: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
}

/// Delivery fee quoted for one postal code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryFeeQuote {
    pub restaurant_id: i64,
    pub postal_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
}

/// Surcharge added to the base fee, chosen by postal code prefix
pub fn postal_surcharge(postal_code: &str) -> Decimal {
    let code = postal_code.trim();
    if code.starts_with("01") {
        Decimal::from(5)
    } else if code.starts_with("02") {
        Decimal::from(8)
    } else {
        Decimal::from(10)
    }
}

/// Delivery fee for a restaurant base fee and a destination postal code
pub fn delivery_fee_for(base_fee: Decimal, postal_code: &str) -> Decimal {
    base_fee + postal_surcharge(postal_code)
}
