//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Order aggregate
///
/// `product_ids` keeps line items in request order. Each entry is one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    /// Order time (Unix millis)
    pub ordered_at: i64,
    pub status: OrderStatus,
    /// Product prices plus the restaurant delivery fee
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub notes: Option<String>,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub product_ids: Vec<i64>,
}

/// Place order payload
///
/// Totals and status are always computed by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub restaurant_id: i64,
    #[serde(default)]
    pub product_ids: Vec<i64>,
    pub notes: Option<String>,
    /// Generated when absent
    pub order_number: Option<String>,
    /// Defaults to the time of the request
    pub ordered_at: Option<i64>,
}

/// Change order status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Price breakdown of an order that has not been placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_create_ignores_client_total_and_status() {
        let payload: OrderCreate = serde_json::from_str(
            r#"{
                "customer_id": 1,
                "restaurant_id": 2,
                "product_ids": [1, 5],
                "total": 0.01,
                "status": "DELIVERED"
            }"#,
        )
        .unwrap();
        assert_eq!(payload.product_ids, vec![1, 5]);
        assert!(payload.order_number.is_none());
        assert!(payload.ordered_at.is_none());
    }

    #[test]
    fn test_status_update_payload() {
        let payload: OrderStatusUpdate =
            serde_json::from_str(r#"{"status":"OUT_FOR_DELIVERY"}"#).unwrap();
        assert_eq!(payload.status, OrderStatus::OutForDelivery);
        assert!(serde_json::from_str::<OrderStatusUpdate>(r#"{"status":"LOST"}"#).is_err());
    }
}
