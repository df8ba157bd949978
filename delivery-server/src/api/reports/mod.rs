//! Report API module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales-by-restaurant", get(handler::sales_by_restaurant))
        .route("/orders-above/{value}", get(handler::orders_above))
        .route("/orders-by-period", get(handler::orders_by_period))
        .route("/order-summary", get(handler::order_summary))
        .route("/top-products", get(handler::top_products))
        .route("/customer-ranking", get(handler::customer_ranking))
}
