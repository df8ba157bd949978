//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_recent).post(handler::create))
        .route("/quote", post(handler::quote))
        .route("/number/{order_number}", get(handler::get_by_number))
        .route("/customer/{customer_id}", get(handler::list_by_customer))
        .route("/{id}", get(handler::get_by_id).delete(handler::cancel))
        .route("/{id}/status", patch(handler::update_status))
}
