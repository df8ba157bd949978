//! Restaurant API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/category/{category}", get(handler::list_by_category))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/status", patch(handler::set_status))
        .route("/{id}/deactivate", put(handler::deactivate))
        .route(
            "/{id}/delivery-fee/{postal_code}",
            get(handler::delivery_fee),
        )
}
