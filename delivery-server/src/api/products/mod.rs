//! Product API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/restaurant/{restaurant_id}",
            get(handler::list_by_restaurant),
        )
        .route("/category/{category}", get(handler::list_by_category))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/deactivate", put(handler::deactivate))
        .route("/{id}/availability", patch(handler::set_availability))
}
