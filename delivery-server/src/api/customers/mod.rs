//! Customer API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/email/{email}", get(handler::get_by_email))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::deactivate),
        )
        .route("/{id}/status", patch(handler::set_status))
}
