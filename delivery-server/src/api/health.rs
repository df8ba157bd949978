//! Health check routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Liveness check |
//! | /info | GET | Build information |

use axum::{Json, Router, routing::get};

use crate::state::AppState;

const SERVICE: &str = "delivery-server";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
}

/// GET /health - liveness, no database round trip
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": shared::util::now_millis(),
    }))
}

/// GET /info - application metadata
pub async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "application": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": option_env!("GIT_HASH").unwrap_or("dev"),
        "framework": "axum",
    }))
}
