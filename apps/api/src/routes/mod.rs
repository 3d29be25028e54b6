pub mod health;
pub mod info;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::assignment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(info::root_info_handler))
        .route("/api/health", get(health::health_handler))
        .route(
            "/api",
            get(info::api_info_handler).post(handlers::handle_ask),
        )
        .route(
            "/api/",
            get(info::api_info_handler).post(handlers::handle_ask),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
