pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .route("/analyze/latest", get(handlers::handle_get_latest))
        .route("/analyze/:id", get(handlers::handle_get_analysis))
        .with_state(state)
}
