//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{check_app_status, health, prometheus, toggle_app_status, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Kill switch endpoints
        .route("/api/check-app-status", get(check_app_status))
        .route("/api/toggle-app-status", post(toggle_app_status));

    if let Some(handle) = state.metrics.clone() {
        router = router.route("/metrics", get(move || prometheus(handle.clone())));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Any origin may call the API.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
