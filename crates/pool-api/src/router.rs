use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, dashboard, health, readings};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Reading routes
        .route("/api/v1/readings", post(readings::submit))
        .route(
            "/api/v1/readings/{reference_id}",
            get(readings::view).put(readings::revise),
        )
        .route("/api/v1/readings/{reference_id}/status", put(readings::update_status))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
