use crate::api::events::{IntakeState, post_event};
use crate::health;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the event intake router
pub fn build_router(state: IntakeState) -> Router {
    Router::new()
        // Event intake endpoint
        .route("/event/{eventname}", post(post_event))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Add shared state
        .with_state(state)
        // CORS middleware (publishers may post from anywhere)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
