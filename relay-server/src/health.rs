use crate::api::events::IntakeState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde_json::json;

/// GET /health - Health check with registry status
pub async fn health_check(State(state): State<IntakeState>) -> Response {
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tenants": state.registry.tenant_count().await,
        "connections": state.registry.total_connections().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe (ready to accept traffic?)
pub async fn readiness_check(State(state): State<IntakeState>) -> Response {
    // The tenant set is closed after startup, so a populated registry means
    // provisioning finished
    if state.registry.tenant_count().await > 0 {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "No tenants provisioned").into_response()
    }
}
