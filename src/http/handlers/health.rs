//! Liveness endpoint.

use axum::{response::IntoResponse, Json};

/// Report that the gateway is up, with the server's current time.
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
