use axum::{response::IntoResponse, Json};

/// Liveness probe. Does not touch the database.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
