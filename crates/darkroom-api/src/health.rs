use axum::Json;

use darkroom_types::api::HealthResponse;

/// Liveness only; never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now(),
    })
}
