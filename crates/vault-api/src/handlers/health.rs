//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database = component_status(state.repositories.health_check().await, "database");
    let storage = component_status(state.blobs.health_check().await, "storage");

    let healthy = database == "ok" && storage == "ok";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            storage: storage.to_string(),
        })),
    )
}

fn component_status(result: vault_core::AppResult<bool>, component: &str) -> &'static str {
    match result {
        Ok(true) => "ok",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(component, error = %e, "Health check failed");
            "unavailable"
        }
    }
}
