use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
}

/// GET /health
///
/// Liveness probe reporting which provider and model the service is wired
/// to. Does not call the provider.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.generator.provider();
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: provider.id().to_string(),
        model: provider.model().to_string(),
    })
}
