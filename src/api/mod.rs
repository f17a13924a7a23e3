pub mod catalog;
pub mod generate;
pub mod health;
pub mod resource;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

/// Build the full API router with all endpoint groups.
///
/// Route layout:
/// ```text
/// /health                GET   liveness + active provider
/// /generate              POST  grade/state worksheet generation
/// /generate              GET   usage hint
/// /generate-resource     POST  resource-data generation (success envelope)
/// /catalog/templates     GET   registered templates
/// /catalog/states        GET   states with standards data
/// /catalog/subjects      GET   subjects for a state
/// /catalog/grades        GET   grades for a state + subject
/// ```
pub fn build_api_router() -> Router<AppState> {
    let catalog_routes = Router::new()
        .route("/templates", get(catalog::list_templates))
        .route("/states", get(catalog::list_states))
        .route("/subjects", get(catalog::list_subjects))
        .route("/grades", get(catalog::list_grades));

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/generate",
            post(generate::generate).get(generate::usage_info),
        )
        .route("/generate-resource", post(resource::generate_resource))
        .nest("/catalog", catalog_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_router_creates_router() {
        // Smoke test: ensure the router builds without panicking.
        let _router: Router<AppState> = build_api_router();
    }
}
