use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubjectsQuery {
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct GradesQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub subject: String,
}

/// GET /catalog/templates
///
/// Every registered output template, sorted by id.
pub async fn list_templates(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "templates": state.templates.all() }))
}

/// GET /catalog/states
pub async fn list_states(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "states": state.standards.states() }))
}

/// GET /catalog/subjects?state=CA
///
/// Unknown states degrade to an empty list rather than an error, matching
/// how the standards lookup behaves inside the pipeline.
pub async fn list_subjects(
    State(state): State<AppState>,
    Query(query): Query<SubjectsQuery>,
) -> Json<Value> {
    Json(json!({
        "state": query.state,
        "subjects": state.standards.subjects(&query.state),
    }))
}

/// GET /catalog/grades?state=CA&subject=Mathematics
pub async fn list_grades(
    State(state): State<AppState>,
    Query(query): Query<GradesQuery>,
) -> Json<Value> {
    Json(json!({
        "state": query.state,
        "subject": query.subject,
        "grades": state.standards.grades(&query.state, &query.subject),
    }))
}
