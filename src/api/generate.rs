use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::AppError;
use crate::generation::{GenerationRequest, GenerationResponse};

const MISSING_FIELDS: &str = "Missing required fields: gradeLevel, subjectType, subject, state, \
                              mainTopic, subTopic, template";

/// POST /generate
///
/// Grade/state worksheet generation. The body is checked for shape here
/// (object with the seven string fields present and non-empty) before the
/// request enters the generation pipeline, which applies full validation
/// against the standards catalog.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Ok(Json(body)) = payload else {
        return Err(AppError::BadRequest("Invalid request body".to_string()));
    };
    let Some(fields) = body.as_object() else {
        return Err(AppError::BadRequest("Invalid request body".to_string()));
    };

    let (
        Some(grade_level),
        Some(subject_type),
        Some(subject),
        Some(state_code),
        Some(main_topic),
        Some(sub_topic),
        Some(template),
    ) = (
        string_field(fields, "gradeLevel"),
        string_field(fields, "subjectType"),
        string_field(fields, "subject"),
        string_field(fields, "state"),
        string_field(fields, "mainTopic"),
        string_field(fields, "subTopic"),
        string_field(fields, "template"),
    )
    else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let request = GenerationRequest {
        grade_level,
        subject_type,
        subject,
        state: state_code,
        main_topic,
        sub_topic,
        template,
    };

    tracing::info!(
        grade_level = %request.grade_level,
        subject = %request.subject,
        state = %request.state,
        template = %request.template,
        "Worksheet generation request"
    );

    let response = state.generator.generate(request).await?;
    Ok(Json(response))
}

/// GET /generate
///
/// Discovery payload for clients probing the endpoint with the wrong method.
pub async fn usage_info() -> Json<Value> {
    Json(json!({
        "message": "PageSmith Generation API",
        "usage": "POST with gradeLevel, subjectType, subject, state, mainTopic, subTopic, and template",
        "availableMethods": ["POST"]
    }))
}

/// Present, a string, and non-empty. Anything else counts as missing.
fn string_field(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
