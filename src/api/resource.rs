use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::AppState;
use crate::generation::ResourceData;

/// POST /generate-resource
///
/// Resource-oriented generation with the success-envelope contract: the body
/// is the resource data itself, and every outcome is JSON with a `success`
/// flag. Failures are always 500 with the error message in the envelope,
/// never the flat error shape the worksheet endpoint uses.
pub async fn generate_resource(
    State(state): State<AppState>,
    payload: Result<Json<ResourceData>, JsonRejection>,
) -> Response {
    let data = match payload {
        Ok(Json(data)) => data,
        Err(rejection) => return failure(rejection.to_string()),
    };

    tracing::info!(
        level = %data.level,
        grade = %data.grade,
        subject = %data.subject,
        topic = %data.topic,
        "Resource generation request"
    );

    match state.generator.call_for_resource(&data, None).await {
        Ok(response) => Json(json!({
            "success": true,
            "content": response.content,
            "usage": response.usage,
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Resource generation failed");
            failure(err.to_string())
        }
    }
}

fn failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "error": message})),
    )
        .into_response()
}
