//! Shared harness for the HTTP-level tests: an app wired to a mock gateway,
//! plus request helpers that return (status, parsed body).

// Not every test root uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use pagesmith::AppState;
use pagesmith::api::build_api_router;
use pagesmith::config::Config;
use pagesmith::generation::{Generator, StandardsIndex, TemplateRegistry};
use pagesmith::providers::RetryPolicy;
use pagesmith::providers::gateway::{GatewayConfig, GatewayProvider};

/// Build an app whose gateway provider points at `gateway_url` (normally a
/// wiremock server). Retry backoff is collapsed to a millisecond so the
/// retry-path tests stay fast.
pub fn build_test_app(gateway_url: &str) -> Router {
    let provider = Arc::new(GatewayProvider::new(GatewayConfig {
        url: gateway_url.to_string(),
        api_key: "test-key".to_string(),
        model: "gpt-3.5-turbo".to_string(),
        max_tokens: 2000,
        temperature: 0.7,
    }));

    let templates = Arc::new(TemplateRegistry::with_defaults());
    let standards = Arc::new(StandardsIndex::new());
    let retry = RetryPolicy::new().with_initial_backoff(Duration::from_millis(1));
    let generator = Arc::new(Generator::new(
        provider,
        templates.clone(),
        standards.clone(),
        retry,
    ));

    let state = AppState {
        config: Arc::new(Config::default()),
        templates,
        standards,
        generator,
    };

    build_api_router().with_state(state)
}

/// A worksheet request that passes validation against the built-in catalog.
pub fn valid_generate_body() -> Value {
    json!({
        "gradeLevel": "2nd",
        "subjectType": "Mathematics",
        "subject": "Addition",
        "state": "CA",
        "mainTopic": "Basic Addition",
        "subTopic": "Single Digit Addition",
        "template": "ThreeQuestionTemplate"
    })
}

/// Complete content for `ThreeQuestionTemplate`, as the model would emit it.
pub fn three_question_content() -> Value {
    json!({
        "worksheetTitle": "Addition Practice",
        "instructions": "Solve each problem. Show your work.",
        "question1": "What is 2 + 3?",
        "question2": "What is 4 + 4?",
        "question3": "What is 5 + 1?",
        "answer1": "5",
        "answer2": "8",
        "answer3": "6"
    })
}

/// A successful gateway envelope whose output is `content` serialized to a
/// string, the way the upstream service returns model output.
pub fn gateway_success_body(content: &Value) -> Value {
    json!({
        "success": true,
        "output": content.to_string(),
        "usage": { "inputTokens": 120, "outputTokens": 350 }
    })
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    split(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    split(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    split(app.clone().oneshot(request).await.unwrap()).await
}

async fn split(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
