//! Generated-content validation and enrichment.
//!
//! Model output arrives either as a JSON value or as a string that should
//! parse to one. `validate_content` settles that into an object and checks
//! every template placeholder is filled; the enrichment passes then stamp
//! request-derived fields over whatever the model produced, so downstream
//! consumers always see consistent values for them.

use serde_json::Value;
use thiserror::Error;

use crate::generation::types::{GeneratedContent, GenerationRequest, ResourceData, Template};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("AI response content is not valid JSON")]
    InvalidJson,
    #[error("AI response is not a valid object")]
    NotAnObject,
    #[error("Missing required content: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),
}

/// Check a raw model response against a template.
///
/// A string value is parsed as JSON first. A placeholder is missing when the
/// key is absent or its value is an empty string; `null` and non-string
/// values count as present. Missing placeholders are reported in template
/// order.
pub fn validate_content(raw: Value, template: &Template) -> Result<GeneratedContent, ContentError> {
    let parsed = match raw {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|_| ContentError::InvalidJson)?
        }
        other => other,
    };

    let content = match parsed {
        Value::Object(map) => map,
        _ => return Err(ContentError::NotAnObject),
    };

    let missing: Vec<String> = template
        .placeholders
        .iter()
        .filter(|placeholder| match content.get(placeholder.as_str()) {
            None => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(ContentError::MissingPlaceholders(missing));
    }

    Ok(content)
}

/// Overwrite grade and subject with the request's values, and fill
/// `currentDate` when the template asked for one.
pub fn enrich_from_request(content: &mut GeneratedContent, request: &GenerationRequest) {
    if content.contains_key("currentDate") {
        content.insert("currentDate".to_string(), Value::String(long_form_date()));
    }
    content.insert(
        "gradeLevel".to_string(),
        Value::String(request.grade_level.clone()),
    );
    content.insert("subject".to_string(), Value::String(request.subject.clone()));
}

/// Resource enrichment carries the extra context fields the resource flow
/// collects.
pub fn enrich_from_resource(content: &mut GeneratedContent, data: &ResourceData) {
    if content.contains_key("currentDate") {
        content.insert("currentDate".to_string(), Value::String(long_form_date()));
    }
    content.insert("gradeLevel".to_string(), Value::String(data.grade.clone()));
    content.insert("subject".to_string(), Value::String(data.subject.clone()));
    content.insert("schoolLevel".to_string(), Value::String(data.level.clone()));
    content.insert("topic".to_string(), Value::String(data.topic.clone()));
    content.insert(
        "resourceType".to_string(),
        Value::String(data.resource_type.clone()),
    );
}

/// Long-form local date, e.g. "Monday, August 25, 2026".
fn long_form_date() -> String {
    chrono::Local::now().format("%A, %B %-d, %Y").to_string()
}
