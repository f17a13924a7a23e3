//! Request sanitization and validation.
//!
//! Validation is fail-fast and collects every problem in one pass so the
//! caller gets the full picture before anything touches the network.
//! Template existence is deliberately not checked here; the orchestrator
//! resolves the template itself and reports absence as a distinct not-found
//! error.

use crate::generation::standards::StandardsIndex;
use crate::generation::types::{GenerationRequest, ResourceData};

const MAX_TOPIC_CHARS: usize = 200;

/// Trim every string field.
pub fn sanitize(mut request: GenerationRequest) -> GenerationRequest {
    request.grade_level = request.grade_level.trim().to_string();
    request.subject_type = request.subject_type.trim().to_string();
    request.subject = request.subject.trim().to_string();
    request.state = request.state.trim().to_string();
    request.main_topic = request.main_topic.trim().to_string();
    request.sub_topic = request.sub_topic.trim().to_string();
    request.template = request.template.trim().to_string();
    request
}

/// Validate a sanitized grade/state request against the standards catalog.
/// Returns every validation message, in field order.
pub fn validate(request: &GenerationRequest, standards: &StandardsIndex) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if request.grade_level.is_empty() {
        errors.push("Grade level is required".to_string());
    }
    if request.subject_type.is_empty() {
        errors.push("Subject type is required".to_string());
    }
    if request.subject.is_empty() {
        errors.push("Subject is required".to_string());
    }
    if request.state.is_empty() {
        errors.push("State is required".to_string());
    }
    if request.main_topic.is_empty() {
        errors.push("Main topic is required".to_string());
    }
    if request.sub_topic.is_empty() {
        errors.push("Sub topic is required".to_string());
    }
    if request.template.is_empty() {
        errors.push("Template is required".to_string());
    }

    if !request.state.is_empty() && !standards.states().contains(&request.state) {
        errors.push(format!("State '{}' is not supported", request.state));
    }

    if !request.state.is_empty()
        && !request.subject_type.is_empty()
        && !standards.subjects(&request.state).contains(&request.subject_type)
    {
        errors.push(format!(
            "Subject type '{}' is not available for state '{}'",
            request.subject_type, request.state
        ));
    }

    if !request.state.is_empty()
        && !request.subject_type.is_empty()
        && !request.grade_level.is_empty()
        && !standards
            .grades(&request.state, &request.subject_type)
            .contains(&request.grade_level)
    {
        errors.push(format!(
            "Grade level '{}' is not available for {} in state '{}'",
            request.grade_level, request.subject_type, request.state
        ));
    }

    if request.main_topic.chars().count() > MAX_TOPIC_CHARS {
        errors.push("Main topic must be 200 characters or less".to_string());
    }
    if request.sub_topic.chars().count() > MAX_TOPIC_CHARS {
        errors.push("Sub topic must be 200 characters or less".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// The resource flow requires four fields; one combined message covers any
/// combination of absences.
pub fn validate_resource(data: &ResourceData) -> Result<(), String> {
    if data.level.is_empty() || data.grade.is_empty() || data.subject.is_empty() || data.topic.is_empty()
    {
        return Err("Missing required fields: level, grade, subject, topic".to_string());
    }
    Ok(())
}
