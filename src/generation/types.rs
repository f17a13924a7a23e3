//! Request, template, and response types for the generation pipeline.
//!
//! Wire names are camelCase to match the JSON contract the service exposes;
//! struct fields stay snake_case behind `serde(rename_all)`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A grade/state worksheet request. Every field is required and validated
/// before any network call happens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// "K", "1st", "2nd", ...
    pub grade_level: String,
    /// "Mathematics", "English Language Arts", "Science", "Social Studies"
    pub subject_type: String,
    /// "Addition", "Reading Comprehension", ...
    pub subject: String,
    /// "CA", "TX", "NY", ...
    pub state: String,
    pub main_topic: String,
    pub sub_topic: String,
    /// Template id, e.g. "ThreeQuestionTemplate".
    pub template: String,
}

/// The alternative resource-oriented request shape. No state alignment;
/// standards context is generic and the difficulty knob is explicit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceData {
    /// "Elementary School", "Middle School", "High School"
    pub level: String,
    pub grade: String,
    pub subject: String,
    pub topic: String,
    /// "worksheet", "activity", "assessment", ...
    #[serde(default)]
    pub resource_type: String,
    /// 1 (easiest) to 5 (hardest); missing or out-of-range falls back to 3.
    #[serde(default)]
    pub difficulty: Option<i64>,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// An output-shape contract: the JSON keys the model must fill in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub placeholders: Vec<String>,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        placeholders: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            placeholders,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Validated and enriched model output, keyed by template placeholder plus
/// the injected metadata fields.
pub type GeneratedContent = serde_json::Map<String, Value>;

/// What `POST /generate` returns on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub content: GeneratedContent,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub grade_level: String,
    pub subject: String,
    /// ISO-8601 UTC timestamp taken at response-assembly time.
    pub generated_at: String,
    /// Process-unique token, `req_<millis>_<suffix>`.
    pub request_id: String,
}
