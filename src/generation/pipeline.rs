//! Generation pipeline.
//!
//! Orchestrates a request end to end: sanitize and validate, resolve the
//! template, build the prompts, call the configured provider with retry,
//! validate and enrich the model's content, and assemble the response
//! envelope. Each in-flight request is an independent task; the only shared
//! state is the registry and the standards index, both behind `Arc`.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::generation::content::{self, ContentError};
use crate::generation::prompt;
use crate::generation::standards::StandardsIndex;
use crate::generation::templates::TemplateRegistry;
use crate::generation::types::{
    GenerationRequest, GenerationResponse, ResourceData, ResponseMetadata,
};
use crate::generation::validate;
use crate::providers::retry::execute_with_retry;
use crate::providers::{
    CostTable, GenerationProvider, ProviderError, ProviderResponse, RetryPolicy,
};

/// Template used when the resource flow does not name one.
pub const DEFAULT_RESOURCE_TEMPLATE: &str = "WorksheetTemplate";

/// Alphabet for request-id suffixes (lowercase base 36).
const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random request-id suffix.
const ID_SUFFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// GenerateError
// ---------------------------------------------------------------------------

/// Errors produced by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The request failed input validation; one message per problem.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The model answered, but its content did not satisfy the template.
    #[error(transparent)]
    Content(#[from] ContentError),
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// End-to-end worksheet generation pipeline.
pub struct Generator {
    provider: Arc<dyn GenerationProvider>,
    templates: Arc<TemplateRegistry>,
    standards: Arc<StandardsIndex>,
    retry: RetryPolicy,
    cost: CostTable,
}

impl Generator {
    /// Create a new generator.
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        templates: Arc<TemplateRegistry>,
        standards: Arc<StandardsIndex>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            templates,
            standards,
            retry,
            cost: CostTable::new(),
        }
    }

    /// The provider this generator sends requests to.
    pub fn provider(&self) -> &dyn GenerationProvider {
        self.provider.as_ref()
    }

    /// Run the grade/state generation flow.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerateError> {
        // 1. Sanitize and validate input, before anything touches the network.
        let request = validate::sanitize(request);
        validate::validate(&request, &self.standards).map_err(GenerateError::Validation)?;

        // 2. Resolve the template.
        let template = self
            .templates
            .get(&request.template)
            .ok_or_else(|| GenerateError::TemplateNotFound(request.template.clone()))?;

        info!(
            template = %template.id,
            grade_level = %request.grade_level,
            subject = %request.subject,
            state = %request.state,
            "Starting worksheet generation"
        );

        // 3. Build the prompt, standards-aligned where the catalog has rows.
        let standards = self.standards.relevant_standards(
            &request.state,
            &request.subject_type,
            &request.grade_level,
        );
        let user_prompt = prompt::build_prompt(&request, &template, &standards);

        // 4. Call the provider, retrying transient failures.
        let response = self.call_provider(&user_prompt).await?;

        // 5. Validate the generated content against the template.
        let mut generated = content::validate_content(response.content, &template)?;

        // 6. Enrich with request context.
        content::enrich_from_request(&mut generated, &request);

        // 7. Assemble the response envelope.
        Ok(GenerationResponse {
            content: generated,
            metadata: ResponseMetadata {
                grade_level: request.grade_level.clone(),
                subject: request.subject.clone(),
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                request_id: request_id(),
            },
        })
    }

    /// Run the resource-data generation flow. `template_id` falls back to the
    /// default worksheet template.
    pub async fn generate_from_resource(
        &self,
        data: ResourceData,
        template_id: Option<&str>,
    ) -> Result<GenerationResponse, GenerateError> {
        // 1. Validate resource fields.
        validate::validate_resource(&data)
            .map_err(|message| GenerateError::Validation(vec![message]))?;

        // 2. Resolve the template.
        let template_id = template_id.unwrap_or(DEFAULT_RESOURCE_TEMPLATE);
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| GenerateError::TemplateNotFound(template_id.to_string()))?;

        info!(
            template = %template.id,
            grade = %data.grade,
            subject = %data.subject,
            topic = %data.topic,
            "Starting resource generation"
        );

        // 3. Build the prompt.
        let user_prompt = prompt::build_resource_prompt(&data, &template);

        // 4. Call the provider, retrying transient failures.
        let response = self.call_provider(&user_prompt).await?;

        // 5. Validate the generated content against the template.
        let mut generated = content::validate_content(response.content, &template)?;

        // 6. Enrich with resource context.
        content::enrich_from_resource(&mut generated, &data);

        // 7. Assemble the response envelope.
        Ok(GenerationResponse {
            content: generated,
            metadata: ResponseMetadata {
                grade_level: data.grade.clone(),
                subject: data.subject.clone(),
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                request_id: request_id(),
            },
        })
    }

    /// Prompt and retry call only, no content validation or enrichment.
    /// The resource endpoint hands the raw parsed output and usage straight
    /// back to its caller.
    pub async fn call_for_resource(
        &self,
        data: &ResourceData,
        template_id: Option<&str>,
    ) -> Result<ProviderResponse, GenerateError> {
        let template_id = template_id.unwrap_or(DEFAULT_RESOURCE_TEMPLATE);
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| GenerateError::TemplateNotFound(template_id.to_string()))?;

        let user_prompt = prompt::build_resource_prompt(data, &template);
        self.call_provider(&user_prompt).await
    }

    async fn call_provider(&self, user_prompt: &str) -> Result<ProviderResponse, GenerateError> {
        let system_prompt = prompt::system_prompt();

        let response = execute_with_retry(&self.retry, || {
            self.provider.generate(system_prompt, user_prompt)
        })
        .await?;

        let estimated_cost = self
            .cost
            .estimate(response.usage.total_tokens, self.provider.model());
        info!(
            model = %self.provider.model(),
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            total_tokens = response.usage.total_tokens,
            estimated_cost_usd = estimated_cost,
            "Provider call complete"
        );

        Ok(response)
    }
}

/// Process-unique request identifier: unix-millis timestamp plus a random
/// lowercase base-36 suffix.
fn request_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("req_{millis}_{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use serde_json::{Value, json};

    use crate::providers::TokenUsage;

    /// Test provider that fails its first `fail_times` calls with a
    /// retryable error, then returns canned content.
    struct StaticProvider {
        content: Value,
        fail_times: u32,
        calls: AtomicU32,
    }

    impl StaticProvider {
        fn new(content: Value) -> Self {
            Self {
                content,
                fail_times: 0,
                calls: AtomicU32::new(0),
            }
        }

        fn failing_first(content: Value, fail_times: u32) -> Self {
            Self {
                content,
                fail_times,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerationProvider for StaticProvider {
        fn id(&self) -> &str {
            "static"
        }

        fn name(&self) -> &str {
            "Static Test Provider"
        }

        fn model(&self) -> &str {
            "gpt-3.5-turbo"
        }

        fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + '_>>
        {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let result = if call <= self.fail_times {
                Err(ProviderError::Api {
                    status: 503,
                    message: "Service overloaded (GATEWAY_BUSY)".to_string(),
                })
            } else {
                Ok(ProviderResponse {
                    content: self.content.clone(),
                    usage: TokenUsage::from_parts(10, 5),
                })
            };
            Box::pin(async move { result })
        }
    }

    fn three_question_content() -> Value {
        json!({
            "worksheetTitle": "Addition Practice",
            "instructions": "Solve each problem.",
            "question1": "1 + 1 = ?",
            "question2": "2 + 2 = ?",
            "question3": "3 + 3 = ?",
            "answer1": "2",
            "answer2": "4",
            "answer3": "6",
        })
    }

    fn valid_request() -> GenerationRequest {
        GenerationRequest {
            grade_level: "2nd".to_string(),
            subject_type: "Mathematics".to_string(),
            subject: "Addition".to_string(),
            state: "CA".to_string(),
            main_topic: "Basic Addition".to_string(),
            sub_topic: "Single Digit Addition".to_string(),
            template: "ThreeQuestionTemplate".to_string(),
        }
    }

    fn resource_data() -> ResourceData {
        ResourceData {
            level: "Elementary School".to_string(),
            grade: "4th".to_string(),
            subject: "Mathematics".to_string(),
            topic: "Fractions".to_string(),
            resource_type: "worksheet".to_string(),
            difficulty: Some(2),
        }
    }

    fn worksheet_content() -> Value {
        json!({
            "worksheetTitle": "Fractions Practice",
            "instructions": "Solve each problem.",
            "question1": "What is 1/2 of 8?",
            "question2": "What is 1/4 of 8?",
            "question3": "What is 3/4 of 8?",
            "question4": "What is 1/8 of 8?",
            "question5": "What is 1/2 of 10?",
            "answer1": "4",
            "answer2": "2",
            "answer3": "6",
            "answer4": "1",
            "answer5": "5",
        })
    }

    fn generator(provider: Arc<StaticProvider>) -> Generator {
        Generator::new(
            provider,
            Arc::new(TemplateRegistry::with_defaults()),
            Arc::new(StandardsIndex::new()),
            RetryPolicy::new().with_initial_backoff(Duration::from_millis(1)),
        )
    }

    #[tokio::test]
    async fn test_generate_happy_path() {
        let provider = Arc::new(StaticProvider::new(three_question_content()));
        let generator = generator(provider.clone());

        let response = generator.generate(valid_request()).await.unwrap();

        assert_eq!(response.content["worksheetTitle"], "Addition Practice");
        assert_eq!(response.content["gradeLevel"], "2nd");
        assert_eq!(response.content["subject"], "Addition");
        assert_eq!(response.metadata.grade_level, "2nd");
        assert_eq!(response.metadata.subject, "Addition");
        assert!(response.metadata.request_id.starts_with("req_"));
        assert!(response.metadata.generated_at.ends_with('Z'));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_request_before_calling_provider() {
        let provider = Arc::new(StaticProvider::new(three_question_content()));
        let generator = generator(provider.clone());

        let mut request = valid_request();
        request.grade_level = String::new();

        let error = generator.generate(request).await.unwrap_err();
        match error {
            GenerateError::Validation(messages) => {
                assert_eq!(messages, vec!["Grade level is required"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_unknown_template_is_not_found() {
        let provider = Arc::new(StaticProvider::new(three_question_content()));
        let generator = generator(provider.clone());

        let mut request = valid_request();
        request.template = "NopeTemplate".to_string();

        let error = generator.generate(request).await.unwrap_err();
        assert_eq!(error.to_string(), "Template 'NopeTemplate' not found");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_retries_transient_failures() {
        let provider = Arc::new(StaticProvider::failing_first(three_question_content(), 2));
        let generator = generator(provider.clone());

        let response = generator.generate(valid_request()).await.unwrap();
        assert_eq!(response.content["question1"], "1 + 1 = ?");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_generate_surfaces_provider_error_after_exhaustion() {
        let provider = Arc::new(StaticProvider::failing_first(three_question_content(), 10));
        let generator = generator(provider.clone());

        let error = generator.generate(valid_request()).await.unwrap_err();
        assert!(matches!(error, GenerateError::Provider(_)));
        // Attempt budget is 3 total calls.
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_generate_incomplete_content_is_content_error() {
        let mut content = three_question_content();
        content.as_object_mut().unwrap().remove("answer3");
        let provider = Arc::new(StaticProvider::new(content));
        let generator = generator(provider.clone());

        let error = generator.generate(valid_request()).await.unwrap_err();
        assert_eq!(error.to_string(), "Missing required content: answer3");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_from_resource_enriches_with_context() {
        let provider = Arc::new(StaticProvider::new(worksheet_content()));
        let generator = generator(provider.clone());

        let response = generator
            .generate_from_resource(resource_data(), None)
            .await
            .unwrap();

        assert_eq!(response.content["schoolLevel"], "Elementary School");
        assert_eq!(response.content["topic"], "Fractions");
        assert_eq!(response.content["resourceType"], "worksheet");
        assert_eq!(response.metadata.grade_level, "4th");
        assert_eq!(response.metadata.subject, "Mathematics");
    }

    #[tokio::test]
    async fn test_generate_from_resource_requires_core_fields() {
        let provider = Arc::new(StaticProvider::new(worksheet_content()));
        let generator = generator(provider.clone());

        let mut data = resource_data();
        data.topic = String::new();

        let error = generator.generate_from_resource(data, None).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Validation failed: Missing required fields: level, grade, subject, topic"
        );
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_call_for_resource_returns_raw_output() {
        // No placeholder check on this path; arbitrary JSON passes through.
        let provider = Arc::new(StaticProvider::new(json!({"anything": true})));
        let generator = generator(provider.clone());

        let response = generator
            .call_for_resource(&resource_data(), None)
            .await
            .unwrap();

        assert_eq!(response.content, json!({"anything": true}));
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[tokio::test]
    async fn test_call_for_resource_unknown_template() {
        let provider = Arc::new(StaticProvider::new(worksheet_content()));
        let generator = generator(provider.clone());

        let error = generator
            .call_for_resource(&resource_data(), Some("MissingTemplate"))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Template 'MissingTemplate' not found");
    }

    #[test]
    fn test_request_id_shape() {
        let id = request_id();
        let mut parts = id.splitn(3, '_');

        assert_eq!(parts.next(), Some("req"));
        let millis = parts.next().unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| ID_CHARSET.contains(&b)));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let first = request_id();
        let second = request_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_generate_error_display() {
        let error = GenerateError::Validation(vec![
            "Grade level is required".to_string(),
            "State is required".to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "Validation failed: Grade level is required, State is required"
        );

        let error = GenerateError::TemplateNotFound("QuizTemplate".to_string());
        assert_eq!(error.to_string(), "Template 'QuizTemplate' not found");
    }
}
