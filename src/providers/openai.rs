//! OpenAI-Compatible Provider
//!
//! Talks to an OpenAI-style chat-completions API as the alternate deployment
//! target. Only the wire shape differs from the gateway provider; the rest of
//! the pipeline never sees which one is configured.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde_json::Value;

use crate::providers::{GenerationProvider, ProviderError, ProviderResponse, TokenUsage};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the API (e.g. `https://api.openai.com`).
    pub url: String,
    /// Bearer token for the Authorization header.
    pub api_key: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Token budget per generation.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

// ---------------------------------------------------------------------------
// OpenAI-compatible response types for deserialization
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
struct OaiResponse {
    #[serde(default)]
    choices: Vec<OaiChoice>,
    #[serde(default)]
    usage: Option<OaiUsage>,
}

#[derive(Debug, serde::Deserialize)]
struct OaiChoice {
    #[serde(default)]
    message: Option<OaiMessage>,
}

#[derive(Debug, serde::Deserialize)]
struct OaiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct OaiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

// ---------------------------------------------------------------------------
// OpenAiProvider
// ---------------------------------------------------------------------------

/// Content provider backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.url.trim_end_matches('/')
        )
    }

    /// Build the request body in the chat-completions wire format. The system
    /// and user prompts stay separate messages here, unlike the gateway's
    /// combined prompt field.
    fn build_request_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    async fn call(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> Result<ProviderResponse, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::MissingKey);
        }

        let body = self.build_request_body(&system_prompt, &user_prompt);
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: code,
                message,
            });
        }

        let oai: OaiResponse = resp.json().await?;

        let output = oai
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::NoContent)?;

        let content: Value = serde_json::from_str(&output).map_err(|e| {
            ProviderError::InvalidJson(format!("Failed to parse model response as JSON: {e}"))
        })?;

        let usage = oai.usage.unwrap_or_default();
        Ok(ProviderResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }
}

impl GenerationProvider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + '_>> {
        let system_prompt = system_prompt.to_string();
        let user_prompt = user_prompt.to_string();
        Box::pin(async move { self.call(system_prompt, user_prompt).await })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
