//! AI Gateway Provider
//!
//! Sends combined prompts to the gateway's single-shot generation endpoint
//! and normalizes its response envelope. The gateway wraps every reply in
//! `{success, output, error, code, usage}`; failures can arrive either as a
//! non-2xx status or as a 2xx with `success: false`.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde_json::Value;

use crate::providers::{GenerationProvider, ProviderError, ProviderResponse, TokenUsage};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the gateway provider.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway, or a full URL that already names the
    /// generation path.
    pub url: String,
    /// Bearer token for the Authorization header.
    pub api_key: String,
    /// Model identifier forwarded to the gateway.
    pub model: String,
    /// Token budget per generation.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

// ---------------------------------------------------------------------------
// Gateway response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
struct GatewayEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    usage: Option<GatewayUsage>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct GatewayUsage {
    #[serde(default, rename = "inputTokens")]
    input_tokens: u64,
    #[serde(default, rename = "outputTokens")]
    output_tokens: u64,
}

// ---------------------------------------------------------------------------
// GatewayProvider
// ---------------------------------------------------------------------------

/// Content provider backed by the AI gateway.
pub struct GatewayProvider {
    config: GatewayConfig,
    client: Client,
    endpoint: String,
}

impl GatewayProvider {
    /// Create a new gateway provider.
    pub fn new(config: GatewayConfig) -> Self {
        let endpoint = Self::endpoint_for(&config.url);
        Self {
            config,
            client: Client::new(),
            endpoint,
        }
    }

    /// Resolve the generation endpoint from a configured URL. A URL already
    /// containing the generation path is used verbatim; otherwise the path is
    /// appended to the base.
    fn endpoint_for(url: &str) -> String {
        if url.contains("/api/generate") {
            url.to_string()
        } else {
            format!("{}/api/generate", url.trim_end_matches('/'))
        }
    }

    /// Build the request body in the gateway's wire format.
    fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "prompt": prompt,
            "model": self.config.model,
            "maxTokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    async fn call(&self, prompt: String) -> Result<ProviderResponse, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::MissingKey);
        }

        let body = self.build_request_body(&prompt);
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let envelope: GatewayEnvelope = resp.json().await?;

        if !status.is_success() || !envelope.success {
            let message = format!(
                "{} ({})",
                envelope.error.as_deref().unwrap_or("Unknown error"),
                envelope.code.as_deref().unwrap_or("UNKNOWN_ERROR"),
            );
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let output = envelope
            .output
            .filter(|output| !output.is_empty())
            .ok_or(ProviderError::NoContent)?;

        let content: Value = serde_json::from_str(&output).map_err(|e| {
            ProviderError::InvalidJson(format!("Failed to parse gateway response as JSON: {e}"))
        })?;

        let usage = envelope.usage.unwrap_or_default();
        Ok(ProviderResponse {
            content,
            usage: TokenUsage::from_parts(usage.input_tokens, usage.output_tokens),
        })
    }
}

impl GenerationProvider for GatewayProvider {
    fn id(&self) -> &str {
        "gateway"
    }

    fn name(&self) -> &str {
        "AI Gateway"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + '_>> {
        // The gateway takes one combined prompt field rather than a message
        // list.
        let prompt = format!("{system_prompt}\n\nUser Request: {user_prompt}");
        Box::pin(async move { self.call(prompt).await })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
