//! AI Provider Module
//!
//! Defines the core GenerationProvider trait and error types, plus
//! sub-modules for retry/backoff, cost estimation, and the concrete provider
//! implementations (AI gateway, OpenAI-compatible API).

pub mod cost;
pub mod gateway;
pub mod openai;
pub mod retry;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Re-exports for convenience.
pub use self::cost::CostTable;
pub use self::gateway::GatewayProvider;
pub use self::openai::OpenAiProvider;
pub use self::retry::RetryPolicy;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors that can occur during provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered, but its generation payload was not valid JSON.
    #[error("{0}")]
    InvalidJson(String),

    /// The provider answered successfully but carried no generation payload.
    #[error("No content received from AI gateway")]
    NoContent,

    #[error("Gateway API key is not configured")]
    MissingKey,
}

// ---------------------------------------------------------------------------
// TokenUsage / ProviderResponse
// ---------------------------------------------------------------------------

/// Normalized token accounting. Every provider maps its own wire shape into
/// this one; absent fields become 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Build a usage record from prompt/completion counts, deriving the total.
    pub fn from_parts(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A successful generation: the model's output parsed as JSON, plus
/// normalized usage numbers.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: Value,
    pub usage: TokenUsage,
}

// ---------------------------------------------------------------------------
// GenerationProvider trait
// ---------------------------------------------------------------------------

/// Trait that all content providers must implement.
///
/// Async methods return boxed futures so the trait is dyn-compatible (can be
/// used as `Arc<dyn GenerationProvider>`). No `async_trait` macro is needed.
///
/// The interface is deliberately provider-agnostic: callers hand over a
/// system prompt and a user prompt, and each implementation decides how those
/// map onto its wire format (a single combined prompt field for the gateway,
/// a messages array for OpenAI-style APIs).
pub trait GenerationProvider: Send + Sync {
    /// Unique identifier for this provider (e.g. "gateway", "openai").
    fn id(&self) -> &str;

    /// Human-readable display name.
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Single-shot content generation.
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderResponse, ProviderError>> + Send + '_>>;
}
