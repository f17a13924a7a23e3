//! Retry logic and backoff for provider requests.
//!
//! Implements exponential backoff with fail-fast classification: validation
//! and auth failures are surfaced immediately, everything else is retried
//! until the attempt budget is spent.

use std::time::Duration;

use tracing::{debug, warn};

use crate::providers::ProviderError;

// MARK: - Constants

/// Default total attempt budget.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial backoff duration (1 second).
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;

/// Default maximum backoff duration (60 seconds).
const DEFAULT_MAX_BACKOFF_MS: u64 = 60_000;

/// Default backoff multiplier.
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Upstream error-message markers indicating a validation or auth failure.
/// A request failing with one of these will not succeed on retry.
const NON_RETRYABLE_MARKERS: [&str; 4] = [
    "VALIDATION_ERROR",
    "MISSING_AUTH_HEADER",
    "MISSING_API_KEY",
    "UNAUTHORIZED",
];

// MARK: - Retry Policy

/// Policy for retrying failed provider requests with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Backoff multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Create a new retry policy with default settings.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Set the total attempt budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff_ms = duration.as_millis() as u64;
        self
    }

    /// Set maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff_ms = duration.as_millis() as u64;
        self
    }

    /// Calculate backoff duration after a given failed attempt (counted
    /// from 1): `initial * multiplier^attempt`, capped at the maximum.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let backoff_ms = (self.initial_backoff_ms as f64
            * self.backoff_multiplier.powi(attempt as i32))
        .min(self.max_backoff_ms as f64) as u64;

        Duration::from_millis(backoff_ms)
    }

    /// Check whether a failed attempt is worth repeating.
    ///
    /// HTTP 400/401 responses and errors whose message carries a known
    /// validation/auth marker are client-side problems that retrying cannot
    /// fix. Network errors, server errors, and malformed model output may all
    /// succeed on a fresh attempt.
    pub fn is_retryable(&self, error: &ProviderError) -> bool {
        match error {
            ProviderError::Api { status, message } => {
                if *status == 400 || *status == 401 {
                    return false;
                }
                !NON_RETRYABLE_MARKERS
                    .iter()
                    .any(|marker| message.contains(marker))
            }
            ProviderError::MissingKey => false,
            _ => true,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// MARK: - Retry Executor

/// Execute a provider request with retry logic.
///
/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the attempt budget is exhausted; the last error is surfaced to the caller.
pub async fn execute_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempt, "Provider request succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                attempt += 1;

                if !policy.is_retryable(&error) {
                    warn!(
                        attempt,
                        error = %error,
                        "Provider request failed with non-retryable error"
                    );
                    return Err(error);
                }

                if attempt >= policy.max_retries {
                    warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        error = %error,
                        "Max retries exceeded"
                    );
                    return Err(error);
                }

                let backoff = policy.backoff_for(attempt);
                warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %error,
                    "Provider request failed, retrying after backoff"
                );

                tokio::time::sleep(backoff).await;
            }
        }
    }
}

// MARK: - Tests
