//! Retrying generation client: bounded attempts with exponential backoff.
//!
//! Wraps a single [`Provider`] and turns it into the black-box
//! [`PlanGenerationClient`] the wizard consumes. Each attempt runs under its
//! own timeout; transient failures are retried after `initial_backoff`,
//! `2 * initial_backoff`, `4 * initial_backoff`, ...

use async_trait::async_trait;
use planforge_core::error::{GenerationError, ProviderError};
use planforge_core::generation::{PlanGenerationClient, PlanText};
use planforge_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How many times to try and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub per_attempt_timeout: Duration,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Delay after the `failed_attempt`-th failure (1-based).
    pub fn backoff_for(&self, failed_attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(failed_attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout: Duration::from_secs(60),
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// A [`PlanGenerationClient`] backed by one provider and a retry policy.
pub struct RetryingClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_output_tokens: None,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Reachability probe for `doctor`.
    pub async fn health_check(&self) -> Result<bool, ProviderError> {
        self.provider.health_check().await
    }

    fn terminal(attempts: u32, error: ProviderError) -> GenerationError {
        match error {
            ProviderError::EmptyResponse => GenerationError::EmptyResponse { attempts },
            source => GenerationError::Transport { attempts, source },
        }
    }
}

#[async_trait]
impl PlanGenerationClient for RetryingClient {
    async fn generate(&self, prompt: &str) -> Result<PlanText, GenerationError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };
        let provider_name = self.provider.name().to_string();
        let total = self.policy.max_attempts.max(1);
        let mut last_error = ProviderError::NotConfigured("No attempts made".into());

        for attempt in 1..=total {
            info!(
                provider = %provider_name,
                model = %self.model,
                attempt,
                total,
                "Requesting business plan"
            );

            let timeout = self.policy.per_attempt_timeout;
            let error = match tokio::time::timeout(timeout, self.provider.complete(request.clone()))
                .await
            {
                Ok(Ok(response)) => match PlanText::new(response.text) {
                    Some(text) => {
                        if let Some(usage) = response.usage {
                            debug!(
                                provider = %provider_name,
                                prompt_tokens = usage.prompt_tokens,
                                completion_tokens = usage.completion_tokens,
                                "Plan generated"
                            );
                        }
                        return Ok(text);
                    }
                    None => ProviderError::EmptyResponse,
                },
                Ok(Err(e)) => e,
                Err(_) => ProviderError::Timeout(format!(
                    "Provider '{}' timed out after {}s",
                    provider_name,
                    timeout.as_secs()
                )),
            };

            if !error.is_transient() {
                warn!(
                    provider = %provider_name,
                    attempt,
                    error = %error,
                    "Generation failed, not retrying"
                );
                return Err(Self::terminal(attempt, error));
            }

            warn!(
                provider = %provider_name,
                attempt,
                total,
                error = %error,
                "Generation attempt failed"
            );
            last_error = error;

            if attempt < total {
                let delay = self.policy.backoff_for(attempt);
                debug!(delay_ms = delay.as_millis() as u64, "Backing off before retry");
                tokio::time::sleep(delay).await;
            }
        }

        Err(Self::terminal(total, last_error))
    }
}
