//! Error types for the PlanForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own enum: [`ProviderError`] for one attempt
//! against one backend, [`GenerationError`] for the retried boundary.

use thiserror::Error;

/// Failure of a single attempt against a single LLM backend.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Network(_)
            | ProviderError::Timeout(_)
            | ProviderError::RateLimited { .. }
            | ProviderError::EmptyResponse => true,
            ProviderError::ApiError { status_code, .. } => {
                *status_code == 429 || *status_code >= 500
            }
            ProviderError::AuthenticationFailed(_)
            | ProviderError::ModelNotFound(_)
            | ProviderError::NotConfigured(_) => false,
        }
    }
}

/// Terminal outcome of the retried generation boundary.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("No API key configured: {0}")]
    MissingCredential(String),

    #[error("Generation failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        source: ProviderError,
    },

    #[error("Provider returned an empty plan after {attempts} attempt(s)")]
    EmptyResponse { attempts: u32 },

    #[error("Unknown provider '{0}': set [providers.{0}] api_url or use a known provider")]
    UnknownProvider(String),
}
