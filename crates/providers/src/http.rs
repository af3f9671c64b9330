//! Shared HTTP plumbing for the providers.

use planforge_core::error::ProviderError;
use tracing::warn;

/// Build the reqwest client used by every provider.
///
/// Per-attempt deadlines are enforced by the retrying client, so only the
/// connect phase is bounded here.
pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn status_error(provider: &str, status: u16, body: String) -> ProviderError {
    match status {
        429 => ProviderError::RateLimited {
            retry_after_secs: 5,
        },
        401 | 403 => ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ),
        404 => ProviderError::ModelNotFound(body),
        _ => {
            warn!(provider, status, body = %body, "Provider returned error");
            ProviderError::ApiError {
                status_code: status,
                message: body,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error("gemini", 429, String::new()),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            status_error("gemini", 403, String::new()),
            ProviderError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error("gemini", 404, "no such model".into()),
            ProviderError::ModelNotFound(_)
        ));
        match status_error("gemini", 503, "overloaded".into()) {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("Expected ApiError, got: {other:?}"),
        }
    }
}
