//! Provider router: builds the generation client from configuration.
//!
//! Picks the backend named by `config.provider`, resolves its API key and
//! base URL, and wraps it in a [`RetryingClient`] carrying the configured
//! retry policy.

use std::sync::Arc;
use std::time::Duration;

use planforge_config::AppConfig;
use planforge_core::error::GenerationError;
use planforge_core::provider::Provider;
use tracing::debug;

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::retry::{RetryPolicy, RetryingClient};

/// Build the generation client for the configured provider.
///
/// Fails before any request is attempted: with
/// [`GenerationError::UnknownProvider`] when the name is not a known backend
/// and no `api_url` is configured, and with
/// [`GenerationError::MissingCredential`] when the backend needs a key and
/// none is configured.
pub fn build_from_config(config: &AppConfig) -> Result<RetryingClient, GenerationError> {
    let name = config.provider.as_str();
    let provider_config = config.providers.get(name);
    let api_url = provider_config.and_then(|p| p.api_url.clone());
    let api_key = config.api_key_for(name);
    let key = api_key.clone().unwrap_or_default();

    let provider: Arc<dyn Provider> = match name {
        "gemini" => {
            let mut p = GeminiProvider::new(key);
            if let Some(url) = api_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        "ollama" => Arc::new(OpenAiCompatProvider::ollama(api_url.as_deref())),
        _ => {
            let base_url = api_url
                .or_else(|| known_base_url(name).map(String::from))
                .ok_or_else(|| GenerationError::UnknownProvider(name.to_string()))?;
            Arc::new(OpenAiCompatProvider::new(name, base_url, key))
        }
    };

    if provider.requires_api_key() && api_key.is_none() {
        return Err(missing_key(name));
    }

    let policy = RetryPolicy {
        max_attempts: config.generation.max_attempts,
        per_attempt_timeout: Duration::from_secs(config.generation.request_timeout_secs),
        initial_backoff: Duration::from_millis(config.generation.initial_backoff_ms),
    };

    let model = config.active_model();
    debug!(provider = name, model = %model, ?policy, "Built generation client");

    Ok(RetryingClient::new(provider, model)
        .with_policy(policy)
        .with_temperature(config.temperature)
        .with_max_output_tokens(config.max_output_tokens))
}

fn missing_key(provider: &str) -> GenerationError {
    let hint = if provider == "gemini" {
        "set GEMINI_API_KEY (or PLANFORGE_API_KEY) or add api_key to config.toml".to_string()
    } else {
        format!("set PLANFORGE_API_KEY or add [providers.{provider}] api_key to config.toml")
    };
    GenerationError::MissingCredential(hint)
}

/// Base URL of a well-known OpenAI-compatible provider.
fn known_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_config::ProviderConfig;

    #[test]
    fn gemini_without_key_is_missing_credential() {
        let config = AppConfig::default();
        match build_from_config(&config) {
            Err(GenerationError::MissingCredential(hint)) => {
                assert!(hint.contains("GEMINI_API_KEY"));
            }
            Err(other) => panic!("Expected MissingCredential, got: {other:?}"),
            Ok(_) => panic!("Expected MissingCredential, got a client"),
        }
    }

    #[test]
    fn gemini_with_key_uses_config_policy() {
        let mut config = AppConfig {
            api_key: Some("AIza-test".into()),
            ..AppConfig::default()
        };
        config.generation.max_attempts = 5;
        config.generation.initial_backoff_ms = 250;

        let client = build_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.policy().max_attempts, 5);
        assert_eq!(client.policy().initial_backoff, Duration::from_millis(250));
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".into(),
            model: "llama3".into(),
            ..AppConfig::default()
        };
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn per_provider_key_and_model() {
        let mut config = AppConfig {
            provider: "openai".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-test".into()),
                api_url: None,
                model: Some("gpt-4o-mini".into()),
            },
        );
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn known_base_urls() {
        assert!(known_base_url("openrouter").is_some_and(|u| u.contains("openrouter.ai")));
        assert!(known_base_url("openai").is_some_and(|u| u.contains("api.openai.com")));
        assert_eq!(known_base_url("opanai"), None);
    }

    #[test]
    fn misspelled_provider_is_rejected() {
        let config = AppConfig {
            provider: "opanai".into(),
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        match build_from_config(&config) {
            Err(GenerationError::UnknownProvider(name)) => assert_eq!(name, "opanai"),
            Err(other) => panic!("Expected UnknownProvider, got: {other:?}"),
            Ok(_) => panic!("Expected UnknownProvider, got a client"),
        }
    }

    #[test]
    fn custom_provider_with_url_is_accepted() {
        let mut config = AppConfig {
            provider: "lmstudio".into(),
            api_key: Some("local".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "lmstudio".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("http://localhost:1234/v1".into()),
                model: None,
            },
        );
        let client = build_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "lmstudio");
    }

    #[test]
    fn hosted_provider_without_key_is_missing_credential() {
        let config = AppConfig {
            provider: "groq".into(),
            ..AppConfig::default()
        };
        assert!(matches!(
            build_from_config(&config),
            Err(GenerationError::MissingCredential(_))
        ));
    }
}
