//! Configuration loading, validation, and management for PlanForge.
//!
//! Loads configuration from `~/.planforge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use planforge_core::RequiredFieldSpec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Millimetres per inch, for page geometry.
pub const MM_PER_INCH: f32 = 25.4;

/// The root configuration structure.
///
/// Maps directly to `~/.planforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider used for generation
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per generated plan
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Retry and timeout policy for the generation call
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Form configuration
    #[serde(default)]
    pub form: FormConfig,

    /// Prompt template configuration
    #[serde(default)]
    pub prompt: PromptConfig,

    /// PDF export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    4000
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("generation", &self.generation)
            .field("providers", &self.providers)
            .field("form", &self.form)
            .field("prompt", &self.prompt)
            .field("export", &self.export)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Attempts before giving up (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-attempt timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay before the second attempt; doubles after each failure
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_initial_backoff_ms() -> u64 {
    1000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Section name -> required field keys. Empty = built-in table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Inline prompt template with `{field_key}` slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Path to a template file (used when `template` is unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// "letter" or "a4"
    #[serde(default = "default_page_size")]
    pub page_size: String,

    #[serde(default = "default_margin_inches")]
    pub margin_inches: f32,

    /// Where `generate` writes PDFs when no explicit path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

fn default_page_size() -> String {
    "letter".into()
}
fn default_margin_inches() -> f32 {
    0.8
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            margin_inches: default_margin_inches(),
            output_dir: None,
        }
    }
}

impl ExportConfig {
    /// Page width and height in millimetres, if the page size is known.
    pub fn page_dimensions_mm(&self) -> Option<(f32, f32)> {
        match self.page_size.to_ascii_lowercase().as_str() {
            "letter" => Some((215.9, 279.4)),
            "a4" => Some((210.0, 297.0)),
            _ => None,
        }
    }

    pub fn margin_mm(&self) -> f32 {
        self.margin_inches * MM_PER_INCH
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.planforge/config.toml).
    ///
    /// Also checks environment variables:
    /// - `PLANFORGE_API_KEY` (highest priority), then `GEMINI_API_KEY`
    /// - `PLANFORGE_PROVIDER`, `PLANFORGE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (env var name -> value).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("PLANFORGE_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .filter(|k| !k.trim().is_empty());
        }

        if let Some(provider) = lookup("PLANFORGE_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("PLANFORGE_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".planforge")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Default location of the saved wizard answers.
    pub fn answers_path() -> PathBuf {
        Self::config_dir().join("answers.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_attempts must be at least 1".into(),
            ));
        }

        if self.generation.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation.request_timeout_secs must be > 0".into(),
            ));
        }

        let Some((width, height)) = self.export.page_dimensions_mm() else {
            return Err(ConfigError::ValidationError(format!(
                "export.page_size '{}' is not one of: letter, a4",
                self.export.page_size
            )));
        };

        let margin = self.export.margin_mm();
        if margin <= 0.0 || margin * 2.0 >= width.min(height) {
            return Err(ConfigError::ValidationError(
                "export.margin_inches must be positive and leave room for content".into(),
            ));
        }

        self.required_fields()?;

        Ok(())
    }

    /// The required-field table: the config override, or the built-in one.
    pub fn required_fields(&self) -> Result<RequiredFieldSpec, ConfigError> {
        if self.form.required.is_empty() {
            return Ok(RequiredFieldSpec::default());
        }
        RequiredFieldSpec::from_names(&self.form.required)
            .map_err(|e| ConfigError::ValidationError(format!("form.required: {e}")))
    }

    /// The configured prompt template text, if any.
    pub fn prompt_template(&self) -> Result<Option<String>, ConfigError> {
        if let Some(template) = &self.prompt.template {
            return Ok(Some(template.clone()));
        }

        match &self.prompt.template_file {
            Some(file) => {
                let path = PathBuf::from(file);
                std::fs::read_to_string(&path)
                    .map(Some)
                    .map_err(|e| ConfigError::ReadError {
                        path,
                        reason: e.to_string(),
                    })
            }
            None => Ok(None),
        }
    }

    /// API key for `provider`: per-provider key first, then the global one.
    pub fn api_key_for(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// Check if an API key is available for the active provider.
    pub fn has_api_key(&self) -> bool {
        self.api_key_for(&self.provider).is_some()
    }

    /// Model for the active provider: per-provider override, then `model`.
    pub fn active_model(&self) -> String {
        self.providers
            .get(&self.provider)
            .and_then(|p| p.model.clone())
            .unwrap_or_else(|| self.model.clone())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            generation: GenerationConfig::default(),
            providers: HashMap::new(),
            form: FormConfig::default(),
            prompt: PromptConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
