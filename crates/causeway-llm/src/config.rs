//! Provider configuration
//!
//! Selects a backend and carries its fixed sampling parameters. The API
//! credential is never part of the configuration: only the name of the
//! environment variable holding it is.

use crate::{LlmError, OllamaProvider, OpenAiProvider, RetryPolicy};
use causeway_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions API
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

/// Deterministic sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    /// Sampling temperature (0.0 for the most deterministic output)
    pub temperature: f32,
    /// Maximum number of output tokens
    pub max_tokens: u32,
    /// Fixed seed for reproducibility (best effort on the vendor side)
    pub seed: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 5,
            seed: 42,
        }
    }
}

/// Configuration for the text-completion backend
///
/// # Examples
///
/// ```
/// use causeway_llm::{ProviderConfig, ProviderKind};
///
/// let config = ProviderConfig::from_toml(r#"
///     kind = "ollama"
///     model = "llama3"
/// "#).unwrap();
/// assert_eq!(config.kind, ProviderKind::Ollama);
/// assert_eq!(config.max_tokens, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which backend to use
    pub kind: ProviderKind,

    /// Base URL; the backend's default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of output tokens
    pub max_tokens: u32,

    /// Fixed sampling seed
    pub seed: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Retries after the first attempt of a request
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds), doubled on each retry
    pub backoff_base_ms: u64,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            endpoint: None,
            model: crate::openai::DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 5,
            seed: 42,
            timeout_secs: 30,
            max_retries: 3,
            backoff_base_ms: 1000,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Sampling parameters as sent on the wire
    pub fn sampling(&self) -> Sampling {
        Sampling {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            seed: self.seed,
        }
    }

    /// Per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy derived from the configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries.saturating_add(1),
            Duration::from_millis(self.backoff_base_ms),
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within [0.0, 2.0]".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.kind == ProviderKind::OpenAi && self.api_key_env.trim().is_empty() {
            return Err("api_key_env must name an environment variable".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Build the configured backend
    ///
    /// Reads the API key from the environment for backends that need one.
    pub fn build(&self) -> Result<ConfiguredProvider, LlmError> {
        self.validate().map_err(LlmError::Config)?;

        match self.kind {
            ProviderKind::OpenAi => {
                let api_key = std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| LlmError::MissingCredential(self.api_key_env.clone()))?;
                let endpoint = self
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| crate::openai::DEFAULT_ENDPOINT.to_string());

                let provider = OpenAiProvider::new(endpoint, self.model.clone(), api_key)?
                    .with_timeout(self.timeout())?
                    .with_sampling(self.sampling())
                    .with_retry(self.retry_policy());
                Ok(ConfiguredProvider::OpenAi(provider))
            }
            ProviderKind::Ollama => {
                let endpoint = self
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| crate::ollama::DEFAULT_ENDPOINT.to_string());

                let provider = OllamaProvider::new(endpoint, self.model.clone())?
                    .with_timeout(self.timeout())?
                    .with_sampling(self.sampling())
                    .with_retry(self.retry_policy());
                Ok(ConfiguredProvider::Ollama(provider))
            }
        }
    }
}

/// A backend chosen at runtime from [`ProviderConfig`]
pub enum ConfiguredProvider {
    /// OpenAI-compatible backend
    OpenAi(OpenAiProvider),
    /// Ollama backend
    Ollama(OllamaProvider),
}

impl ConfiguredProvider {
    /// Model identifier of the underlying backend
    pub fn model(&self) -> &str {
        match self {
            ConfiguredProvider::OpenAi(p) => p.model(),
            ConfiguredProvider::Ollama(p) => p.model(),
        }
    }
}

impl LlmProviderTrait for ConfiguredProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            ConfiguredProvider::OpenAi(p) => p.generate(prompt),
            ConfiguredProvider::Ollama(p) => p.generate(prompt),
        }
    }
}
