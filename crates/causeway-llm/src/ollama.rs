//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running the
//! validation oracle against a local model.
//!
//! # Features
//!
//! - Blocking HTTP communication with the Ollama `/api/generate` endpoint
//! - Deterministic options (`temperature`, `seed`, `num_predict`)
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use causeway_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3")?;
//! # Ok::<(), causeway_llm::LlmError>(())
//! ```

use crate::openai::build_client;
use crate::retry::{status_error, RetryPolicy};
use crate::{LlmError, Sampling};
use causeway_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    sampling: Sampling,
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    seed: u64,
    num_predict: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            sampling: Sampling::default(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            retry: RetryPolicy::default(),
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Set the sampling parameters
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn send_once(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.sampling.temperature,
                seed: self.sampling.seed,
                num_predict: self.sampling.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, error_text, &self.model));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.response.trim().to_string())
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "ollama completion");
        self.retry.run("ollama completion", || self.send_once(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:11434");
        assert_eq!(provider.model(), "llama3");
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_generate_maps_sampling_to_options() {
        let (url, server) = serve(vec![(200, r#"{"response":"2","done":true}"#.to_string())]);
        let provider = OllamaProvider::new(url, "llama3")
            .unwrap()
            .with_retry(RetryPolicy::new(1, Duration::ZERO));

        assert_eq!(provider.generate("why?").unwrap(), "2");

        let bodies = server.join().unwrap();
        let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(sent["stream"], false);
        assert_eq!(sent["prompt"], "why?");
        assert_eq!(sent["options"]["num_predict"], 5);
        assert_eq!(sent["options"]["seed"], 42);
    }

    #[test]
    fn test_missing_model() {
        let (url, server) = serve(vec![(404, r#"{"error":"model not found"}"#.to_string())]);
        let provider = OllamaProvider::new(url, "ghost")
            .unwrap()
            .with_retry(RetryPolicy::new(3, Duration::ZERO));

        let result = provider.generate("p");
        assert!(matches!(result, Err(LlmError::ModelNotAvailable(ref m)) if m == "ghost"));
        assert_eq!(server.join().unwrap().len(), 1);
    }

    // Integration tests (requires running Ollama)
    #[test]
    #[ignore] // Only run when Ollama is available
    fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3").unwrap();
        let result = provider.generate("Say 'hello' and nothing else");

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }

    #[test]
    fn test_ollama_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OllamaProvider::new("http://localhost:99999", "llama3")
            .unwrap()
            .with_retry(RetryPolicy::new(1, Duration::ZERO));

        match provider.generate("test") {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }
}
