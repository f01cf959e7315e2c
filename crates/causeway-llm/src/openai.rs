//! OpenAI-compatible Provider Implementation
//!
//! Sends each prompt as a single system message to a `/chat/completions`
//! endpoint with fixed sampling parameters.
//!
//! # Features
//!
//! - Bearer-token authentication (key read from the environment by `ProviderConfig`)
//! - Deterministic sampling: temperature, max output tokens, seed
//! - Retry logic with exponential backoff on transport errors, 429 and 5xx
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use causeway_llm::OpenAiProvider;
//! use causeway_domain::traits::LlmProvider;
//!
//! let provider = OpenAiProvider::new("https://api.openai.com/v1", "gpt-3.5-turbo", "sk-...")?;
//! let answer = provider.generate("Answer with True or False: is water wet?")?;
//! # Ok::<(), causeway_llm::LlmError>(())
//! ```

use crate::retry::{status_error, RetryPolicy};
use crate::{LlmError, Sampling};
use causeway_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    sampling: Sampling,
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    seed: u64,
    n: u32,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, LlmError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

impl OpenAiProvider {
    /// Create a new provider with default sampling, timeout and retries
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-3.5-turbo")
    /// - `api_key`: Bearer token
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            sampling: Sampling::default(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            retry: RetryPolicy::default(),
        })
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
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
            seed: self.sampling.seed,
            n: 1,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "openai completion");
        self.retry.run("openai completion", || self.send_once(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    fn fast(provider: OpenAiProvider, attempts: u32) -> OpenAiProvider {
        provider.with_retry(RetryPolicy::new(attempts, Duration::ZERO))
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAiProvider::new("https://api.openai.com/v1/", "gpt-3.5-turbo", "k").unwrap();
        assert_eq!(provider.endpoint, "https://api.openai.com/v1");
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        assert_eq!(provider.sampling, Sampling::default());
        assert_eq!(provider.retry, RetryPolicy::default());
    }

    #[test]
    fn test_generate_sends_fixed_sampling() {
        let (url, server) = serve(vec![(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":" True \n"}}]}"#.to_string(),
        )]);
        let provider = fast(OpenAiProvider::new(url, "gpt-test", "secret").unwrap(), 1)
            .with_sampling(Sampling {
                temperature: 0.0,
                max_tokens: 5,
                seed: 7,
            });

        let answer = provider.generate("is it causal?").unwrap();
        assert_eq!(answer, "True");

        let bodies = server.join().unwrap();
        let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(sent["model"], "gpt-test");
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][0]["content"], "is it causal?");
        assert_eq!(sent["max_tokens"], 5);
        assert_eq!(sent["seed"], 7);
        assert_eq!(sent["temperature"], 0.0);
    }

    #[test]
    fn test_retries_server_errors() {
        let (url, server) = serve(vec![
            (503, r#"{"error":"overloaded"}"#.to_string()),
            (200, r#"{"choices":[{"message":{"content":"false"}}]}"#.to_string()),
        ]);
        let provider = fast(OpenAiProvider::new(url, "gpt-test", "secret").unwrap(), 3);

        assert_eq!(provider.generate("p").unwrap(), "false");
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_unauthorized_is_not_retried() {
        let (url, server) = serve(vec![(401, r#"{"error":"bad key"}"#.to_string())]);
        let provider = fast(OpenAiProvider::new(url, "gpt-test", "wrong").unwrap(), 3);

        let result = provider.generate("p");
        assert!(matches!(result, Err(LlmError::Rejected(_))));
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_payload() {
        let (url, server) = serve(vec![(200, "not json".to_string())]);
        let provider = fast(OpenAiProvider::new(url, "gpt-test", "secret").unwrap(), 1);

        let result = provider.generate("p");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_empty_choices() {
        let (url, server) = serve(vec![(200, r#"{"choices":[]}"#.to_string())]);
        let provider = fast(OpenAiProvider::new(url, "gpt-test", "secret").unwrap(), 1);

        let result = provider.generate("p");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_openai_error_handling() {
        // Invalid port to trigger a transport error
        let provider = fast(
            OpenAiProvider::new("http://localhost:99999", "gpt-test", "secret").unwrap(),
            1,
        );

        let result = provider.generate("test");
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }
}
