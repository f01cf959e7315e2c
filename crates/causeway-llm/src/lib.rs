//! Causeway LLM Provider Layer
//!
//! Pluggable text-completion backends for the validation oracle.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `causeway-domain`.
//! Every backend is configured with deterministic sampling (low temperature,
//! bounded output, fixed seed) through [`ProviderConfig`].
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use causeway_llm::MockProvider;
//! use causeway_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("True");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "True");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;
pub mod openai;
mod retry;

#[cfg(test)]
mod test_support;

use causeway_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::{ConfiguredProvider, ProviderConfig, ProviderKind, Sampling};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use retry::RetryPolicy;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request rejected by the backend (authentication, bad request)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// API credential environment variable is not set
    #[error("Missing API credential: environment variable {0} is not set")]
    MissingCredential(String),

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

/// Scripted outcome queued on a [`MockProvider`]
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    by_prompt: HashMap<String, Scripted>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Responses are resolved in this order: the next queued response (FIFO),
/// then a response registered for the exact prompt, then the default.
/// Clones share state, so a clone handed to the code under test can be
/// inspected afterwards.
///
/// # Examples
///
/// ```
/// use causeway_llm::MockProvider;
/// use causeway_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("false");
/// assert_eq!(provider.generate("any prompt").unwrap(), "false");
///
/// // Scripted sequence
/// let provider = MockProvider::default();
/// provider.push_response("True");
/// provider.push_response("2");
/// assert_eq!(provider.generate("first").unwrap(), "True");
/// assert_eq!(provider.generate("second").unwrap(), "2");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a response for the next unmatched call
    pub fn push_response(&self, response: impl Into<String>) {
        self.state().queue.push_back(Scripted::Reply(response.into()));
    }

    /// Queue a transport failure for the next call
    pub fn push_error(&self, message: impl Into<String>) {
        self.state().queue.push_back(Scripted::Fail(message.into()));
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .by_prompt
            .insert(prompt.into(), Scripted::Reply(response.into()));
    }

    /// Configure to return a transport failure for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>) {
        self.state()
            .by_prompt
            .insert(prompt.into(), Scripted::Fail("Mock error".to_string()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        self.state().prompts.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        let scripted = match state.queue.pop_front() {
            Some(next) => Some(next),
            None => state.by_prompt.get(prompt).cloned(),
        };

        match scripted {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(LlmError::Communication(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("foo").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_queue_takes_precedence_over_prompt_map() {
        let provider = MockProvider::new("fallback");
        provider.add_response("p", "mapped");
        provider.push_response("queued");

        assert_eq!(provider.generate("p").unwrap(), "queued");
        assert_eq!(provider.generate("p").unwrap(), "mapped");
        assert_eq!(provider.generate("q").unwrap(), "fallback");
    }

    #[test]
    fn test_mock_provider_call_count_and_prompts() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        provider.generate("prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_errors() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt");
        provider.push_error("connection reset");

        let queued = provider.generate("anything");
        assert!(matches!(queued, Err(LlmError::Communication(ref m)) if m == "connection reset"));

        let mapped = provider.generate("bad prompt");
        assert!(matches!(mapped, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::Communication("timeout".into()).is_retryable());
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(!LlmError::Rejected("401".into()).is_retryable());
        assert!(!LlmError::InvalidResponse("junk".into()).is_retryable());
        assert!(!LlmError::ModelNotAvailable("m".into()).is_retryable());
    }
}
