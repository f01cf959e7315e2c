//! Validation oracle
//!
//! [`ValidationOracle`] is the seam between the chain validator and whatever
//! judges causal relationships. [`LlmOracle`] implements it on top of any
//! text-completion [`LlmProvider`]; tests inject deterministic fakes instead.

use crate::prompt::{causal_prompt, failure_reason_prompt, root_prompt};
use crate::ValidatorError;
use causeway_domain::traits::LlmProvider;
use tracing::{debug, warn};

/// Why a cause was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Not a cause of the item above it
    NotCause,
    /// A positive or neutral statement rather than a cause
    PositiveOrNeutral,
    /// Too similar to the previous cause of the chain
    SimilarToPrevious,
}

/// Causal, root and failure-mode classification
pub trait ValidationOracle {
    /// Whether `cause` is a genuine continuation of `parent`
    fn classify_causal(&self, parent: &str, cause: &str) -> Result<bool, ValidatorError>;

    /// Whether `cause` is the root cause of `problem`
    fn classify_root(&self, cause: &str, problem: &str) -> Result<bool, ValidatorError>;

    /// Why `cause` is not a continuation of `parent_or_problem`
    ///
    /// `SimilarToPrevious` is only a valid outcome when `has_parent` is true.
    fn classify_failure_reason(
        &self,
        cause: &str,
        parent_or_problem: &str,
        has_parent: bool,
    ) -> Result<FailureCategory, ValidatorError>;
}

impl<O: ValidationOracle + ?Sized> ValidationOracle for &O {
    fn classify_causal(&self, parent: &str, cause: &str) -> Result<bool, ValidatorError> {
        (**self).classify_causal(parent, cause)
    }

    fn classify_root(&self, cause: &str, problem: &str) -> Result<bool, ValidatorError> {
        (**self).classify_root(cause, problem)
    }

    fn classify_failure_reason(
        &self,
        cause: &str,
        parent_or_problem: &str,
        has_parent: bool,
    ) -> Result<FailureCategory, ValidatorError> {
        (**self).classify_failure_reason(cause, parent_or_problem, has_parent)
    }
}

/// Match a true/false answer case-insensitively
///
/// "true" anywhere wins; otherwise "false" anywhere; otherwise `None`.
pub fn parse_boolean(response: &str) -> Option<bool> {
    let lower = response.to_lowercase();
    if lower.contains("true") {
        Some(true)
    } else if lower.contains("false") {
        Some(false)
    } else {
        None
    }
}

/// Match a failure-category digit, checked in the order 1, 2, 3
pub fn parse_failure_category(response: &str, has_parent: bool) -> Option<FailureCategory> {
    if response.contains('1') {
        Some(FailureCategory::NotCause)
    } else if response.contains('2') {
        Some(FailureCategory::PositiveOrNeutral)
    } else if has_parent && response.contains('3') {
        Some(FailureCategory::SimilarToPrevious)
    } else {
        None
    }
}

/// Oracle backed by a text-completion provider
///
/// # Examples
///
/// ```
/// use causeway_llm::MockProvider;
/// use causeway_validator::{LlmOracle, ValidationOracle};
///
/// let oracle = LlmOracle::new(MockProvider::new("True"));
/// assert!(oracle.classify_causal("Why did the project fail?", "no budget").unwrap());
/// ```
pub struct LlmOracle<P> {
    provider: P,
}

impl<P> LlmOracle<P>
where
    P: LlmProvider,
    P::Error: std::fmt::Display,
{
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn ask(&self, kind: &str, prompt: &str) -> Result<String, ValidatorError> {
        let answer = self.provider.generate(prompt).map_err(|e| {
            warn!("{} classification failed: {}", kind, e);
            ValidatorError::AiServiceUnavailable(e.to_string())
        })?;
        debug!("{} classification answered {:?}", kind, answer);
        Ok(answer)
    }

    fn ask_boolean(&self, kind: &str, prompt: &str) -> Result<bool, ValidatorError> {
        let answer = self.ask(kind, prompt)?;
        Ok(parse_boolean(&answer).unwrap_or_else(|| {
            warn!(
                "Ambiguous {} classification {:?}; defaulting to false",
                kind, answer
            );
            false
        }))
    }
}

impl<P> ValidationOracle for LlmOracle<P>
where
    P: LlmProvider,
    P::Error: std::fmt::Display,
{
    fn classify_causal(&self, parent: &str, cause: &str) -> Result<bool, ValidatorError> {
        self.ask_boolean("causal", &causal_prompt(parent, cause))
    }

    fn classify_root(&self, cause: &str, problem: &str) -> Result<bool, ValidatorError> {
        self.ask_boolean("root", &root_prompt(cause, problem))
    }

    fn classify_failure_reason(
        &self,
        cause: &str,
        parent_or_problem: &str,
        has_parent: bool,
    ) -> Result<FailureCategory, ValidatorError> {
        let prompt = failure_reason_prompt(cause, parent_or_problem, has_parent);
        let answer = self.ask("failure reason", &prompt)?;

        Ok(parse_failure_category(&answer, has_parent).unwrap_or_else(|| {
            warn!(
                "Ambiguous failure reason {:?}; defaulting to not-a-cause",
                answer
            );
            FailureCategory::NotCause
        }))
    }
}
