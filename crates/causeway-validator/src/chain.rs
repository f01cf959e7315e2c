//! Frontier-row validation sweeps

use crate::questions::owned;
use crate::{
    FeedbackComposer, RootCauseDetector, SweepReport, ValidationOracle, ValidatorConfig,
    ValidatorError,
};
use causeway_domain::traits::CauseStore;
use causeway_domain::{Cause, Question, QuestionId, UserId};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Causes changed by a sweep together with its counters
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// Causes whose verdict was written back, ordered by column
    pub causes: Vec<Cause>,

    /// What the sweep did
    pub report: SweepReport,
}

/// Validates the deepest populated row of a question's causal diagram
///
/// Only the frontier row is evaluated; causes already accepted are left
/// alone, so a sweep with nothing pending makes no oracle calls.
///
/// # Examples
///
/// ```
/// use causeway_domain::traits::CauseStore;
/// use causeway_domain::{Cause, Mode, Question, UserId};
/// use causeway_llm::MockProvider;
/// use causeway_store::SqliteStore;
/// use causeway_validator::{ChainValidator, LlmOracle, ValidatorConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new(":memory:")?;
/// let question = Question::new(UserId::local(), "Why did the build break?", Mode::Private, 0);
/// let qid = store.insert_question(question)?;
/// store.insert_cause(Cause::new(qid, 1, 0, "a dependency changed", Mode::Private))?;
///
/// let validator = ChainValidator::new(LlmOracle::new(MockProvider::new("True")), ValidatorConfig::default());
/// let causes = validator.validate(&mut store, qid)?;
/// assert!(causes[0].is_valid());
/// # Ok(())
/// # }
/// ```
pub struct ChainValidator<O> {
    oracle: O,
    config: ValidatorConfig,
    in_flight: Mutex<HashSet<QuestionId>>,
}

impl<O: ValidationOracle> ChainValidator<O> {
    /// Create a validator over `oracle`
    pub fn new(oracle: O, config: ValidatorConfig) -> Self {
        Self {
            oracle,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The oracle consulted by sweeps
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Active configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate the frontier row and return the causes it changed
    pub fn validate<S: CauseStore>(
        &self,
        store: &mut S,
        question_id: QuestionId,
    ) -> Result<Vec<Cause>, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        Ok(self.validate_with_report(store, question_id)?.causes)
    }

    /// Validate on behalf of `caller`, who must own the question
    pub fn validate_as<S: CauseStore>(
        &self,
        store: &mut S,
        caller: UserId,
        question_id: QuestionId,
    ) -> Result<Vec<Cause>, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        Ok(self
            .validate_as_with_report(store, caller, question_id)?
            .causes)
    }

    /// [`validate_as`](Self::validate_as) returning the sweep report too
    pub fn validate_as_with_report<S: CauseStore>(
        &self,
        store: &mut S,
        caller: UserId,
        question_id: QuestionId,
    ) -> Result<SweepOutcome, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        owned(store, caller, question_id)?;
        self.validate_with_report(store, question_id)
    }

    /// Validate the frontier row and return the changed causes with the report
    pub fn validate_with_report<S: CauseStore>(
        &self,
        store: &mut S,
        question_id: QuestionId,
    ) -> Result<SweepOutcome, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let question = load_question(store, question_id)?;
        let _guard = SweepGuard::acquire(&self.in_flight, question_id)?;

        let mut report = SweepReport::new(question_id);

        let frontier = store
            .causes_for_question(question_id)
            .map_err(ValidatorError::store)?
            .iter()
            .map(|cause| cause.row)
            .max();
        report.frontier_row = frontier;

        let Some(frontier) = frontier else {
            info!("Question {} has no causes; nothing to validate", question_id);
            return Ok(SweepOutcome {
                causes: Vec::new(),
                report,
            });
        };

        info!(
            "Starting validation sweep of question {} at row {}",
            question_id, frontier
        );

        let pending = self.resolve_parents(store, &question, frontier, &mut report)?;

        let mut changed = Vec::with_capacity(pending.len());
        for (mut cause, parent) in pending {
            self.evaluate(&mut cause, &parent, &question, &mut report)?;
            store.update_cause(&cause).map_err(ValidatorError::store)?;
            changed.push(cause);
        }

        info!("Validation sweep finished: {}", report.summary());

        Ok(SweepOutcome {
            causes: changed,
            report,
        })
    }

    /// Pair every pending frontier cause with the text it must explain
    ///
    /// Runs to completion before any oracle call so that a broken chain or an
    /// out-of-range column aborts the sweep without oracle traffic.
    fn resolve_parents<S: CauseStore>(
        &self,
        store: &S,
        question: &Question,
        frontier: u32,
        report: &mut SweepReport,
    ) -> Result<Vec<(Cause, String)>, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let row = store
            .causes_at_row(question.id, frontier)
            .map_err(ValidatorError::store)?;

        let mut pending = Vec::new();
        for cause in row {
            if cause.is_valid() {
                report.record_skipped();
                continue;
            }

            if cause.column >= self.config.max_columns {
                return Err(ValidatorError::ColumnLimitExceeded {
                    column: cause.column,
                    max: self.config.max_columns,
                });
            }

            let parent = if cause.has_parent() {
                let parent = store
                    .cause_at(question.id, cause.row - 1, cause.column)
                    .map_err(ValidatorError::store)?
                    .ok_or(ValidatorError::BrokenChain {
                        column: cause.column,
                        row: cause.row,
                    })?;
                if !parent.is_valid() {
                    warn!(
                        "Parent of cause {} is {}, validating against it anyway",
                        cause.id,
                        parent.status.as_str()
                    );
                }
                parent.text
            } else {
                question.text.clone()
            };

            pending.push((cause, parent));
        }

        Ok(pending)
    }

    fn evaluate(
        &self,
        cause: &mut Cause,
        parent: &str,
        question: &Question,
        report: &mut SweepReport,
    ) -> Result<(), ValidatorError> {
        report.record_oracle_call();
        let causal = self.oracle.classify_causal(parent, &cause.text)?;

        if causal {
            let root = if cause.has_parent() {
                report.record_oracle_call();
                RootCauseDetector::new(&self.oracle).is_root(cause, question)?
            } else {
                false
            };
            cause.accept(root);
            report.record_accepted(root);
        } else {
            let has_parent = cause.has_parent();
            report.record_oracle_call();
            let category = self
                .oracle
                .classify_failure_reason(&cause.text, parent, has_parent)?;
            cause.reject(FeedbackComposer::compose(
                category,
                has_parent,
                cause.column,
                cause.row,
            ));
            report.record_rejected();
        }

        debug!(
            cause = %cause.id,
            row = cause.row,
            column = cause.column,
            status = cause.status.as_str(),
            root = cause.root_status,
            "cause evaluated"
        );
        Ok(())
    }
}

fn load_question<S: CauseStore>(
    store: &S,
    question_id: QuestionId,
) -> Result<Question, ValidatorError>
where
    S::Error: std::fmt::Display,
{
    store
        .get_question(question_id)
        .map_err(ValidatorError::store)?
        .ok_or_else(|| ValidatorError::NotFound(format!("question {}", question_id)))
}

/// Marks a question as being swept until dropped
struct SweepGuard<'a> {
    in_flight: &'a Mutex<HashSet<QuestionId>>,
    question_id: QuestionId,
}

impl<'a> SweepGuard<'a> {
    fn acquire(
        in_flight: &'a Mutex<HashSet<QuestionId>>,
        question_id: QuestionId,
    ) -> Result<Self, ValidatorError> {
        let mut active = in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !active.insert(question_id) {
            return Err(ValidatorError::SweepInProgress(question_id));
        }
        Ok(Self {
            in_flight,
            question_id,
        })
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        let mut active = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.question_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmOracle;
    use causeway_domain::{CauseStatus, Mode};
    use causeway_llm::MockProvider;
    use causeway_store::SqliteStore;

    fn setup() -> (SqliteStore, QuestionId) {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let question = Question::new(UserId::local(), "Why is the site down?", Mode::Private, 0);
        let qid = store.insert_question(question).unwrap();
        (store, qid)
    }

    #[test]
    fn test_guard_rejects_second_sweep() {
        let (mut store, qid) = setup();
        let provider = MockProvider::new("True");
        let validator = ChainValidator::new(LlmOracle::new(provider.clone()), ValidatorConfig::default());

        let guard = SweepGuard::acquire(&validator.in_flight, qid).unwrap();
        let result = validator.validate(&mut store, qid);
        assert!(matches!(result, Err(ValidatorError::SweepInProgress(id)) if id == qid));
        assert_eq!(provider.call_count(), 0);

        drop(guard);
        assert!(validator.validate(&mut store, qid).is_ok());
    }

    #[test]
    fn test_guard_released_after_failure() {
        let (mut store, qid) = setup();
        store
            .insert_cause(Cause::new(qid, 2, 0, "orphan", Mode::Private))
            .unwrap();
        let validator = ChainValidator::new(
            LlmOracle::new(MockProvider::new("True")),
            ValidatorConfig::default(),
        );

        assert!(matches!(
            validator.validate(&mut store, qid),
            Err(ValidatorError::BrokenChain { column: 0, row: 2 })
        ));
        assert!(validator.in_flight.lock().unwrap().is_empty());
    }

    #[test]
    fn test_guard_is_per_question() {
        let (mut store, qid) = setup();
        let other = store
            .insert_question(Question::new(UserId::local(), "Why is it slow?", Mode::Private, 0))
            .unwrap();
        let validator = ChainValidator::new(
            LlmOracle::new(MockProvider::new("True")),
            ValidatorConfig::default(),
        );

        let _guard = SweepGuard::acquire(&validator.in_flight, qid).unwrap();
        assert!(validator.validate(&mut store, other).is_ok());
    }

    #[test]
    fn test_row_one_accept_skips_root_check() {
        let (mut store, qid) = setup();
        store
            .insert_cause(Cause::new(qid, 1, 0, "the database ran out of disk", Mode::Private))
            .unwrap();
        let provider = MockProvider::new("True");
        let validator = ChainValidator::new(LlmOracle::new(provider.clone()), ValidatorConfig::default());

        let outcome = validator.validate_with_report(&mut store, qid).unwrap();
        assert_eq!(outcome.causes.len(), 1);
        assert_eq!(outcome.causes[0].status, CauseStatus::Valid);
        assert!(!outcome.causes[0].root_status);
        assert_eq!(outcome.report.oracle_calls, 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_reject_writes_feedback() {
        let (mut store, qid) = setup();
        let id = store
            .insert_cause(Cause::new(qid, 1, 1, "the weather was nice", Mode::Private))
            .unwrap();
        let provider = MockProvider::default();
        provider.push_response("False");
        provider.push_response("2");
        let validator = ChainValidator::new(LlmOracle::new(provider), ValidatorConfig::default());

        validator.validate(&mut store, qid).unwrap();

        let stored = store.get_cause(id).unwrap().unwrap();
        assert_eq!(stored.status, CauseStatus::Invalid);
        assert_eq!(stored.feedback, "Cause B1 is a positive or neutral cause");
    }
}
