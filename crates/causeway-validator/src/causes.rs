//! Cause management

use crate::questions::owned;
use crate::{ValidatorConfig, ValidatorError};
use causeway_domain::traits::CauseStore;
use causeway_domain::{Cause, CauseId, QuestionId, UserId, Viewer};
use tracing::{debug, info};

/// A cause to be placed in a question's diagram
#[derive(Debug, Clone)]
pub struct NewCause {
    /// Question the cause answers
    pub question_id: QuestionId,
    /// Depth in the chain (1 answers the question directly)
    pub row: u32,
    /// Chain index, 0 for column A
    pub column: u32,
    /// Cause text
    pub text: String,
}

/// Adds and edits causes on behalf of a question owner
pub struct CauseService {
    config: ValidatorConfig,
}

impl CauseService {
    /// Create a service applying `config` limits
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Add a pending cause to a question owned by `owner`
    ///
    /// The cause inherits the question's mode. Below row 1 the cause above
    /// it in the same column must already be valid.
    pub fn create<S: CauseStore>(
        &self,
        store: &mut S,
        owner: UserId,
        new: NewCause,
    ) -> Result<Cause, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let question = owned(store, owner, new.question_id)?;

        if new.row == 0 {
            return Err(ValidatorError::InvalidInput(
                "cause rows start at 1".to_string(),
            ));
        }
        if new.column >= self.config.max_columns {
            return Err(ValidatorError::ColumnLimitExceeded {
                column: new.column,
                max: self.config.max_columns,
            });
        }
        let text = self.check_text(&new.text)?;

        let occupied = store
            .cause_at(question.id, new.row, new.column)
            .map_err(ValidatorError::store)?;
        if occupied.is_some() {
            return Err(ValidatorError::InvalidInput(format!(
                "position {} is already taken",
                crate::error::position(new.column, new.row)
            )));
        }
        if new.row > 1 {
            let parent = store
                .cause_at(question.id, new.row - 1, new.column)
                .map_err(ValidatorError::store)?;
            if !parent.is_some_and(|parent| parent.is_valid()) {
                return Err(ValidatorError::InvalidInput(format!(
                    "cause {} must be validated before {} can be added",
                    crate::error::position(new.column, new.row - 1),
                    crate::error::position(new.column, new.row)
                )));
            }
        }

        let cause = Cause::new(question.id, new.row, new.column, text, question.mode);
        store
            .insert_cause(cause.clone())
            .map_err(ValidatorError::store)?;

        info!(
            "Added cause {} to question {}",
            crate::error::position(cause.column, cause.row),
            question.id
        );
        Ok(cause)
    }

    /// Fetch a cause belonging to a question owned by `owner`
    pub fn get<S: CauseStore>(
        &self,
        store: &S,
        owner: UserId,
        cause_id: CauseId,
    ) -> Result<Cause, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let not_found = || ValidatorError::NotFound(format!("cause {}", cause_id));

        let cause = store
            .get_cause(cause_id)
            .map_err(ValidatorError::store)?
            .ok_or_else(not_found)?;
        let question = store
            .get_question(cause.question_id)
            .map_err(ValidatorError::store)?
            .ok_or_else(not_found)?;

        if !question.is_owned_by(owner) {
            return Err(not_found());
        }
        Ok(cause)
    }

    /// Replace the text of a cause and send it back to pending
    ///
    /// Only the deepest cause of a column can be edited.
    pub fn update_text<S: CauseStore>(
        &self,
        store: &mut S,
        owner: UserId,
        cause_id: CauseId,
        text: &str,
    ) -> Result<Cause, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let mut cause = self.get(store, owner, cause_id)?;
        let text = self.check_text(text)?;

        let child = store
            .cause_at(cause.question_id, cause.row + 1, cause.column)
            .map_err(ValidatorError::store)?;
        if child.is_some() {
            return Err(ValidatorError::InvalidInput(format!(
                "cause {} has a cause below it and cannot be edited",
                crate::error::position(cause.column, cause.row)
            )));
        }

        cause.edit(text);
        store.update_cause(&cause).map_err(ValidatorError::store)?;

        debug!(cause = %cause.id, "cause text replaced, verdict reset");
        Ok(cause)
    }

    /// All causes of a visible question, ordered by (row, column)
    pub fn diagram<S: CauseStore>(
        &self,
        store: &S,
        viewer: &Viewer,
        question_id: QuestionId,
    ) -> Result<Vec<Cause>, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let question = store
            .get_question(question_id)
            .map_err(ValidatorError::store)?
            .ok_or_else(|| ValidatorError::NotFound(format!("question {}", question_id)))?;
        if !question.is_visible_to(viewer) {
            return Err(ValidatorError::Forbidden(format!(
                "question {} is not visible to user {}",
                question_id, viewer.id
            )));
        }

        store
            .causes_for_question(question_id)
            .map_err(ValidatorError::store)
    }

    fn check_text<'t>(&self, text: &'t str) -> Result<&'t str, ValidatorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidatorError::InvalidInput(
                "cause text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > self.config.max_cause_length {
            return Err(ValidatorError::InvalidInput(format!(
                "cause text exceeds {} characters",
                self.config.max_cause_length
            )));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_domain::{CauseStatus, Mode, Question};
    use causeway_store::SqliteStore;

    const OWNER: UserId = UserId::local();

    fn setup(mode: Mode) -> (SqliteStore, QuestionId) {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let qid = store
            .insert_question(Question::new(OWNER, "Why did the deploy fail?", mode, 0))
            .unwrap();
        (store, qid)
    }

    fn new_cause(question_id: QuestionId, row: u32, column: u32, text: &str) -> NewCause {
        NewCause {
            question_id,
            row,
            column,
            text: text.to_string(),
        }
    }

    fn service() -> CauseService {
        CauseService::new(ValidatorConfig::default())
    }

    fn create_valid(store: &mut SqliteStore, qid: QuestionId, row: u32, column: u32) -> Cause {
        let mut cause = service()
            .create(store, OWNER, new_cause(qid, row, column, "c"))
            .unwrap();
        cause.accept(false);
        store.update_cause(&cause).unwrap();
        cause
    }

    #[test]
    fn test_create_inherits_mode() {
        let (mut store, qid) = setup(Mode::Supervised);
        let cause = service()
            .create(&mut store, OWNER, new_cause(qid, 1, 0, " expired certificate "))
            .unwrap();

        assert_eq!(cause.mode, Mode::Supervised);
        assert_eq!(cause.status, CauseStatus::Pending);
        assert_eq!(cause.text, "expired certificate");
    }

    #[test]
    fn test_create_requires_owner() {
        let (mut store, qid) = setup(Mode::Private);
        let result = service().create(
            &mut store,
            UserId::from_value(9),
            new_cause(qid, 1, 0, "expired certificate"),
        );
        assert!(matches!(result, Err(ValidatorError::Forbidden(_))));
    }

    #[test]
    fn test_create_missing_question() {
        let (mut store, _) = setup(Mode::Private);
        let result = service().create(&mut store, OWNER, new_cause(QuestionId::new(), 1, 0, "x"));
        assert!(matches!(result, Err(ValidatorError::NotFound(_))));
    }

    #[test]
    fn test_create_bounds() {
        let (mut store, qid) = setup(Mode::Private);

        assert!(matches!(
            service().create(&mut store, OWNER, new_cause(qid, 0, 0, "x")),
            Err(ValidatorError::InvalidInput(_))
        ));
        assert!(matches!(
            service().create(&mut store, OWNER, new_cause(qid, 1, 5, "x")),
            Err(ValidatorError::ColumnLimitExceeded { column: 5, max: 5 })
        ));
        assert!(matches!(
            service().create(&mut store, OWNER, new_cause(qid, 1, 0, "  ")),
            Err(ValidatorError::InvalidInput(_))
        ));
        assert!(matches!(
            service().create(&mut store, OWNER, new_cause(qid, 1, 0, &"x".repeat(121))),
            Err(ValidatorError::InvalidInput(_))
        ));
        assert!(service()
            .create(&mut store, OWNER, new_cause(qid, 1, 4, &"x".repeat(120)))
            .is_ok());
    }

    #[test]
    fn test_create_occupied_position() {
        let (mut store, qid) = setup(Mode::Private);
        service()
            .create(&mut store, OWNER, new_cause(qid, 1, 0, "first"))
            .unwrap();

        let result = service().create(&mut store, OWNER, new_cause(qid, 1, 0, "second"));
        assert!(matches!(result, Err(ValidatorError::InvalidInput(ref m)) if m.contains("A1")));
    }

    #[test]
    fn test_get_hides_foreign_causes() {
        let (mut store, qid) = setup(Mode::Private);
        let cause = service()
            .create(&mut store, OWNER, new_cause(qid, 1, 0, "first"))
            .unwrap();

        assert!(service().get(&store, OWNER, cause.id).is_ok());
        assert!(matches!(
            service().get(&store, UserId::from_value(9), cause.id),
            Err(ValidatorError::NotFound(_))
        ));
        assert!(matches!(
            service().get(&store, OWNER, CauseId::new()),
            Err(ValidatorError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_requires_valid_cause_above() {
        let (mut store, qid) = setup(Mode::Private);
        let mut parent = service()
            .create(&mut store, OWNER, new_cause(qid, 1, 0, "expired certificate"))
            .unwrap();

        let pending = service().create(&mut store, OWNER, new_cause(qid, 2, 0, "no renewal job"));
        assert!(matches!(pending, Err(ValidatorError::InvalidInput(ref m)) if m.contains("A1")));

        let missing = service().create(&mut store, OWNER, new_cause(qid, 2, 1, "no renewal job"));
        assert!(matches!(missing, Err(ValidatorError::InvalidInput(ref m)) if m.contains("B1")));

        parent.reject("Cause A1 is not a cause of the question.".to_string());
        store.update_cause(&parent).unwrap();
        assert!(service()
            .create(&mut store, OWNER, new_cause(qid, 2, 0, "no renewal job"))
            .is_err());

        parent.accept(false);
        store.update_cause(&parent).unwrap();
        let child = service()
            .create(&mut store, OWNER, new_cause(qid, 2, 0, "no renewal job"))
            .unwrap();
        assert_eq!(child.status, CauseStatus::Pending);
        assert_eq!(store.causes_for_question(qid).unwrap().len(), 2);
    }

    #[test]
    fn test_update_text_only_for_deepest_cause() {
        let (mut store, qid) = setup(Mode::Private);
        let parent = create_valid(&mut store, qid, 1, 0);
        let mut child = service()
            .create(&mut store, OWNER, new_cause(qid, 2, 0, "no renewal job"))
            .unwrap();
        child.accept(true);
        store.update_cause(&child).unwrap();

        let result = service().update_text(&mut store, OWNER, parent.id, "wrong hostname");
        assert!(matches!(result, Err(ValidatorError::InvalidInput(ref m)) if m.contains("A1")));

        let stored = store.get_cause(parent.id).unwrap().unwrap();
        assert_eq!(stored.status, CauseStatus::Valid);
        assert_eq!(stored.text, "c");
        assert!(store.get_cause(child.id).unwrap().unwrap().root_status);

        let edited = service()
            .update_text(&mut store, OWNER, child.id, "renewal job disabled")
            .unwrap();
        assert_eq!(edited.status, CauseStatus::Pending);
    }

    #[test]
    fn test_update_text_resets_verdict() {
        let (mut store, qid) = setup(Mode::Private);
        create_valid(&mut store, qid, 1, 0);
        let mut cause = service()
            .create(&mut store, OWNER, new_cause(qid, 2, 0, "first"))
            .unwrap();
        cause.accept(true);
        store.update_cause(&cause).unwrap();

        let edited = service()
            .update_text(&mut store, OWNER, cause.id, "second")
            .unwrap();
        assert_eq!(edited.status, CauseStatus::Pending);
        assert!(!edited.root_status);

        let stored = store.get_cause(cause.id).unwrap().unwrap();
        assert_eq!(stored.text, "second");
        assert_eq!(stored.status, CauseStatus::Pending);
        assert!(stored.feedback.is_empty());
    }

    #[test]
    fn test_diagram_order() {
        let (mut store, qid) = setup(Mode::Private);
        create_valid(&mut store, qid, 1, 1);
        create_valid(&mut store, qid, 1, 0);
        for column in [1, 0] {
            service()
                .create(&mut store, OWNER, new_cause(qid, 2, column, "c"))
                .unwrap();
        }

        let positions: Vec<_> = service()
            .diagram(&store, &Viewer::user(OWNER), qid)
            .unwrap()
            .iter()
            .map(|c| (c.row, c.column))
            .collect();
        assert_eq!(positions, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_diagram_visibility() {
        let (store, qid) = setup(Mode::Private);
        assert!(matches!(
            service().diagram(&store, &Viewer::user(UserId::from_value(9)), qid),
            Err(ValidatorError::Forbidden(_))
        ));
    }
}
