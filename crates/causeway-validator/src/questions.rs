//! Question management

use crate::{ValidatorConfig, ValidatorError};
use causeway_domain::traits::CauseStore;
use causeway_domain::{Mode, Question, QuestionId, UserId, Viewer};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Creates, reads and deletes questions on behalf of a user
pub struct QuestionService {
    config: ValidatorConfig,
}

impl QuestionService {
    /// Create a service applying `config` limits
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Create a question owned by `owner`
    pub fn create<S: CauseStore>(
        &self,
        store: &mut S,
        owner: UserId,
        text: &str,
        mode: Mode,
    ) -> Result<Question, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidatorError::InvalidInput(
                "question text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > self.config.max_question_length {
            return Err(ValidatorError::InvalidInput(format!(
                "question text exceeds {} characters",
                self.config.max_question_length
            )));
        }

        let question = Question::new(owner, text, mode, current_timestamp());
        store
            .insert_question(question.clone())
            .map_err(ValidatorError::store)?;

        info!("Created {} question {}", question.mode.as_str(), question.id);
        Ok(question)
    }

    /// Fetch a question the viewer is allowed to see
    pub fn get<S: CauseStore>(
        &self,
        store: &S,
        viewer: &Viewer,
        id: QuestionId,
    ) -> Result<Question, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let question = fetch(store, id)?;
        if !question.is_visible_to(viewer) {
            return Err(ValidatorError::Forbidden(format!(
                "question {} is not visible to user {}",
                id, viewer.id
            )));
        }
        Ok(question)
    }

    /// Change the visibility mode of a question
    pub fn update_mode<S: CauseStore>(
        &self,
        store: &mut S,
        owner: UserId,
        id: QuestionId,
        mode: Mode,
    ) -> Result<Question, ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        let mut question = owned(store, owner, id)?;
        question.mode = mode;
        store
            .update_question(&question)
            .map_err(ValidatorError::store)?;
        Ok(question)
    }

    /// Delete a question and its causes
    pub fn delete<S: CauseStore>(
        &self,
        store: &mut S,
        owner: UserId,
        id: QuestionId,
    ) -> Result<(), ValidatorError>
    where
        S::Error: std::fmt::Display,
    {
        owned(store, owner, id)?;
        store.delete_question(id).map_err(ValidatorError::store)?;
        info!("Deleted question {}", id);
        Ok(())
    }
}

fn fetch<S: CauseStore>(store: &S, id: QuestionId) -> Result<Question, ValidatorError>
where
    S::Error: std::fmt::Display,
{
    store
        .get_question(id)
        .map_err(ValidatorError::store)?
        .ok_or_else(|| ValidatorError::NotFound(format!("question {}", id)))
}

/// Fetch a question and require `owner` to own it
pub(crate) fn owned<S: CauseStore>(
    store: &S,
    owner: UserId,
    id: QuestionId,
) -> Result<Question, ValidatorError>
where
    S::Error: std::fmt::Display,
{
    let question = fetch(store, id)?;
    if !question.is_owned_by(owner) {
        return Err(ValidatorError::Forbidden(format!(
            "user {} does not own question {}",
            owner, id
        )));
    }
    Ok(question)
}
