//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Cause, CauseId, Question, QuestionId};

/// Trait for storing and retrieving questions and their causes
///
/// Implemented by the infrastructure layer (causeway-store)
pub trait CauseStore {
    /// Error type for store operations
    type Error;

    /// Insert a new question
    fn insert_question(&mut self, question: Question) -> Result<QuestionId, Self::Error>;

    /// Get a question by ID
    fn get_question(&self, id: QuestionId) -> Result<Option<Question>, Self::Error>;

    /// Overwrite the mutable fields of an existing question
    fn update_question(&mut self, question: &Question) -> Result<(), Self::Error>;

    /// Delete a question and all of its causes
    fn delete_question(&mut self, id: QuestionId) -> Result<(), Self::Error>;

    /// Insert a new cause
    fn insert_cause(&mut self, cause: Cause) -> Result<CauseId, Self::Error>;

    /// Get a cause by ID
    fn get_cause(&self, id: CauseId) -> Result<Option<Cause>, Self::Error>;

    /// Overwrite the mutable fields of an existing cause
    fn update_cause(&mut self, cause: &Cause) -> Result<(), Self::Error>;

    /// All causes of a question, ordered by (row, column)
    fn causes_for_question(&self, question_id: QuestionId) -> Result<Vec<Cause>, Self::Error>;

    /// Causes of a question at one row, ordered by column
    fn causes_at_row(&self, question_id: QuestionId, row: u32) -> Result<Vec<Cause>, Self::Error>;

    /// The cause at (row, column) of a question, if any
    fn cause_at(
        &self,
        question_id: QuestionId,
        row: u32,
        column: u32,
    ) -> Result<Option<Cause>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (causeway-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a single prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
