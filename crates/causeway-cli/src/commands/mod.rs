//! Command implementations.

pub mod cause;
pub mod question;
pub mod validate;

pub use self::cause::execute_cause;
pub use self::question::execute_question;
pub use self::validate::execute_validate;

use crate::error::{CliError, Result};
use causeway_domain::{CauseId, QuestionId, UserId, Viewer};
use causeway_validator::ValidatorConfig;

/// Who is running a command and under which limits.
#[derive(Debug, Clone)]
pub struct Context {
    /// Acting user
    pub owner: UserId,
    /// Visibility used for read commands
    pub viewer: Viewer,
    /// Diagram limits
    pub validator: ValidatorConfig,
}

impl Context {
    /// Build a context for `owner`
    pub fn new(owner: UserId, supervisor: bool, validator: ValidatorConfig) -> Self {
        let viewer = if supervisor {
            Viewer::supervisor(owner)
        } else {
            Viewer::user(owner)
        };
        Self {
            owner,
            viewer,
            validator,
        }
    }
}

pub(crate) fn parse_question_id(input: &str) -> Result<QuestionId> {
    QuestionId::from_string(input)
        .map_err(|e| CliError::InvalidInput(format!("Invalid question ID '{}': {}", input, e)))
}

pub(crate) fn parse_cause_id(input: &str) -> Result<CauseId> {
    CauseId::from_string(input)
        .map_err(|e| CliError::InvalidInput(format!("Invalid cause ID '{}': {}", input, e)))
}
