//! Cause command implementation.

use super::{parse_cause_id, parse_question_id, Context};
use crate::cli::CauseAction;
use crate::error::Result;
use crate::output::to_json;
use causeway_store::SqliteStore;
use causeway_validator::{CauseRecord, CauseService, NewCause};

/// Execute a cause action and render its result.
pub fn execute_cause(
    action: CauseAction,
    store: &mut SqliteStore,
    context: &Context,
) -> Result<String> {
    let causes = CauseService::new(context.validator.clone());

    let cause = match action {
        CauseAction::Add {
            question,
            row,
            column,
            text,
        } => {
            let new = NewCause {
                question_id: parse_question_id(&question)?,
                row,
                column,
                text,
            };
            causes.create(store, context.owner, new)?
        }
        CauseAction::Edit { id, text } => {
            causes.update_text(store, context.owner, parse_cause_id(&id)?, &text)?
        }
        CauseAction::Show { id } => causes.get(store, context.owner, parse_cause_id(&id)?)?,
    };

    to_json(&CauseRecord::from(&cause))
}
