//! Validate command implementation.

use super::{parse_question_id, Context};
use crate::cli::ValidateArgs;
use crate::error::Result;
use crate::output::to_json;
use causeway_store::SqliteStore;
use causeway_validator::{CauseRecord, ChainValidator, SweepRecord, ValidationOracle};

/// Execute a validation sweep and render the changed causes.
pub fn execute_validate<O: ValidationOracle>(
    args: ValidateArgs,
    store: &mut SqliteStore,
    context: &Context,
    validator: &ChainValidator<O>,
) -> Result<String> {
    let question_id = parse_question_id(&args.question)?;
    let outcome = validator.validate_as_with_report(store, context.owner, question_id)?;

    if args.report {
        to_json(&SweepRecord::new(&outcome.report, &outcome.causes))
    } else {
        let records: Vec<CauseRecord> = outcome.causes.iter().map(CauseRecord::from).collect();
        to_json(&records)
    }
}
