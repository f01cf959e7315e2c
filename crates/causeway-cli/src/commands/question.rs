//! Question command implementation.

use super::{parse_question_id, Context};
use crate::cli::QuestionAction;
use crate::error::Result;
use crate::output::to_json;
use causeway_store::SqliteStore;
use causeway_validator::{CauseService, DiagramRecord, QuestionRecord, QuestionService};

/// Execute a question action and render its result.
pub fn execute_question(
    action: QuestionAction,
    store: &mut SqliteStore,
    context: &Context,
) -> Result<String> {
    let questions = QuestionService::new(context.validator.clone());

    match action {
        QuestionAction::New { text, mode } => {
            let question = questions.create(store, context.owner, &text, mode.into())?;
            to_json(&QuestionRecord::from(&question))
        }
        QuestionAction::List => {
            let records: Vec<QuestionRecord> = store
                .questions_owned_by(context.owner)?
                .iter()
                .map(QuestionRecord::from)
                .collect();
            to_json(&records)
        }
        QuestionAction::Show { id } => {
            let id = parse_question_id(&id)?;
            let question = questions.get(store, &context.viewer, id)?;
            let causes =
                CauseService::new(context.validator.clone()).diagram(store, &context.viewer, id)?;
            to_json(&DiagramRecord::new(&question, &causes))
        }
        QuestionAction::Mode { id, mode } => {
            let id = parse_question_id(&id)?;
            let question = questions.update_mode(store, context.owner, id, mode.into())?;
            to_json(&QuestionRecord::from(&question))
        }
        QuestionAction::Delete { id } => {
            let id = parse_question_id(&id)?;
            questions.delete(store, context.owner, id)?;
            to_json(&serde_json::json!({ "deleted": id.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use crate::error::CliError;
    use causeway_domain::UserId;
    use causeway_validator::{ValidatorConfig, ValidatorError};

    fn context() -> Context {
        Context::new(UserId::local(), false, ValidatorConfig::default())
    }

    fn create(store: &mut SqliteStore, text: &str) -> String {
        let output = execute_question(
            QuestionAction::New {
                text: text.to_string(),
                mode: ModeArg::Private,
            },
            store,
            &context(),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_new_and_show() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = create(&mut store, "Why did the build break?");

        let output = execute_question(QuestionAction::Show { id: id.clone() }, &mut store, &context())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["id"], id);
        assert_eq!(json["question"], "Why did the build break?");
        assert_eq!(json["mode"], "private");
        assert!(json["causes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_list() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        create(&mut store, "first");
        create(&mut store, "second");

        let output = execute_question(QuestionAction::List, &mut store, &context()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_mode_and_delete() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = create(&mut store, "Why?");

        let output = execute_question(
            QuestionAction::Mode {
                id: id.clone(),
                mode: ModeArg::Supervised,
            },
            &mut store,
            &context(),
        )
        .unwrap();
        assert!(output.contains("supervised"));

        execute_question(QuestionAction::Delete { id: id.clone() }, &mut store, &context()).unwrap();
        let result = execute_question(QuestionAction::Show { id }, &mut store, &context());
        assert!(matches!(
            result,
            Err(CliError::Validator(ValidatorError::NotFound(_)))
        ));
    }

    #[test]
    fn test_show_invalid_id() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let result = execute_question(
            QuestionAction::Show {
                id: "nope".to_string(),
            },
            &mut store,
            &context(),
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
