//! Prompt construction for the validation oracle
//!
//! Every prompt ends with a strict answer format so the reply can be matched
//! with a substring test ("true"/"false" or a single digit).

/// Prompt asking whether `cause` directly explains `parent`
pub fn causal_prompt(parent: &str, cause: &str) -> String {
    format!(
        "{}\n\nStatement: {}\nProposed cause: {}\n\n{}",
        CAUSAL_INSTRUCTIONS, parent, cause, BOOLEAN_ANSWER_FORMAT
    )
}

/// Prompt asking whether `cause` is the root cause of `problem`
pub fn root_prompt(cause: &str, problem: &str) -> String {
    format!(
        "{}\n\nProblem: {}\nCause: {}\n\n{}",
        ROOT_INSTRUCTIONS, problem, cause, BOOLEAN_ANSWER_FORMAT
    )
}

/// Prompt asking why `cause` failed to explain `parent`
///
/// Option 3 (similar to the previous cause) is only offered when the cause
/// has a previous cause to be compared with.
pub fn failure_reason_prompt(cause: &str, parent: &str, has_parent: bool) -> String {
    let mut prompt = String::new();

    prompt.push_str(FAILURE_INSTRUCTIONS);
    prompt.push_str("\n\n");

    if has_parent {
        prompt.push_str(&format!("Previous cause: {}\n", parent));
    } else {
        prompt.push_str(&format!("Problem: {}\n", parent));
    }
    prompt.push_str(&format!("Rejected cause: {}\n\n", cause));

    prompt.push_str("Options:\n");
    if has_parent {
        prompt.push_str("1. It is not a cause of the previous cause\n");
    } else {
        prompt.push_str("1. It is not a cause of the problem\n");
    }
    prompt.push_str("2. It is a positive or neutral statement rather than a cause\n");
    if has_parent {
        prompt.push_str("3. It is too similar to the previous cause\n");
        prompt.push_str("\nAnswer with a single digit: 1, 2 or 3.");
    } else {
        prompt.push_str("\nAnswer with a single digit: 1 or 2.");
    }

    prompt
}

const CAUSAL_INSTRUCTIONS: &str = r#"You are checking one step of a "5 whys" root cause analysis.
Decide whether the proposed cause is a direct, plausible reason for the statement.
A cause must be a negative condition or event that produces the statement, not a
restatement of it, not a solution, and not a positive or neutral fact."#;

const ROOT_INSTRUCTIONS: &str = r#"You are checking whether a cause is the ROOT cause of a problem.
A root cause is the fundamental reason the problem happened: if it were removed,
the problem would not recur. An intermediate cause only explains the next step
of the chain and still has a deeper cause of its own."#;

const FAILURE_INSTRUCTIONS: &str = r#"A proposed cause in a "5 whys" root cause analysis was rejected.
Pick the option that best explains why it was rejected."#;

const BOOLEAN_ANSWER_FORMAT: &str = "Answer with exactly one word: True or False.";
