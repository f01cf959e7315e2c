//! User-facing rejection messages

use crate::error::position;
use crate::FailureCategory;

/// Turns a failure category into the message shown next to a rejected cause
///
/// # Examples
///
/// ```
/// use causeway_validator::{FailureCategory, FeedbackComposer};
///
/// assert_eq!(
///     FeedbackComposer::compose(FailureCategory::NotCause, true, 1, 3),
///     "Cause B3 is not a cause of B2"
/// );
/// ```
pub struct FeedbackComposer;

impl FeedbackComposer {
    /// Compose the feedback for the cause at (`column`, `row`)
    pub fn compose(category: FailureCategory, has_parent: bool, column: u32, row: u32) -> String {
        let cause = position(column, row);

        match (category, has_parent) {
            (FailureCategory::PositiveOrNeutral, _) => {
                format!("Cause {} is a positive or neutral cause", cause)
            }
            (FailureCategory::NotCause, true) => format!(
                "Cause {} is not a cause of {}",
                cause,
                position(column, row.saturating_sub(1))
            ),
            (FailureCategory::SimilarToPrevious, true) => {
                format!("Cause {} is similar to the previous cause", cause)
            }
            // Without a parent there is nothing to be similar to
            (FailureCategory::NotCause, false) | (FailureCategory::SimilarToPrevious, false) => {
                format!("Cause {} is not a cause of the question", cause)
            }
        }
    }
}
