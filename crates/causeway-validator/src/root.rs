//! Root-cause detection

use crate::{ValidationOracle, ValidatorError};
use causeway_domain::{Cause, Question};
use tracing::debug;

/// Decides whether a validated cause is the root cause of its question
pub struct RootCauseDetector<'a, O> {
    oracle: &'a O,
}

impl<'a, O: ValidationOracle> RootCauseDetector<'a, O> {
    /// Create a detector that consults `oracle`
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// One root classification of `cause` against the question text
    ///
    /// Only meaningful for causes already accepted below the first row.
    pub fn is_root(&self, cause: &Cause, question: &Question) -> Result<bool, ValidatorError> {
        let root = self.oracle.classify_root(&cause.text, &question.text)?;
        debug!(cause = %cause.id, row = cause.row, root, "root classification");
        Ok(root)
    }
}
