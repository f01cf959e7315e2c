//! Cause module - one step of a "why" chain

use crate::{CauseId, Mode, QuestionId};

/// Evaluation state of a cause
///
/// A cause starts `Pending` and is moved to `Valid` or `Invalid` by a
/// validation sweep. Editing the text of a cause puts it back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CauseStatus {
    /// Not evaluated yet (or edited since the last evaluation)
    #[default]
    Pending,

    /// Confirmed as a genuine continuation of its chain
    Valid,

    /// Rejected; the cause carries feedback explaining why
    Invalid,
}

impl CauseStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CauseStatus::Pending => "pending",
            CauseStatus::Valid => "valid",
            CauseStatus::Invalid => "invalid",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CauseStatus::Pending),
            "valid" => Some(CauseStatus::Valid),
            "invalid" => Some(CauseStatus::Invalid),
            _ => None,
        }
    }
}

/// A user-submitted cause at (row, column) of a question's diagram
///
/// Row 1 causes explain the question directly. A cause at row `r > 1`
/// explains the cause at row `r - 1` of the same column.
#[derive(Debug, Clone, PartialEq)]
pub struct Cause {
    /// Unique identifier
    pub id: CauseId,

    /// Question this cause belongs to
    pub question_id: QuestionId,

    /// 1-based depth of the "why" step
    pub row: u32,

    /// 0-based index of the chain
    pub column: u32,

    /// The cause statement
    pub text: String,

    /// Visibility inherited from the question
    pub mode: Mode,

    /// Evaluation state
    pub status: CauseStatus,

    /// Whether a validated cause is a root cause
    pub root_status: bool,

    /// Rejection message, empty unless `status` is `Invalid`
    pub feedback: String,
}

impl Cause {
    /// Create a new pending cause
    pub fn new(
        question_id: QuestionId,
        row: u32,
        column: u32,
        text: impl Into<String>,
        mode: Mode,
    ) -> Self {
        Self {
            id: CauseId::new(),
            question_id,
            row,
            column,
            text: text.into(),
            mode,
            status: CauseStatus::Pending,
            root_status: false,
            feedback: String::new(),
        }
    }

    /// Whether this cause has been confirmed valid
    pub fn is_valid(&self) -> bool {
        self.status == CauseStatus::Valid
    }

    /// Whether this cause is compared against a previous cause rather than the question
    pub fn has_parent(&self) -> bool {
        self.row > 1
    }

    /// Mark the cause valid, recording whether it is a root cause
    pub fn accept(&mut self, root: bool) {
        self.status = CauseStatus::Valid;
        self.root_status = root;
        self.feedback.clear();
    }

    /// Mark the cause invalid with a feedback message
    pub fn reject(&mut self, feedback: impl Into<String>) {
        self.status = CauseStatus::Invalid;
        self.root_status = false;
        self.feedback = feedback.into();
    }

    /// Replace the text and drop any previous verdict
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.status = CauseStatus::Pending;
        self.root_status = false;
        self.feedback.clear();
    }
}
