//! Client-facing serialized shapes

use crate::SweepReport;
use causeway_domain::{column_label, Cause, CauseStatus, Question};
use serde::{Deserialize, Serialize};

/// A cause as reported to clients
///
/// `status` is true only for accepted causes; `state` carries the full
/// pending/valid/invalid distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseRecord {
    /// Cause identifier
    pub id: String,
    /// Owning question identifier
    pub question_id: String,
    /// Depth in the chain
    pub row: u32,
    /// Chain index
    pub column: u32,
    /// Visibility mode inherited from the question
    pub mode: String,
    /// Cause text
    pub cause: String,
    /// Whether the cause was accepted
    pub status: bool,
    /// Whether the cause is a root cause
    pub root_status: bool,
    /// Rejection message, empty unless rejected
    pub feedback: String,
    /// `pending`, `valid` or `invalid`
    pub state: String,
}

impl From<&Cause> for CauseRecord {
    fn from(cause: &Cause) -> Self {
        Self {
            id: cause.id.to_string(),
            question_id: cause.question_id.to_string(),
            row: cause.row,
            column: cause.column,
            mode: cause.mode.as_str().to_string(),
            cause: cause.text.clone(),
            status: cause.status == CauseStatus::Valid,
            root_status: cause.root_status,
            feedback: cause.feedback.clone(),
            state: cause.status.as_str().to_string(),
        }
    }
}

/// A question as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Question identifier
    pub id: String,
    /// Owner identifier
    pub owner: String,
    /// Problem statement
    pub question: String,
    /// `private` or `supervised`
    pub mode: String,
    /// Creation time in seconds since Unix epoch
    pub created_at: u64,
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            owner: question.owner.to_string(),
            question: question.text.clone(),
            mode: question.mode.as_str().to_string(),
            created_at: question.created_at,
        }
    }
}

/// A question with its whole diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRecord {
    /// The question
    #[serde(flatten)]
    pub question: QuestionRecord,
    /// Column letters in use, in order
    pub columns: Vec<String>,
    /// Causes ordered by (row, column)
    pub causes: Vec<CauseRecord>,
}

impl DiagramRecord {
    /// Assemble a diagram from a question and its causes
    pub fn new(question: &Question, causes: &[Cause]) -> Self {
        let mut columns: Vec<u32> = causes.iter().map(|c| c.column).collect();
        columns.sort_unstable();
        columns.dedup();

        Self {
            question: question.into(),
            columns: columns
                .into_iter()
                .map(|column| match column_label(column) {
                    Some(label) => label.to_string(),
                    None => format!("#{}", column),
                })
                .collect(),
            causes: causes.iter().map(CauseRecord::from).collect(),
        }
    }
}

/// Sweep counters as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Swept question identifier
    pub question_id: String,
    /// Frontier row, absent when the question had no causes
    pub frontier_row: Option<u32>,
    /// Frontier causes evaluated
    pub evaluated: usize,
    /// Causes accepted
    pub accepted: usize,
    /// Causes rejected
    pub rejected: usize,
    /// Root causes found
    pub roots: usize,
    /// Already valid causes left untouched
    pub skipped: usize,
    /// Oracle round-trips
    pub oracle_calls: usize,
    /// Causes changed by the sweep
    pub causes: Vec<CauseRecord>,
}

impl SweepRecord {
    /// Combine a report with the causes the sweep changed
    pub fn new(report: &SweepReport, causes: &[Cause]) -> Self {
        Self {
            question_id: report.question_id.to_string(),
            frontier_row: report.frontier_row,
            evaluated: report.evaluated,
            accepted: report.accepted,
            rejected: report.rejected,
            roots: report.roots,
            skipped: report.skipped,
            oracle_calls: report.oracle_calls,
            causes: causes.iter().map(CauseRecord::from).collect(),
        }
    }
}
