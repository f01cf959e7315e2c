//! Per-sweep counters

use causeway_domain::QuestionId;

/// What a single validation sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Question that was swept
    pub question_id: QuestionId,

    /// Deepest populated row, `None` when the question has no causes
    pub frontier_row: Option<u32>,

    /// Frontier causes sent to the oracle
    pub evaluated: usize,

    /// Causes accepted as valid
    pub accepted: usize,

    /// Causes rejected with feedback
    pub rejected: usize,

    /// Accepted causes flagged as root causes
    pub roots: usize,

    /// Frontier causes already valid and left untouched
    pub skipped: usize,

    /// Oracle round-trips made
    pub oracle_calls: usize,
}

impl SweepReport {
    /// Create an empty report for `question_id`
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            ..Self::default()
        }
    }

    /// Record an accepted cause
    pub fn record_accepted(&mut self, root: bool) {
        self.evaluated += 1;
        self.accepted += 1;
        if root {
            self.roots += 1;
        }
    }

    /// Record a rejected cause
    pub fn record_rejected(&mut self) {
        self.evaluated += 1;
        self.rejected += 1;
    }

    /// Record a frontier cause that was already valid
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record one oracle round-trip
    pub fn record_oracle_call(&mut self) {
        self.oracle_calls += 1;
    }

    /// Single-line summary for logs
    pub fn summary(&self) -> String {
        let frontier = match self.frontier_row {
            Some(row) => row.to_string(),
            None => "none".to_string(),
        };
        format!(
            "question {} frontier {}: {} evaluated ({} accepted, {} rejected, {} root), {} skipped, {} oracle calls",
            self.question_id,
            frontier,
            self.evaluated,
            self.accepted,
            self.rejected,
            self.roots,
            self.skipped,
            self.oracle_calls
        )
    }
}
