//! Causeway Validation Engine
//!
//! Decides which causes of a "5 whys" diagram are genuine continuations of
//! their chain, flags root causes and explains rejections.
//!
//! # Overview
//!
//! A sweep looks only at the *frontier row*, the deepest populated row of a
//! question. Each pending cause there is compared with its parent (the
//! question text for row 1, otherwise the cause directly above it) through a
//! [`ValidationOracle`]:
//!
//! 1. Accepted causes become valid; below row 1 they also get a root check.
//! 2. Rejected causes become invalid with a message from [`FeedbackComposer`].
//!
//! Verdicts are written back to the [`CauseStore`](causeway_domain::traits::CauseStore)
//! one cause at a time.
//!
//! # Components
//!
//! - [`ChainValidator`]: frontier sweeps
//! - [`LlmOracle`]: oracle over any text-completion provider
//! - [`RootCauseDetector`]: root classification of accepted causes
//! - [`FeedbackComposer`]: rejection messages
//! - [`CauseService`] / [`QuestionService`]: ownership-checked editing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod causes;
pub mod chain;
pub mod config;
pub mod error;
pub mod feedback;
pub mod oracle;
pub mod prompt;
pub mod questions;
pub mod record;
pub mod report;
pub mod root;

pub use causes::{CauseService, NewCause};
pub use chain::{ChainValidator, SweepOutcome};
pub use config::ValidatorConfig;
pub use error::ValidatorError;
pub use feedback::FeedbackComposer;
pub use oracle::{FailureCategory, LlmOracle, ValidationOracle};
pub use questions::QuestionService;
pub use record::{CauseRecord, DiagramRecord, QuestionRecord, SweepRecord};
pub use report::SweepReport;
pub use root::RootCauseDetector;
