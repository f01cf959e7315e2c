//! Causeway Domain Layer
//!
//! This crate contains the core domain model for Causeway, a "5-whys" root
//! cause analysis engine. It has no infrastructure dependencies and defines
//! the value objects and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Question**: The problem statement at the top of a causal diagram
//! - **Cause**: A user-submitted reason at a given depth (row) of a chain (column)
//! - **Column**: An independent causal chain, labelled `A`, `B`, `C`, ...
//! - **Frontier row**: The deepest populated row, the only one validated per sweep
//! - **Root cause**: A validated cause below the first row that is the
//!   fundamental reason for the problem
//!
//! ## Architecture
//!
//! - No infrastructure crates (only `uuid` for identifiers)
//! - Storage lives in `causeway-store`, LLM backends in `causeway-llm`
//! - Trait definitions for all external interactions live in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cause;
pub mod column;
pub mod ids;
pub mod question;
pub mod traits;

// Re-exports for convenience
pub use cause::{Cause, CauseStatus};
pub use column::{column_label, MAX_LABELLED_COLUMNS};
pub use ids::{CauseId, QuestionId, UserId};
pub use question::{Mode, Question, Viewer};
