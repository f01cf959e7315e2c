//! CLI command definitions and argument parsing.

use causeway_domain::{Mode, MAX_LABELLED_COLUMNS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Causeway CLI - Build and validate "5 whys" root cause diagrams.
#[derive(Debug, Parser)]
#[command(name = "causeway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CAUSEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides the configuration file)
    #[arg(long, global = true, env = "CAUSEWAY_DB")]
    pub db: Option<PathBuf>,

    /// View questions as a supervisor
    #[arg(long, global = true)]
    pub supervisor: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage questions
    Question(QuestionArgs),

    /// Manage causes
    Cause(CauseArgs),

    /// Validate the deepest row of a question's diagram
    Validate(ValidateArgs),
}

/// Arguments for the question command.
#[derive(Debug, Parser)]
pub struct QuestionArgs {
    #[command(subcommand)]
    pub action: QuestionAction,
}

/// Question actions.
#[derive(Debug, Subcommand)]
pub enum QuestionAction {
    /// Create a question
    New {
        /// Problem statement
        text: String,
        /// Visibility mode
        #[arg(short, long, value_enum, default_value = "private")]
        mode: ModeArg,
    },

    /// List your questions, newest first
    List,

    /// Show a question with its diagram
    Show {
        /// Question ID
        id: String,
    },

    /// Change the visibility mode of a question
    Mode {
        /// Question ID
        id: String,
        /// New visibility mode
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Delete a question and its causes
    Delete {
        /// Question ID
        id: String,
    },
}

/// Arguments for the cause command.
#[derive(Debug, Parser)]
pub struct CauseArgs {
    #[command(subcommand)]
    pub action: CauseAction,
}

/// Cause actions.
#[derive(Debug, Subcommand)]
pub enum CauseAction {
    /// Add a cause to a question
    Add {
        /// Question ID
        question: String,
        /// Row (1 answers the question directly)
        #[arg(short, long)]
        row: u32,
        /// Column letter (A, B, ...) or 0-based index
        #[arg(long, value_parser = parse_column)]
        column: u32,
        /// Cause text
        text: String,
    },

    /// Replace the text of a cause
    Edit {
        /// Cause ID
        id: String,
        /// New cause text
        text: String,
    },

    /// Show a single cause
    Show {
        /// Cause ID
        id: String,
    },
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Question ID
    pub question: String,

    /// Include sweep counters in the output
    #[arg(long)]
    pub report: bool,
}

/// Visibility mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Visible to the owner only
    Private,
    /// Visible to the owner and supervisors
    Supervised,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Private => Mode::Private,
            ModeArg::Supervised => Mode::Supervised,
        }
    }
}

/// Parse a column given as a letter (`B`) or an index (`1`)
fn parse_column(input: &str) -> Result<u32, String> {
    if let Ok(index) = input.parse::<u32>() {
        return Ok(index);
    }

    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Ok(letter.to_ascii_uppercase() as u32 - 'A' as u32)
        }
        _ => Err(format!(
            "'{}' is not a column; use a letter A-{} or an index",
            input,
            char::from(b'A' + (MAX_LABELLED_COLUMNS - 1) as u8)
        )),
    }
}
