//! Causeway CLI - Command-line interface for the Causeway validation engine.

use causeway_cli::commands::{self, Context};
use causeway_cli::{Cli, Command, Config};
use causeway_store::SqliteStore;
use causeway_validator::{ChainValidator, LlmOracle};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing (log to stderr, stdout carries the JSON output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> causeway_cli::Result<String> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let database = cli.db.clone().unwrap_or_else(|| config.database.clone());
    tracing::debug!("Opening database {}", database.display());
    let mut store = SqliteStore::new(&database)?;

    let context = Context::new(config.owner_id()?, cli.supervisor, config.validator.clone());

    match cli.command {
        Command::Question(args) => commands::execute_question(args.action, &mut store, &context),
        Command::Cause(args) => commands::execute_cause(args.action, &mut store, &context),
        Command::Validate(args) => {
            let provider = config.provider.build()?;
            tracing::info!("Validating with model {}", provider.model());
            let validator = ChainValidator::new(LlmOracle::new(provider), config.validator.clone());
            commands::execute_validate(args, &mut store, &context, &validator)
        }
    }
}
