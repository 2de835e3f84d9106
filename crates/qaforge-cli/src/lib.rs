//! QAForge CLI library.
//!
//! This library provides the core functionality for the `qaforge` command-line
//! interface: argument parsing, configuration layering, command execution and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command, OutputFormat};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::Formatter;

/// Execute a parsed command line and return what should go to stdout.
pub async fn run(cli: Cli) -> Result<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let formatter = Formatter::new(cli.format);

    match cli.command {
        Command::Generate(args) => commands::execute_generate(args, config, &formatter).await,
        Command::Segments(args) => commands::execute_segments(args, config, &formatter),
        Command::Metadata(args) => commands::execute_metadata(args, config, &formatter),
    }
}
