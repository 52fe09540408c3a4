//! CLI module for policyvet
//!
//! Provides command-line interface for:
//! - validate: Validate a stored entity by id
//! - check: Validate a proposed entity from a JSON document
//! - audit: Report a policy's effective audit flag

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{ActionArg, Cli, Command, KindArg};
pub use commands::{audit, check, outcome_document, run_command, validate, Outcome};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_json};

/// Parse process arguments and run the selected command
pub fn run() -> CliResult<Outcome> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
