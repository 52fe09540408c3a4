//! policyvet entry point
//!
//! Parses arguments, runs one command, and maps the outcome to an exit code:
//! 0 valid, 2 rejected, 1 on any CLI error (printed to stderr).

use policyvet::cli;

fn main() {
    match cli::run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
