//! Synthrun: environment-configured yosys synthesis driver.
//!
//! This is the main entry point for the `synthrun` CLI. It parses arguments,
//! sets up logging, runs the pipeline against the process environment, and
//! maps errors to exit codes.

mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod exit_codes;
mod logging;
pub mod pipeline;

use cli::Cli;
use config::ProcessEnv;
use std::process::ExitCode;

fn main() -> ExitCode {
    let _cli = Cli::parse_args();
    logging::init_logging();

    match pipeline::run(&ProcessEnv) {
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
