//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.
// CONTEXT: stdout carries only the completion line; errors go to stderr.

use std::process::ExitCode;

use clap::Parser;
use sales_report::{run_cli, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = cli.into_config().and_then(|config| run_cli(&config));
    match outcome {
        Ok(outcome) => {
            println!("Analysis complete. Results exported to {}", outcome.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
