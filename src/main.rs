mod agents;
mod cli;
mod config;
mod error;
mod output;
mod report;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::RunConfig;
use error::UpdaterError;
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = RunConfig::from_cli(cli, std::env::var("CI").ok())
        .and_then(|config| workflow::execute_update(&config));

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            if let Some(message) = fatal_message(&e) {
                eprintln!("{message}");
            }
            process::exit(exit_code_for(&e));
        }
    }
}

/// The only place a fatal error is printed. Cancelling is not an error.
fn fatal_message(err: &UpdaterError) -> Option<String> {
    match err {
        UpdaterError::UserCancelled => None,
        e => Some(format!("{} {}", "Error:".red().bold(), e)),
    }
}

fn exit_code_for(err: &UpdaterError) -> i32 {
    match err {
        UpdaterError::UserCancelled => 0,
        _ => 1,
    }
}
