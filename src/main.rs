//! # dashlab command-line entry point
//!
//! Loads a dataset, runs one analysis and prints the result as JSON.
//!
//! ```bash
//! dashlab stats --file sales.csv --column revenue
//! dashlab decompose --file sales.csv --date month --value revenue --period 12
//! RUST_LOG=debug dashlab outliers --file sales.csv --column revenue --robust
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Results go to stdout, logs to stderr

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Config first, so its logging section can shape the subscriber
    let (config, config_warning) = cli::load_config(cli.config.as_deref())?;
    dashlab::logging::init(&config.logging)?;
    if let Some(warning) = config_warning {
        tracing::warn!("{warning}");
    }

    tracing::debug!("Running with config {:?}", config.analysis);
    cli::run_command(cli.command, &config)
}
