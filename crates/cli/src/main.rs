// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `assay` - static analysis over compilation databases.
//!
//! Thin shell over `assay-analyze`: argument parsing, `assay.toml`
//! discovery, tracing setup, and exit-code mapping. Commands return
//! [`exit_error::ExitError`] for non-zero exits (2 for configuration
//! errors, 3 when analyses failed) and `main()` terminates the process.

mod color;
mod commands;
mod config;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "assay",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"),
    about = "Static analysis runner for C/C++ compilation databases",
    styles = color::styles()
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run analyzers over a compilation database
    Analyze(commands::analyze::AnalyzeArgs),
    /// List the checkers the configured analyzer binaries advertise
    Checkers(commands::checkers::CheckersArgs),
}

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(cli, &matches).await {
        match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}

async fn run(cli: Cli, matches: &ArgMatches) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => {
            // Checker toggles need the raw matches: -e and -d interleave
            // and the relative order decides which toggle wins.
            let toggles = matches
                .subcommand_matches("analyze")
                .map(commands::analyze::ordered_toggles)
                .unwrap_or_default();
            commands::analyze::run(args, toggles, cli.format).await
        }
        Commands::Checkers(args) => commands::checkers::run(args, cli.format).await,
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level to debug.
/// Logs go to stderr so JSON output stays parseable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
