//! # verpin-cli
//!
//! Command line host for verpin.
//!
//! Loads a buildout-style configuration file as the host, runs the platform
//! versions extension against it and prints (or writes back) the resulting
//! pins.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use verpin_core::error::VerpinResult;

mod commands;
mod host;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Resolve platform version pins for a build configuration
#[derive(Parser)]
#[command(name = "verpin", version, about = "Platform version pin resolver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, env = "VERPIN_VERBOSE")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the pins of a build configuration
    Resolve {
        /// Build configuration file
        config: Utf8PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Rewrite the version section of the configuration file
        #[arg(long)]
        write: bool,
    },
    /// List the platform sections available across the configured sources
    Sections {
        /// Build configuration file
        config: Utf8PathBuf,
    },
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting verpin v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> VerpinResult<()> {
    let ctx = CommandContext::new()?;
    commands::dispatch_command(cli.command, &ctx)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("VERPIN_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("verpin encountered an unexpected error: {}", panic_info);
        eprintln!("verpin crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/verpin/verpin/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
