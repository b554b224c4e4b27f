//! # Sheaf CLI Entry Point
//!
//! The main entry point for the sheaf command-line tool, a bulk issue
//! automation tool for Jira.

use anyhow::Result;
use clap::Parser;
use sheaf_cli::cli::{self, handle_cli};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  // Parse CLI arguments using the derive-based implementation
  let cmd = cli::Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: per-item progress
    2 => tracing::Level::DEBUG, // -vv: HTTP status lines and decisions
    _ => tracing::Level::TRACE, // -vvv or more: every request
  };

  // Logs go to stderr so command output stays clean
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  handle_cli(cmd)
}
