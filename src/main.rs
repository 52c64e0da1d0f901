//! # VCS Workspace CLI
//!
//! This is the binary entry point for the `vcs-workspace` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into
//!   user-friendly output.
//!
//! The reconciliation logic lives in the `vcs_workspace` library crate; the
//! binary adds argument parsing, terminal prompts and reporting.

mod cli;
mod commands;
mod prompt;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
