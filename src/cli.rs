//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;

/// VCS Workspace - Reconcile a workspace of checkouts with its manifest
#[derive(Parser, Debug)]
#[command(name = "vcs-workspace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check out missing entries and update existing ones
    Install(commands::install::InstallArgs),

    /// Show local modifications of every checkout
    Diff(commands::diff::DiffArgs),

    /// Show the working copy status of every checkout
    Status(commands::status::StatusArgs),

    /// Write the manifest with the checked-out revisions pinned
    Snapshot(commands::snapshot::SnapshotArgs),

    /// List the entries of the manifest and their state on disk
    Info(commands::info::InfoArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Install(args) => commands::install::execute(args, &self.color),
            Commands::Diff(args) => commands::diff::execute(args),
            Commands::Status(args) => commands::status::execute(args),
            Commands::Snapshot(args) => commands::snapshot::execute(args),
            Commands::Info(args) => commands::info::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logs to stderr at `level`; `RUST_LOG` takes precedence when set.
fn init_logging(level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
