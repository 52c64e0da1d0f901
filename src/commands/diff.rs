//! # Diff Command Implementation
//!
//! This module implements the `diff` subcommand, which prints the local
//! modifications of every checkout in the workspace, in manifest order.
//! Paths in the output are relative to the workspace root.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::io::Write;

use vcs_workspace::suggestions;

use super::{report_failures, WorkspaceArgs};

/// Show local modifications of every checkout
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Report entries whose diff fails and keep going with the others.
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs) -> Result<()> {
    let workspace = args.workspace.load()?;
    let aggregate = workspace
        .get_diff_all(Some(workspace.root()), args.continue_on_error)
        .map_err(suggestions::explain)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(aggregate.output.as_bytes())?;
    stdout.flush()?;

    report_failures(&aggregate.failures)
}
