//! # Status Command Implementation
//!
//! This module implements the `status` subcommand, which prints the working
//! copy status of every checkout in the workspace, one line per changed file:
//!
//! ```text
//! A       clone/added.txt
//!  M      clone/modified-fs.txt
//! ??      clone/added-fs.txt
//! ```
//!
//! Paths are relative to the workspace root. Untracked files are only listed
//! with `--untracked`.

use anyhow::Result;
use clap::Args;
use std::io::Write;

use vcs_workspace::suggestions;

use super::{report_failures, WorkspaceArgs};

/// Show the working copy status of every checkout
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Also list files that are not under version control.
    #[arg(short, long)]
    pub untracked: bool,

    /// Report entries whose status fails and keep going with the others.
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs) -> Result<()> {
    let workspace = args.workspace.load()?;
    let aggregate = workspace
        .get_status_all(
            Some(workspace.root()),
            args.untracked,
            args.continue_on_error,
        )
        .map_err(suggestions::explain)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(aggregate.output.as_bytes())?;
    stdout.flush()?;

    report_failures(&aggregate.failures)
}
