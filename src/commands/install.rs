//! # Install Command Implementation
//!
//! This module implements the `install` subcommand, which reconciles the
//! workspace with its manifest: missing checkouts are cloned, matching ones
//! are updated, and conflicting paths are handled according to `--mode`.
//!
//! ## Conflict Modes
//!
//! - **prompt** (default): ask at the terminal for every conflict. When stdin
//!   is not a terminal this falls back to `abort`.
//! - **abort**: stop at the first conflict.
//! - **backup**: move the conflicting path into `--backup-dir`.
//! - **delete**: remove the conflicting path.
//! - **skip**: leave the conflicting path alone.
//!
//! With `--continue-on-error` conflicting entries fail without anything on
//! disk being touched, the remaining entries are still installed, and all
//! failures are reported at the end.

use anyhow::Result;
use clap::{Args, ValueEnum};
use log::{info, warn};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use vcs_workspace::conflict::{ConflictPolicy, InstallMode};
use vcs_workspace::defaults::{suggested_backup_root, BACKUP_ENV};
use vcs_workspace::install::InstallOptions;
use vcs_workspace::output::{emoji, OutputConfig};
use vcs_workspace::suggestions;

use super::{report_failures, WorkspaceArgs};
use crate::prompt::TerminalResolver;

/// How to handle an existing path that does not match the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Ask for every conflict (abort when not attached to a terminal)
    Prompt,
    /// Stop with an error
    Abort,
    /// Move the path into the backup directory
    Backup,
    /// Remove the path
    Delete,
    /// Leave the path alone
    Skip,
}

impl ModeArg {
    fn scripted(self) -> Option<InstallMode> {
        match self {
            ModeArg::Prompt => None,
            ModeArg::Abort => Some(InstallMode::Abort),
            ModeArg::Backup => Some(InstallMode::Backup),
            ModeArg::Delete => Some(InstallMode::Delete),
            ModeArg::Skip => Some(InstallMode::Skip),
        }
    }
}

/// Check out missing entries and update existing ones
#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Only install the entries with these local names.
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// What to do with paths that conflict with the manifest.
    #[arg(long, value_enum, default_value_t = ModeArg::Prompt)]
    pub mode: ModeArg,

    /// Directory that conflicting paths are moved to in backup mode.
    #[arg(long, value_name = "DIR", env = BACKUP_ENV)]
    pub backup_dir: Option<PathBuf>,

    /// Keep installing the other entries when one fails.
    ///
    /// Conflicting entries are reported and left untouched.
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Execute the `install` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: InstallArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    let workspace = args.workspace.load_selected(&args.names)?;
    let policy = conflict_policy(&args, workspace.root());

    println!(
        "{} Installing {} entries into {}",
        emoji(&out, "📦", "[INSTALL]"),
        workspace.len(),
        workspace.root().display()
    );

    if args.continue_on_error {
        let conflicts = workspace.conflicts()?;
        for (local_name, conflict) in &conflicts {
            println!(
                "{} {}: {} (left untouched)",
                emoji(&out, "⚠️", "[WARN]"),
                local_name,
                conflict
            );
        }
    }

    let options = InstallOptions {
        backup_root: args.backup_dir.clone(),
        policy,
        robust: args.continue_on_error,
    };
    let report = workspace
        .install_all(&options)
        .map_err(suggestions::explain)?;

    if report.is_success() {
        println!(
            "{} Installed {} entries in {:.2}s",
            emoji(&out, "✅", "[OK]"),
            report.installed.len(),
            start_time.elapsed().as_secs_f64()
        );
        return Ok(());
    }

    println!(
        "{} {} installed, {} failed",
        emoji(&out, "❌", "[ERR]"),
        report.installed.len(),
        report.failures.len()
    );
    report_failures(&report.failures)
}

fn conflict_policy(args: &InstallArgs, root: &std::path::Path) -> ConflictPolicy {
    if let Some(mode) = args.mode.scripted() {
        return ConflictPolicy::Scripted(mode);
    }
    if !std::io::stdin().is_terminal() {
        warn!("Not attached to a terminal, conflicts will abort the install");
        return ConflictPolicy::Scripted(InstallMode::Abort);
    }
    info!("Conflicts will be resolved interactively");
    let backup_root = args
        .backup_dir
        .clone()
        .unwrap_or_else(|| suggested_backup_root(root));
    ConflictPolicy::Interactive(Box::new(TerminalResolver::new(backup_root)))
}
