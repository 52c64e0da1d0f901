//! # Snapshot Command Implementation
//!
//! This module implements the `snapshot` subcommand, which writes a manifest
//! that records the revision every checkout is currently at. Each source
//! entry carries `version` (the checked-out revision) and `revision` (what
//! its pinned version resolves to, empty when unpinned). Entries that are not
//! under version control are left out. Relative local URIs are written as
//! the absolute paths they were resolved to, so the snapshot can be used
//! from any directory.

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use std::fs;
use std::path::PathBuf;

use vcs_workspace::manifest::{self, Descriptor};
use vcs_workspace::workspace::Workspace;

use super::WorkspaceArgs;

/// Write the manifest with the checked-out revisions pinned
///
/// Relative local URIs such as `../remote` are written as absolute paths,
/// resolved against the workspace root.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Write the snapshot to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `snapshot` command.
pub fn execute(args: SnapshotArgs) -> Result<()> {
    let workspace = args.workspace.load()?;
    let yaml = manifest::to_yaml(&versioned_descriptors(&workspace)?)?;

    match &args.output {
        Some(path) => fs::write(path, &yaml)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?,
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Versioned descriptors of the entries under version control.
fn versioned_descriptors(workspace: &Workspace) -> Result<Vec<Descriptor>> {
    let mut descriptors = Vec::new();
    for entry in workspace.entries() {
        match entry.get_versioned_yaml() {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) if e.is_not_versionable() => {
                debug!("Leaving {} out of the snapshot", entry.local_name());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(descriptors)
}
