//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `vcs-workspace` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`. Commands that operate on a workspace flatten
//!   [`WorkspaceArgs`] into it.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Loading the manifest and building the [`Workspace`] is shared by every
//! command through [`WorkspaceArgs::load`].

pub mod completions;
pub mod diff;
pub mod info;
pub mod install;
pub mod snapshot;
pub mod status;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;
use std::path::{Path, PathBuf};

use vcs_workspace::defaults::{default_manifest_path, MANIFEST_ENV};
use vcs_workspace::manifest;
use vcs_workspace::suggestions;
use vcs_workspace::vcs::DefaultClientFactory;
use vcs_workspace::workspace::Workspace;

/// Where to find the workspace and its manifest.
#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Path to the manifest.
    ///
    /// Defaults to `.workspace.yaml` in the workspace root.
    #[arg(short, long, value_name = "FILE", env = MANIFEST_ENV)]
    pub manifest: Option<PathBuf>,

    /// The workspace root that local names are relative to.
    ///
    /// Defaults to the directory containing the manifest when `--manifest`
    /// is given, and to the current directory otherwise.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl WorkspaceArgs {
    /// Resolves the workspace root and the manifest path.
    pub fn locate(&self) -> Result<(PathBuf, PathBuf)> {
        let root = match (&self.root, &self.manifest) {
            (Some(root), _) => root.clone(),
            (None, Some(manifest)) => manifest
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            (None, None) => std::env::current_dir().context("Failed to get current directory")?,
        };
        let root = root
            .canonicalize()
            .with_context(|| format!("Workspace root not found: {}", root.display()))?;
        let manifest = self
            .manifest
            .clone()
            .unwrap_or_else(|| default_manifest_path(&root));
        Ok((root, manifest))
    }

    /// Reads the manifest and builds the workspace with the default drivers.
    ///
    /// Relative local URIs in the manifest are taken relative to the root.
    pub fn load(&self) -> Result<Workspace> {
        let (root, manifest_path) = self.locate()?;
        if !manifest_path.exists() {
            return Err(suggestions::manifest_not_found(&manifest_path));
        }

        let mut descriptors = manifest::from_file(&manifest_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load manifest from {}: {}",
                manifest_path.display(),
                e
            )
        })?;
        manifest::resolve_relative_uris(&mut descriptors, &root);
        debug!(
            "Read {} entries from {}",
            descriptors.len(),
            manifest_path.display()
        );

        Ok(Workspace::from_descriptors(
            root,
            &descriptors,
            &DefaultClientFactory,
        )?)
    }

    /// Like [`load`](Self::load), restricted to the entries named on the
    /// command line.
    pub fn load_selected(&self, names: &[String]) -> Result<Workspace> {
        let workspace = self.load()?;
        let local_names: Vec<&str> = workspace.entries().iter().map(|e| e.local_name()).collect();
        if let Some(unknown) = names.iter().find(|name| !local_names.contains(&name.as_str())) {
            return Err(suggestions::unknown_entry(unknown, &local_names));
        }
        Ok(workspace.select(names)?)
    }
}

/// Fails with a summary when an aggregate operation had failing entries.
pub fn report_failures(failures: &[vcs_workspace::workspace::EntryFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    for failure in failures {
        eprintln!("{}: {}", failure.local_name, failure.error);
    }
    anyhow::bail!("{} of the entries failed", failures.len())
}
