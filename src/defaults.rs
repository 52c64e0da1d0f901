//! Default values for vcs-workspace.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// File name of the manifest looked up in the workspace root.
pub const DEFAULT_MANIFEST_FILENAME: &str = ".workspace.yaml";

/// Environment variable overriding the manifest path.
pub const MANIFEST_ENV: &str = "VCS_WORKSPACE_MANIFEST";

/// Environment variable setting the backup directory.
pub const BACKUP_ENV: &str = "VCS_WORKSPACE_BACKUP";

/// Returns the manifest path of the workspace rooted at `root`.
pub fn default_manifest_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_MANIFEST_FILENAME)
}

/// Returns the backup directory offered when the operator chooses to back up
/// a conflicting checkout and none was configured.
///
/// This is only a suggestion; unattended runs have backups disabled unless
/// `--backup-dir` or `VCS_WORKSPACE_BACKUP` is given.
pub fn suggested_backup_root(root: &Path) -> PathBuf {
    root.join(".backup")
}
