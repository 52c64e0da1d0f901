//! # Conflict Policy
//!
//! When a checkout path already exists but does not hold the repository the
//! manifest asks for, the reconciliation engine has to decide what to do with
//! it. That decision is made here and never by the engine itself.
//!
//! - A [`Conflict`] describes what is wrong with the path.
//! - A [`Resolution`] is what to do about it.
//! - A [`ConflictPolicy`] turns a conflict into a resolution, either from a
//!   fixed [`InstallMode`] chosen up front (unattended runs) or by asking an
//!   injected [`ConflictResolver`] (an operator at a terminal).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::vcs::Backend;

/// A mismatch between the manifest and what is on disk at an entry's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The path exists but is not a repository of the expected backend.
    WrongBackend { backend: Backend },
    /// The repository's remote URL is unknown or differs from the manifest.
    UrlMismatch {
        found: Option<String>,
        expected: String,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::WrongBackend { backend } => {
                write!(f, "failed to detect {} presence", backend)
            }
            Conflict::UrlMismatch { found, expected } => write!(
                f,
                "url {} does not match {} requested",
                found.as_deref().unwrap_or("<none>"),
                expected
            ),
        }
    }
}

/// A conflict handling mode that can be chosen without interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Fail the entry with the conflict message.
    Abort,
    /// Move the existing path to the backup directory, then check out.
    Backup,
    /// Remove the existing path, then check out.
    Delete,
    /// Leave the entry alone.
    Skip,
}

impl FromStr for InstallMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "abort" => Ok(InstallMode::Abort),
            "backup" => Ok(InstallMode::Backup),
            "delete" => Ok(InstallMode::Delete),
            "skip" => Ok(InstallMode::Skip),
            other => Err(Error::ConfigParse {
                message: format!("Unknown install mode: {}", other),
                hint: Some("Use one of abort, backup, delete, skip".to_string()),
            }),
        }
    }
}

/// What to do about one conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Abort,
    /// Back up the path. `root` overrides the configured backup directory.
    Backup { root: Option<PathBuf> },
    Delete,
    Skip,
    /// Inspect the path again, e.g. after the operator fixed it by hand.
    Retry,
}

impl From<InstallMode> for Resolution {
    fn from(mode: InstallMode) -> Self {
        match mode {
            InstallMode::Abort => Resolution::Abort,
            InstallMode::Backup => Resolution::Backup { root: None },
            InstallMode::Delete => Resolution::Delete,
            InstallMode::Skip => Resolution::Skip,
        }
    }
}

/// Decides how to resolve a conflict, typically by asking an operator.
pub trait ConflictResolver {
    fn resolve(&self, path: &Path, conflict: &Conflict) -> Result<Resolution>;
}

/// How the reconciliation engine resolves conflicts.
pub enum ConflictPolicy {
    /// Every conflict is resolved the same way.
    Scripted(InstallMode),
    /// Every conflict is handed to a resolver.
    Interactive(Box<dyn ConflictResolver>),
}

impl ConflictPolicy {
    pub fn resolve(&self, path: &Path, conflict: &Conflict) -> Result<Resolution> {
        match self {
            ConflictPolicy::Scripted(mode) => Ok((*mode).into()),
            ConflictPolicy::Interactive(resolver) => resolver.resolve(path, conflict),
        }
    }
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::Scripted(InstallMode::Abort)
    }
}

impl fmt::Debug for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::Scripted(mode) => f.debug_tuple("Scripted").field(mode).finish(),
            ConflictPolicy::Interactive(_) => f.write_str("Interactive"),
        }
    }
}
