//! # Reconciliation Engine
//!
//! Brings one checkout on disk in line with its manifest entry.
//!
//! ## Algorithm
//!
//! 1. If nothing exists at the entry's path, check it out.
//! 2. Otherwise compare what is there with the manifest:
//!    - not a repository of the entry's backend: [`Conflict::WrongBackend`]
//!    - remote URL unknown or different (trailing slashes ignored):
//!      [`Conflict::UrlMismatch`]
//! 3. No conflict: update the checkout to the pinned version.
//! 4. A conflict in robust mode fails the entry before anything on disk is
//!    touched. Otherwise the [`ConflictPolicy`] picks a [`Resolution`]; backup
//!    and delete clear the path and check out afresh.
//!
//! All inputs are carried by [`InstallOptions`]. The engine never prompts.
//! Interactive runs inject a [`ConflictResolver`](crate::conflict::ConflictResolver)
//! through [`ConflictPolicy::Interactive`].

use std::fmt;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::backup::{backup, remove_path};
use crate::conflict::{Conflict, ConflictPolicy, Resolution};
use crate::entry::{normalize_uri, Entry, VcsEntry};
use crate::error::{Error, Result};

/// Everything one installation run needs besides the entries themselves.
#[derive(Debug, Default)]
pub struct InstallOptions {
    /// Where conflicting checkouts are moved by the backup resolution.
    pub backup_root: Option<PathBuf>,
    /// How conflicts are resolved when not in robust mode.
    pub policy: ConflictPolicy,
    /// Fail conflicting entries without touching the filesystem.
    pub robust: bool,
}

/// What is on disk at an entry's path, as seen before installing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Nothing exists at the path yet.
    Missing,
    /// The path holds what the manifest asks for.
    Ready,
    /// The path is occupied by something else.
    Conflict(Conflict),
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryState::Missing => f.write_str("missing"),
            EntryState::Ready => f.write_str("ok"),
            EntryState::Conflict(_) => f.write_str("conflict"),
        }
    }
}

impl Entry {
    /// Installs the entry. Entries without version control succeed without
    /// doing anything.
    pub fn install(&self, options: &InstallOptions) -> Result<()> {
        match self {
            Entry::Vcs(entry) => entry.install(options),
            Entry::Other { .. } | Entry::SetupFile { .. } => Ok(()),
        }
    }

    /// Inspects the entry's path without changing anything.
    pub fn state(&self) -> Result<EntryState> {
        match self {
            Entry::Vcs(entry) => entry.state(),
            _ if self.path().exists() => Ok(EntryState::Ready),
            _ => Ok(EntryState::Missing),
        }
    }
}

impl VcsEntry {
    /// Compares the existing checkout with the manifest.
    ///
    /// Must only be called when the path exists.
    pub fn detect_conflict(&self) -> Result<Option<Conflict>> {
        let client = self.client();
        if !client.detect_presence() {
            return Ok(Some(Conflict::WrongBackend {
                backend: client.backend(),
            }));
        }

        let found = client.get_url()?.filter(|url| !url.is_empty());
        match found {
            Some(url) if normalize_uri(&url) == self.uri() => Ok(None),
            found => Ok(Some(Conflict::UrlMismatch {
                found,
                expected: self.uri().to_string(),
            })),
        }
    }

    pub fn state(&self) -> Result<EntryState> {
        if !self.client().path_exists() {
            return Ok(EntryState::Missing);
        }
        Ok(match self.detect_conflict()? {
            Some(conflict) => EntryState::Conflict(conflict),
            None => EntryState::Ready,
        })
    }

    /// Installs or updates the checkout according to `options`.
    pub fn install(&self, options: &InstallOptions) -> Result<()> {
        info!(
            "Installing {} ({}) to {}",
            self.uri(),
            self.version(),
            self.path().display()
        );

        loop {
            if !self.client().path_exists() {
                return self.checkout();
            }
            let conflict = match self.detect_conflict()? {
                None => return self.update(),
                Some(conflict) => conflict,
            };
            warn!("{}: {}", self.path().display(), conflict);

            if options.robust {
                return Err(self.conflict_error(conflict));
            }

            let resolution = options.policy.resolve(self.path(), &conflict)?;
            debug!("Resolving {} with {:?}", self.path().display(), resolution);

            match resolution {
                Resolution::Retry => continue,
                Resolution::Skip => {
                    info!("Skipping {}", self.path().display());
                    return Ok(());
                }
                Resolution::Abort => return Err(self.conflict_error(conflict)),
                Resolution::Backup { root } => {
                    let root = root.or_else(|| options.backup_root.clone());
                    backup(self.path(), root.as_deref())?;
                }
                Resolution::Delete => {
                    info!("Deleting {}", self.path().display());
                    remove_path(self.path())?;
                }
            }

            if self.client().path_exists() {
                return Err(Error::InvariantViolation {
                    message: format!(
                        "{} still exists after it was cleared for checkout",
                        self.path().display()
                    ),
                });
            }
            return self.checkout();
        }
    }

    fn checkout(&self) -> Result<()> {
        if self.client().checkout(self.uri(), self.version())? {
            Ok(())
        } else {
            Err(Error::CheckoutFailed {
                uri: self.uri().to_string(),
                version: self.version().to_string(),
                path: self.path().to_path_buf(),
            })
        }
    }

    fn update(&self) -> Result<()> {
        debug!("Updating {} to '{}'", self.path().display(), self.version());
        if self.client().update(self.version())? {
            Ok(())
        } else {
            Err(Error::UpdateFailed {
                path: self.path().to_path_buf(),
            })
        }
    }

    fn conflict_error(&self, conflict: Conflict) -> Error {
        Error::Conflict {
            path: self.path().to_path_buf(),
            conflict,
        }
    }
}
