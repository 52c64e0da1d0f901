//! # Version Control Driver Interface
//!
//! This module defines the uniform capability every version control backend
//! exposes to the rest of the library. The reconciliation engine only talks
//! to a checkout through the [`VcsClient`] trait, which keeps it independent
//! of any concrete backend and lets tests substitute recording mocks.
//!
//! ## Key Components
//!
//! - **`VcsClient`**: Operations on one checkout bound to one local path.
//! - **`Backend`**: The backend names that may appear in a manifest.
//! - **`ClientFactory`**: Creates a client for a backend and path. The
//!   `DefaultClientFactory` returns a [`GitClient`](crate::git::GitClient) for
//!   `git` and an `UnsupportedBackend` error for everything else.
//!
//! ## Absence Is Not an Error
//!
//! None of the operations fail for "not found" conditions. A missing path, a
//! directory that is not a repository, an unset remote or an unknown revision
//! are reported through `false`, `None` or an empty string. `Err` is reserved
//! for unrecoverable conditions such as being unable to spawn the backend
//! executable.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::git::GitClient;

/// The version control systems a manifest entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Git,
    Hg,
    Svn,
    Bzr,
    Tar,
}

impl Backend {
    /// All recognized backends, in manifest documentation order.
    pub const ALL: [Backend; 5] = [
        Backend::Git,
        Backend::Hg,
        Backend::Svn,
        Backend::Bzr,
        Backend::Tar,
    ];

    /// The name used as the entry key in a manifest.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Git => "git",
            Backend::Hg => "hg",
            Backend::Svn => "svn",
            Backend::Bzr => "bzr",
            Backend::Tar => "tar",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Backend::ALL
            .iter()
            .copied()
            .find(|backend| backend.name() == s)
            .ok_or_else(|| Error::UnsupportedBackend {
                backend: s.to_string(),
            })
    }
}

/// Operations on a single checkout of one backend, bound to one local path.
pub trait VcsClient {
    /// The backend this client drives.
    fn backend(&self) -> Backend;

    /// The local path this client is bound to.
    fn path(&self) -> &Path;

    /// Whether anything exists at the bound path.
    fn path_exists(&self) -> bool {
        self.path().exists()
    }

    /// Whether the bound path contains a repository of this backend's type.
    fn detect_presence(&self) -> bool;

    /// The currently configured remote URL, or `None` if it cannot be
    /// determined.
    fn get_url(&self) -> Result<Option<String>>;

    /// Resolves a revision spec to a canonical identifier.
    ///
    /// With `spec` set to `None` the current revision of the working copy is
    /// resolved. Returns `None` if the spec cannot be resolved.
    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>>;

    /// Fetches fresh content from `uri` into the bound path, at `version` if
    /// non-empty. Returns whether the checkout succeeded.
    fn checkout(&self, uri: &str, version: &str) -> Result<bool>;

    /// Advances an existing checkout to `version`, or to the tip of the
    /// tracked branch if `version` is empty. Returns whether it succeeded.
    fn update(&self, version: &str) -> Result<bool>;

    /// Backend-native diff of local modifications, with paths shown relative
    /// to `basepath` when given.
    fn get_diff(&self, basepath: Option<&Path>) -> Result<String>;

    /// Backend-native status of the working copy, with paths shown relative
    /// to `basepath` when given.
    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String>;
}

/// Creates [`VcsClient`] instances for manifest entries.
pub trait ClientFactory {
    /// Creates a client for `backend` bound to `path`.
    fn create(&self, backend: Backend, path: &Path) -> Result<Box<dyn VcsClient>>;
}

/// The default factory, which drives real checkouts through the backend's
/// command-line tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClientFactory;

impl ClientFactory for DefaultClientFactory {
    fn create(&self, backend: Backend, path: &Path) -> Result<Box<dyn VcsClient>> {
        match backend {
            Backend::Git => Ok(Box::new(GitClient::new(path))),
            other => Err(Error::UnsupportedBackend {
                backend: other.name().to_string(),
            }),
        }
    }
}
