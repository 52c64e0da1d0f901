//! # Workspace Entries
//!
//! An [`Entry`] is one manifest-declared member of the workspace. The set of
//! entry kinds is fixed by the manifest format, so entries are a closed enum
//! and every operation is a `match` over it:
//!
//! - [`Entry::Other`]: a directory tracked by the manifest but not under
//!   version control.
//! - [`Entry::SetupFile`]: a single configuration file.
//! - [`Entry::Vcs`]: a checkout driven by a [`VcsClient`].
//!
//! Only `Vcs` entries do anything when installed, diffed or queried for
//! status; the other kinds succeed without effect. Asking a non-`Vcs` entry
//! for a versioned descriptor fails with [`Error::NotVersionable`].
//!
//! Installation itself lives in [`crate::install`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::{Descriptor, SourceSpec};
use crate::vcs::{ClientFactory, VcsClient};

/// Strips trailing slashes from a URI so that `http://x/repo/` and
/// `http://x/repo` compare equal.
pub fn normalize_uri(uri: &str) -> &str {
    uri.trim_end_matches('/')
}

/// One member of a workspace.
#[derive(Debug)]
pub enum Entry {
    Other { path: PathBuf, local_name: String },
    SetupFile { path: PathBuf, local_name: String },
    Vcs(VcsEntry),
}

impl Entry {
    /// Creates an `Other` entry.
    pub fn other(path: impl Into<PathBuf>, local_name: impl Into<String>) -> Result<Self> {
        let path = require_path(path.into())?;
        Ok(Entry::Other {
            path,
            local_name: local_name.into(),
        })
    }

    /// Creates a `SetupFile` entry.
    pub fn setup_file(path: impl Into<PathBuf>, local_name: impl Into<String>) -> Result<Self> {
        let path = require_path(path.into())?;
        Ok(Entry::SetupFile {
            path,
            local_name: local_name.into(),
        })
    }

    /// Builds the entry described by `descriptor`, located at
    /// `root/local-name`.
    ///
    /// Source entries get a client from `factory`.
    pub fn from_descriptor(
        descriptor: &Descriptor,
        root: &Path,
        factory: &dyn ClientFactory,
    ) -> Result<Self> {
        let path = root.join(descriptor.local_name());
        match descriptor {
            Descriptor::Other { local_name } => Entry::other(path, local_name.as_str()),
            Descriptor::SetupFile { local_name } => Entry::setup_file(path, local_name.as_str()),
            Descriptor::Source { backend, spec } => {
                let uri = spec.uri.as_deref().ok_or_else(|| Error::InvalidEntry {
                    message: format!(
                        "{} entry at {} has no uri attribute",
                        backend,
                        path.display()
                    ),
                })?;
                let client = factory.create(*backend, &path)?;
                let version = spec.version.as_deref().unwrap_or_default();
                VcsEntry::new(path, spec.local_name.as_str(), uri, version, client).map(Entry::Vcs)
            }
        }
    }

    /// Where the entry is, relative to the current directory or absolute.
    pub fn path(&self) -> &Path {
        match self {
            Entry::Other { path, .. } | Entry::SetupFile { path, .. } => path,
            Entry::Vcs(entry) => entry.path(),
        }
    }

    /// The entry's name relative to the workspace root (or absolute).
    pub fn local_name(&self) -> &str {
        match self {
            Entry::Other { local_name, .. } | Entry::SetupFile { local_name, .. } => local_name,
            Entry::Vcs(entry) => entry.local_name(),
        }
    }

    pub fn is_vcs_entry(&self) -> bool {
        matches!(self, Entry::Vcs(_))
    }

    pub fn as_vcs(&self) -> Option<&VcsEntry> {
        match self {
            Entry::Vcs(entry) => Some(entry),
            _ => None,
        }
    }

    /// The descriptor as written in the manifest.
    pub fn get_yaml(&self) -> Descriptor {
        match self {
            Entry::Other { local_name, .. } => Descriptor::Other {
                local_name: local_name.clone(),
            },
            Entry::SetupFile { local_name, .. } => Descriptor::SetupFile {
                local_name: local_name.clone(),
            },
            Entry::Vcs(entry) => entry.get_yaml(),
        }
    }

    /// The descriptor with the checked-out revision looked up.
    pub fn get_versioned_yaml(&self) -> Result<Descriptor> {
        match self {
            Entry::Vcs(entry) => entry.get_versioned_yaml(),
            _ => Err(Error::NotVersionable {
                local_name: self.local_name().to_string(),
            }),
        }
    }

    /// Local modifications; empty for entries without version control.
    pub fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        match self {
            Entry::Vcs(entry) => entry.get_diff(basepath),
            _ => Ok(String::new()),
        }
    }

    /// Working copy status; empty for entries without version control.
    pub fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        match self {
            Entry::Vcs(entry) => entry.get_status(basepath, untracked),
            _ => Ok(String::new()),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get_yaml().fmt(f)
    }
}

/// A checkout of a remote repository at a local path.
pub struct VcsEntry {
    path: PathBuf,
    local_name: String,
    uri: String,
    version: String,
    client: Box<dyn VcsClient>,
}

impl VcsEntry {
    /// Creates a checkout entry.
    ///
    /// `uri` is stored without trailing slashes. `version` may be empty to
    /// track the backend's default. The client is owned by the entry and must
    /// be bound to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        local_name: impl Into<String>,
        uri: &str,
        version: impl Into<String>,
        client: Box<dyn VcsClient>,
    ) -> Result<Self> {
        let path = require_path(path.into())?;
        if uri.is_empty() {
            return Err(Error::InvalidEntry {
                message: format!("entry at {} has an empty uri", path.display()),
            });
        }
        Ok(Self {
            path,
            local_name: local_name.into(),
            uri: normalize_uri(uri).to_string(),
            version: version.into(),
            client,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn client(&self) -> &dyn VcsClient {
        self.client.as_ref()
    }

    pub fn get_yaml(&self) -> Descriptor {
        Descriptor::Source {
            backend: self.client.backend(),
            spec: SourceSpec {
                local_name: self.local_name.clone(),
                uri: Some(self.uri.clone()),
                version: Some(self.version.clone()).filter(|v| !v.is_empty()),
                revision: None,
            },
        }
    }

    /// Reports the checked-out revision as `version` and, when a pin is
    /// set, what the pin resolves to as `revision`.
    pub fn get_versioned_yaml(&self) -> Result<Descriptor> {
        let current = self.client.get_version(None)?.unwrap_or_default();
        let pin = self.version.trim();
        let revision = if pin.is_empty() {
            String::new()
        } else {
            self.client.get_version(Some(pin))?.unwrap_or_default()
        };

        Ok(Descriptor::Source {
            backend: self.client.backend(),
            spec: SourceSpec {
                local_name: self.local_name.clone(),
                uri: Some(self.uri.clone()),
                version: Some(current),
                revision: Some(revision),
            },
        })
    }

    pub fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        self.client.get_diff(basepath)
    }

    pub fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        self.client.get_status(basepath, untracked)
    }
}

impl fmt::Debug for VcsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VcsEntry")
            .field("path", &self.path)
            .field("local_name", &self.local_name)
            .field("backend", &self.client.backend())
            .field("uri", &self.uri)
            .field("version", &self.version)
            .finish()
    }
}

fn require_path(path: PathBuf) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidEntry {
            message: "invalid empty path".to_string(),
        });
    }
    Ok(path)
}
