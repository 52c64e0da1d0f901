//! Recording mock driver shared by the unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::vcs::{Backend, VcsClient};

/// A mutating driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Checkout { uri: String, version: String },
    Update { version: String },
}

/// Mock driver whose answers are configured up front and whose mutating
/// calls are recorded.
pub(crate) struct MockClient {
    path: PathBuf,
    /// `None` consults the real filesystem.
    exists: Option<bool>,
    present: bool,
    url: Option<String>,
    versions: HashMap<Option<String>, String>,
    checkout_result: bool,
    update_result: bool,
    diff: std::result::Result<String, String>,
    status: String,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockClient {
    /// A client whose path exists and holds a repository with no remote.
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: Some(true),
            present: true,
            url: None,
            versions: HashMap::from([(None, "0123456789ab".to_string())]),
            checkout_result: true,
            update_result: true,
            diff: Ok(String::new()),
            status: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose path does not exist.
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            exists: Some(false),
            present: false,
            ..Self::new(path)
        }
    }

    /// A client whose path holds a repository cloned from `url`.
    pub(crate) fn matching(path: impl Into<PathBuf>, url: &str) -> Self {
        Self::new(path).with_url(url)
    }

    pub(crate) fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub(crate) fn with_presence(mut self, present: bool) -> Self {
        self.present = present;
        self
    }

    /// Answer `path_exists` from the real filesystem.
    pub(crate) fn on_filesystem(mut self) -> Self {
        self.exists = None;
        self
    }

    pub(crate) fn resolving(mut self, spec: &str, id: &str) -> Self {
        self.versions.insert(Some(spec.to_string()), id.to_string());
        self
    }

    pub(crate) fn with_head(mut self, id: &str) -> Self {
        self.versions.insert(None, id.to_string());
        self
    }

    pub(crate) fn with_checkout_result(mut self, ok: bool) -> Self {
        self.checkout_result = ok;
        self
    }

    pub(crate) fn with_update_result(mut self, ok: bool) -> Self {
        self.update_result = ok;
        self
    }

    pub(crate) fn with_diff(mut self, diff: &str) -> Self {
        self.diff = Ok(diff.to_string());
        self
    }

    pub(crate) fn failing_diff(mut self, message: &str) -> Self {
        self.diff = Err(message.to_string());
        self
    }

    pub(crate) fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }
}

impl VcsClient for MockClient {
    fn backend(&self) -> Backend {
        Backend::Git
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn path_exists(&self) -> bool {
        self.exists.unwrap_or_else(|| self.path.exists())
    }

    fn detect_presence(&self) -> bool {
        self.present
    }

    fn get_url(&self) -> Result<Option<String>> {
        Ok(self.url.clone())
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        Ok(self.versions.get(&spec.map(str::to_string)).cloned())
    }

    fn checkout(&self, uri: &str, version: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(Call::Checkout {
            uri: uri.to_string(),
            version: version.to_string(),
        });
        Ok(self.checkout_result)
    }

    fn update(&self, version: &str) -> Result<bool> {
        self.calls.lock().unwrap().push(Call::Update {
            version: version.to_string(),
        });
        Ok(self.update_result)
    }

    fn get_diff(&self, _basepath: Option<&Path>) -> Result<String> {
        self.diff.clone().map_err(|stderr| Error::VcsCommand {
            command: "diff".to_string(),
            path: self.path.clone(),
            stderr,
        })
    }

    fn get_status(&self, _basepath: Option<&Path>, untracked: bool) -> Result<String> {
        if untracked {
            Ok(format!("{}??      {}/new.txt\n", self.status, self.path.display()))
        } else {
            Ok(self.status.clone())
        }
    }
}
