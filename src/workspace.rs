//! # Workspace Model
//!
//! A [`Workspace`] is the ordered list of entries read from one manifest,
//! anchored at a root directory. Every aggregate operation visits the entries
//! one at a time, in manifest order, and attributes failures to the entry
//! that caused them.
//!
//! The `robust` flag of the aggregate operations selects between fail-fast
//! (the first failing entry's error is returned) and collecting (every entry
//! is visited and failures are reported next to the successful output).

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::conflict::Conflict;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::install::{EntryState, InstallOptions};
use crate::manifest::Descriptor;
use crate::vcs::ClientFactory;

/// A failure attributed to a single entry.
#[derive(Debug)]
pub struct EntryFailure {
    pub local_name: String,
    pub error: Error,
}

/// Concatenated per-entry output plus the entries that failed to produce
/// any.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub output: String,
    pub failures: Vec<EntryFailure>,
}

impl Aggregate {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of installing a whole workspace.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Local names of the entries that were installed, in order.
    pub installed: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The entries of one manifest, anchored at a root directory.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    entries: Vec<Entry>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<Entry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    /// Builds one entry per descriptor. Relative local names are joined to
    /// `root`; absolute ones are kept as they are.
    pub fn from_descriptors(
        root: impl Into<PathBuf>,
        descriptors: &[Descriptor],
        factory: &dyn ClientFactory,
    ) -> Result<Self> {
        let root = root.into();
        let entries = descriptors
            .iter()
            .map(|descriptor| Entry::from_descriptor(descriptor, &root, factory))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Loaded {} entries for workspace {}",
            entries.len(),
            root.display()
        );
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the entries whose local name is in `names`, preserving
    /// manifest order. An empty list keeps everything.
    ///
    /// Fails with [`Error::InvalidEntry`] if a name matches no entry.
    pub fn select(self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.entries.iter().any(|e| e.local_name() == name.as_str()))
        {
            return Err(Error::InvalidEntry {
                message: format!("no entry named '{}' in the manifest", unknown),
            });
        }
        let entries = self
            .entries
            .into_iter()
            .filter(|e| names.iter().any(|name| name == e.local_name()))
            .collect();
        Ok(Self {
            root: self.root,
            entries,
        })
    }

    /// The manifest form of every entry.
    pub fn get_yaml_all(&self) -> Vec<Descriptor> {
        self.entries.iter().map(Entry::get_yaml).collect()
    }

    /// The versioned form of every entry.
    ///
    /// Fails with [`Error::NotVersionable`] on the first entry that is not
    /// under version control; callers with mixed workspaces should filter
    /// entries or use [`Entry::get_versioned_yaml`] directly.
    pub fn get_versioned_yaml_all(&self) -> Result<Vec<Descriptor>> {
        self.entries.iter().map(Entry::get_versioned_yaml).collect()
    }

    /// Diff of every entry, concatenated in manifest order.
    pub fn get_diff_all(&self, basepath: Option<&Path>, robust: bool) -> Result<Aggregate> {
        self.collect(robust, |entry| entry.get_diff(basepath))
    }

    /// Status of every entry, concatenated in manifest order.
    pub fn get_status_all(
        &self,
        basepath: Option<&Path>,
        untracked: bool,
        robust: bool,
    ) -> Result<Aggregate> {
        self.collect(robust, |entry| entry.get_status(basepath, untracked))
    }

    /// Installs every entry in order.
    ///
    /// Without `options.robust` the first failure is returned and later
    /// entries are not visited. With it, each entry is attempted and the
    /// failures are collected into the report.
    pub fn install_all(&self, options: &InstallOptions) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        for entry in &self.entries {
            match entry.install(options) {
                Ok(()) => report.installed.push(entry.local_name().to_string()),
                Err(error) if options.robust => {
                    warn!("Failed to install {}: {}", entry.local_name(), error);
                    report.failures.push(EntryFailure {
                        local_name: entry.local_name().to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(report)
    }

    /// Every entry whose path is occupied by something other than what the
    /// manifest asks for. Nothing on disk is changed.
    pub fn conflicts(&self) -> Result<Vec<(String, Conflict)>> {
        let mut conflicts = Vec::new();
        for entry in &self.entries {
            if let EntryState::Conflict(conflict) = entry.state()? {
                conflicts.push((entry.local_name().to_string(), conflict));
            }
        }
        Ok(conflicts)
    }

    fn collect<F>(&self, robust: bool, mut produce: F) -> Result<Aggregate>
    where
        F: FnMut(&Entry) -> Result<String>,
    {
        let mut aggregate = Aggregate::default();
        for entry in &self.entries {
            match produce(entry) {
                Ok(output) => aggregate.output.push_str(&output),
                Err(error) if robust => {
                    warn!("{}: {}", entry.local_name(), error);
                    aggregate.failures.push(EntryFailure {
                        local_name: entry.local_name().to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{ConflictPolicy, InstallMode};
    use crate::entry::VcsEntry;
    use crate::manifest;
    use crate::test_support::{Call, MockClient};
    use crate::vcs::{Backend, VcsClient};
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<Call>>>;

    fn vcs(name: &str, client: MockClient) -> (Entry, Calls) {
        let calls = client.calls();
        let path = client.path().to_path_buf();
        let entry = VcsEntry::new(path, name, &format!("http://x/{name}"), "", Box::new(client))
            .unwrap();
        (Entry::Vcs(entry), calls)
    }

    /// Factory handing out missing-path mocks and remembering their call logs.
    #[derive(Default)]
    struct RecordingFactory {
        calls: RefCell<Vec<(PathBuf, Calls)>>,
    }

    impl ClientFactory for RecordingFactory {
        fn create(&self, _backend: Backend, path: &Path) -> Result<Box<dyn VcsClient>> {
            let client = MockClient::missing(path);
            self.calls
                .borrow_mut()
                .push((path.to_path_buf(), client.calls()));
            Ok(Box::new(client))
        }
    }

    #[test]
    fn test_other_and_missing_clone_checks_out_once() {
        let descriptors = manifest::parse(
            r#"
- other: {local-name: ../ros}
- git: {local-name: clone, uri: ../remote}
"#,
        )
        .unwrap();
        let factory = RecordingFactory::default();
        let workspace = Workspace::from_descriptors("/ws", &descriptors, &factory).unwrap();

        let report = workspace
            .install_all(&InstallOptions::default())
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.installed, vec!["../ros", "clone"]);
        let created = factory.calls.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, PathBuf::from("/ws/clone"));
        assert_eq!(
            *created[0].1.lock().unwrap(),
            vec![Call::Checkout {
                uri: "../remote".to_string(),
                version: String::new()
            }]
        );
    }

    #[test]
    fn test_robust_install_isolates_conflicting_entry() {
        let (first, first_calls) = vcs("one", MockClient::missing("/ws/one"));
        let (second, second_calls) = vcs("two", MockClient::matching("/ws/two", "http://x/two"));
        let (third, third_calls) = vcs("three", MockClient::matching("/ws/three", "http://x/elsewhere"));
        let (fourth, fourth_calls) = vcs("four", MockClient::missing("/ws/four"));
        let workspace = Workspace::new("/ws", vec![first, second, third, fourth]);
        let options = InstallOptions {
            robust: true,
            policy: ConflictPolicy::Scripted(InstallMode::Delete),
            ..Default::default()
        };

        let report = workspace.install_all(&options).unwrap();

        assert_eq!(report.installed, vec!["one", "two", "four"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].local_name, "three");
        assert!(matches!(report.failures[0].error, Error::Conflict { .. }));
        assert!(third_calls.lock().unwrap().is_empty());
        assert_eq!(first_calls.lock().unwrap().len(), 1);
        assert_eq!(
            *second_calls.lock().unwrap(),
            vec![Call::Update {
                version: String::new()
            }]
        );
        assert_eq!(fourth_calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_install_all_fails_fast_without_robust() {
        let (first, _) = vcs("one", MockClient::matching("/ws/one", "http://x/elsewhere"));
        let (second, second_calls) = vcs("two", MockClient::missing("/ws/two"));
        let workspace = Workspace::new("/ws", vec![first, second]);

        let err = workspace.install_all(&InstallOptions::default()).unwrap_err();

        assert!(matches!(err, Error::Conflict { .. }));
        assert!(second_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_conflicts_pre_screen() {
        let (first, first_calls) = vcs("one", MockClient::missing("/ws/one"));
        let (second, _) = vcs("two", MockClient::new("/ws/two").with_presence(false));
        let (third, _) = vcs("three", MockClient::matching("/ws/three", "http://x/three/"));
        let workspace = Workspace::new("/ws", vec![first, second, third]);

        let conflicts = workspace.conflicts().unwrap();

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, "two");
        assert!(first_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_diff_all_keeps_order_and_records_failures() {
        let (first, _) = vcs("one", MockClient::new("/ws/one").with_diff("diff one\n"));
        let other = Entry::other("/ws/ros", "ros").unwrap();
        let (broken, _) = vcs("two", MockClient::new("/ws/two").failing_diff("boom"));
        let (last, _) = vcs("three", MockClient::new("/ws/three").with_diff("diff three\n"));
        let workspace = Workspace::new("/ws", vec![first, other, broken, last]);

        let aggregate = workspace.get_diff_all(None, true).unwrap();

        assert_eq!(aggregate.output, "diff one\ndiff three\n");
        assert!(!aggregate.is_success());
        assert_eq!(aggregate.failures.len(), 1);
        assert_eq!(aggregate.failures[0].local_name, "two");

        let err = workspace.get_diff_all(None, false).unwrap_err();
        assert!(matches!(err, Error::VcsCommand { .. }));
    }

    #[test]
    fn test_status_all_concatenates_in_manifest_order() {
        let (first, _) = vcs("one", MockClient::new("/ws/one").with_status(" M      one/a\n"));
        let (second, _) = vcs("two", MockClient::new("/ws/two").with_status("A       two/b\n"));
        let workspace = Workspace::new("/ws", vec![first, second]);

        let aggregate = workspace.get_status_all(None, false, false).unwrap();
        assert_eq!(aggregate.output, " M      one/a\nA       two/b\n");

        let untracked = workspace.get_status_all(None, true, false).unwrap();
        assert!(untracked.output.contains("??      /ws/one/new.txt\n"));
        assert!(untracked.output.contains("??      /ws/two/new.txt\n"));
    }

    #[test]
    fn test_get_yaml_all_reflects_entries() {
        let (clone, _) = vcs("clone", MockClient::missing("/ws/clone"));
        let other = Entry::other("/ws/ros", "ros").unwrap();
        let workspace = Workspace::new("/ws", vec![other, clone]);

        let yaml = manifest::to_yaml(&workspace.get_yaml_all()).unwrap();
        insta::assert_snapshot!(yaml, @r"
        - other:
            local-name: ros
        - git:
            local-name: clone
            uri: http://x/clone
        ");
    }

    #[test]
    fn test_versioned_yaml_all_rejects_mixed_workspace() {
        let (clone, _) = vcs("clone", MockClient::matching("/ws/clone", "http://x/clone"));
        let other = Entry::other("/ws/ros", "ros").unwrap();
        let workspace = Workspace::new("/ws", vec![clone, other]);

        let err = workspace.get_versioned_yaml_all().unwrap_err();
        assert!(err.is_not_versionable());
    }

    #[test]
    fn test_versioned_yaml_all_for_source_entries() {
        let pinned = VcsEntry::new(
            "/ws/pinned",
            "pinned",
            "http://x/pinned",
            "v1.0",
            Box::new(
                MockClient::matching("/ws/pinned", "http://x/pinned")
                    .with_head("cafe")
                    .resolving("v1.0", "beef"),
            ),
        )
        .unwrap();
        let (tracking, _) = vcs("tracking", MockClient::matching("/ws/tracking", "http://x/tracking").with_head("f00d"));
        let workspace = Workspace::new("/ws", vec![Entry::Vcs(pinned), tracking]);

        let yaml = manifest::to_yaml(&workspace.get_versioned_yaml_all().unwrap()).unwrap();
        insta::assert_snapshot!(yaml, @r"
        - git:
            local-name: pinned
            uri: http://x/pinned
            version: cafe
            revision: beef
        - git:
            local-name: tracking
            uri: http://x/tracking
            version: f00d
            revision: ''
        ");
    }

    #[test]
    fn test_select_filters_by_local_name() {
        let (one, _) = vcs("one", MockClient::missing("/ws/one"));
        let (two, _) = vcs("two", MockClient::missing("/ws/two"));
        let (three, _) = vcs("three", MockClient::missing("/ws/three"));
        let workspace = Workspace::new("/ws", vec![one, two, three]);

        let selected = workspace
            .select(&["three".to_string(), "one".to_string()])
            .unwrap();
        let names: Vec<_> = selected.entries().iter().map(Entry::local_name).collect();
        assert_eq!(names, vec!["one", "three"]);

        let err = selected.select(&["missing".to_string()]).unwrap_err();
        assert!(err.to_string().contains("no entry named 'missing'"));
    }

    #[test]
    fn test_from_descriptors_propagates_construction_errors() {
        let descriptors = manifest::parse("- git: {local-name: clone}").unwrap();
        let err = Workspace::from_descriptors("/ws", &descriptors, &RecordingFactory::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEntry { .. }));
    }
}
