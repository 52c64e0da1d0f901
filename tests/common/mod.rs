//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and macros
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! #[cfg_attr(not(feature = "integration-tests"), ignore)]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_remote("remote");
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, git_stdout, manifests, TestFixture};
}

/// Common manifest snippets for testing.
pub mod manifests {
    /// A plain directory next to the workspace and a clone of `../remote`.
    pub const OTHER_AND_CLONE: &str = r#"
- other: {local-name: ../ros}
- git: {local-name: clone, uri: ../remote}
"#;

    /// A single clone of `../remote`.
    pub const CLONE: &str = r#"
- git: {local-name: clone, uri: ../remote}
"#;

    /// A clone of `../remote` pinned to the `v1.0` tag.
    pub const PINNED_CLONE: &str = r#"
- git: {local-name: clone, uri: ../remote, version: v1.0}
"#;

    /// Two clones of the same remote.
    pub const TWO_CLONES: &str = r#"
- git: {local-name: clone, uri: ../remote}
- git: {local-name: second, uri: ../remote}
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "- git: {local-name: [unclosed";
}

/// Runs git in `dir` with a fixed identity and panics on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "init.defaultBranch=main", "-c", "advice.detachedHead=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Runs git in `dir` and returns its trimmed stdout.
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding a `ws/` workspace next to any number of
/// local remotes.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_remote("remote")
///     .with_manifest(manifests::CLONE);
///
/// fixture.command().arg("install").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with an empty `ws/` directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("ws")
            .create_dir_all()
            .expect("Failed to create workspace");
        Self { temp_dir }
    }

    /// Write `.workspace.yaml` into the workspace.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("ws/.workspace.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Create a git repository next to the workspace with two commits on
    /// `main`; the first one is tagged `v1.0`.
    pub fn with_remote(self, name: &str) -> Self {
        let remote = self.temp_dir.child(name);
        remote.create_dir_all().expect("Failed to create remote");
        let dir = remote.path();

        git(dir, &["init"]);
        remote
            .child("README.md")
            .write_str("# remote\n")
            .expect("Failed to write file");
        remote
            .child("modified-fs.txt")
            .write_str("original\n")
            .expect("Failed to write file");
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "initial"]);
        git(dir, &["tag", "v1.0"]);

        remote
            .child("CHANGELOG.md")
            .write_str("- second commit\n")
            .expect("Failed to write file");
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "second"]);
        self
    }

    /// Add a file relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The fixture root, containing `ws/` and the remotes.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The workspace root.
    pub fn workspace(&self) -> PathBuf {
        self.temp_dir.path().join("ws")
    }

    /// A path inside the workspace.
    pub fn ws_path(&self, relative: &str) -> PathBuf {
        self.workspace().join(relative)
    }

    /// A command running in the workspace directory with no workspace
    /// environment variables inherited.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("vcs-workspace");
        cmd.current_dir(self.workspace())
            .env_remove("VCS_WORKSPACE_MANIFEST")
            .env_remove("VCS_WORKSPACE_BACKUP")
            .env_remove("RUST_LOG")
            .write_stdin("");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_workspace() {
        let fixture = TestFixture::new();
        assert!(fixture.workspace().is_dir());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::CLONE);
        assert!(fixture.ws_path(".workspace.yaml").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [
            manifests::OTHER_AND_CLONE,
            manifests::CLONE,
            manifests::PINNED_CLONE,
            manifests::TWO_CLONES,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(manifest).expect("Manifest should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(manifests::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
