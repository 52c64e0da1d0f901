//! # Git Driver
//!
//! [`GitClient`] implements [`VcsClient`] on top of the system `git` command.
//! Using the command-line tool means authentication works the way it does for
//! the user: SSH keys, credential helpers and anything configured in
//! `~/.gitconfig` apply unchanged.
//!
//! Commands that fail because something is absent (no repository, no remote,
//! unknown revision) are reported as `false`/`None`. Only a failure to run
//! `git` at all becomes an [`Error::VcsCommand`].

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};
use crate::vcs::{Backend, VcsClient};

/// A git checkout bound to one local path.
#[derive(Debug, Clone)]
pub struct GitClient {
    path: PathBuf,
}

impl GitClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Runs `git` with `args` inside the checkout.
    fn git(&self, args: &[&str]) -> Result<Output> {
        run_git(&self.path, args)
    }

    /// Runs `git` inside the checkout and returns trimmed stdout on success.
    fn git_stdout(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(stdout).filter(|s| !s.is_empty()))
    }

    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        Ok(self.git(args)?.status.success())
    }

    /// The prefix shown in front of file names in diff and status output.
    fn display_prefix(&self, basepath: Option<&Path>) -> Option<String> {
        let base = basepath?;
        let relative = self.path.strip_prefix(base).unwrap_or(&self.path);
        let prefix = relative.to_string_lossy().trim_end_matches('/').to_string();
        Some(prefix).filter(|p| !p.is_empty())
    }
}

impl VcsClient for GitClient {
    fn backend(&self) -> Backend {
        Backend::Git
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn detect_presence(&self) -> bool {
        self.path.join(".git").exists()
    }

    fn get_url(&self) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        self.git_stdout(&["config", "--get", "remote.origin.url"])
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        let rev = format!("{}^{{commit}}", spec.unwrap_or("HEAD"));
        self.git_stdout(&["rev-parse", "--verify", "--quiet", &rev])
    }

    fn checkout(&self, uri: &str, version: &str) -> Result<bool> {
        // git clone runs from the parent so the target is created by git itself
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        let target = self.path.file_name().ok_or_else(|| Error::InvalidEntry {
            message: format!("cannot clone into {}", self.path.display()),
        })?;

        let output = Command::new("git")
            .arg("clone")
            .arg(uri)
            .arg(target)
            .current_dir(parent)
            .output()
            .map_err(|e| Error::VcsCommand {
                command: format!("git clone {}", uri),
                path: self.path.clone(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            debug!(
                "git clone of {} failed: {}",
                uri,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(false);
        }

        if version.is_empty() {
            return Ok(true);
        }
        self.succeeds(&["-c", "advice.detachedHead=false", "checkout", version])
    }

    fn update(&self, version: &str) -> Result<bool> {
        if !self.detect_presence() {
            return Ok(false);
        }
        if !self.succeeds(&["fetch", "--tags", "origin"])? {
            return Ok(false);
        }
        if version.is_empty() {
            return self.succeeds(&["pull", "--ff-only"]);
        }
        if !self.succeeds(&["-c", "advice.detachedHead=false", "checkout", version])? {
            return Ok(false);
        }

        // A pinned branch also has to follow its remote counterpart
        let remote_branch = format!("refs/remotes/origin/{}", version);
        if self.succeeds(&["rev-parse", "--verify", "--quiet", &remote_branch])? {
            return self.succeeds(&["merge", "--ff-only", &remote_branch]);
        }
        Ok(true)
    }

    fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        if !self.detect_presence() {
            return Ok(String::new());
        }
        let mut args = vec!["diff".to_string(), "HEAD".to_string(), "--no-color".to_string()];
        if let Some(prefix) = self.display_prefix(basepath) {
            args.push(format!("--src-prefix={}/", prefix));
            args.push(format!("--dst-prefix={}/", prefix));
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self.git(&args)?;
        if !output.status.success() {
            return Err(Error::VcsCommand {
                command: "git diff".to_string(),
                path: self.path.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        if !self.detect_presence() {
            return Ok(String::new());
        }
        let untracked_flag = if untracked {
            "--untracked-files=all"
        } else {
            "--untracked-files=no"
        };
        let output = self.git(&["status", "--porcelain", untracked_flag])?;
        if !output.status.success() {
            return Err(Error::VcsCommand {
                command: "git status".to_string(),
                path: self.path.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let prefix = self.display_prefix(basepath);
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter_map(|line| format_status_line(line, prefix.as_deref()))
            .map(|line| line + "\n")
            .collect())
    }
}

/// Runs `git` with `args` in `dir`, mapping a failure to spawn into an error.
fn run_git(dir: &Path, args: &[&str]) -> Result<Output> {
    debug!("git {} (in {})", args.join(" "), dir.display());
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::VcsCommand {
            command: format!("git {}", args.join(" ")),
            path: dir.to_path_buf(),
            stderr: e.to_string(),
        })
}

/// Rewrites one `git status --porcelain` line into the workspace format.
///
/// The two status columns are padded to eight characters and every file name
/// is prefixed with `prefix/` so that output from several checkouts can be
/// concatenated.
fn format_status_line(line: &str, prefix: Option<&str>) -> Option<String> {
    if line.len() < 4 {
        return None;
    }
    let (code, rest) = line.split_at(2);
    let files = rest.trim_start();
    let prefixed = match prefix {
        Some(prefix) if !prefix.is_empty() => files
            .split(" -> ")
            .map(|file| format!("{}/{}", prefix, file))
            .collect::<Vec<_>>()
            .join(" -> "),
        _ => files.to_string(),
    };
    Some(format!("{:<8}{}", code, prefixed))
}
