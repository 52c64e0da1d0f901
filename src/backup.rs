//! Moving conflicting checkouts out of the way.
//!
//! A backup is named `{root}/{basename}_{YYYY-MM-DD-HH-MM-SS}` using local
//! time. The move is a rename. When the backup root is on another
//! filesystem the tree is copied, links included, and the original removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Computes where `path` is moved to when backed up into `root` at `now`.
pub fn backup_destination<Tz: TimeZone>(root: &Path, path: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let name = path.file_name().ok_or_else(|| Error::InvalidEntry {
        message: format!("cannot back up {}: path has no final component", path.display()),
    })?;
    Ok(root.join(format!(
        "{}_{}",
        name.to_string_lossy(),
        now.format(TIMESTAMP_FORMAT)
    )))
}

/// Moves `path` into `root` and returns the new location.
///
/// Fails with [`Error::BackupDisabled`] when no root is configured. An
/// existing backup is never written to: a `_1`, `_2`, ... suffix is added
/// until the name is free.
pub fn backup(path: &Path, root: Option<&Path>) -> Result<PathBuf> {
    let root = root.ok_or_else(|| Error::BackupDisabled {
        path: path.to_path_buf(),
    })?;
    fs::create_dir_all(root)?;
    let destination = unused_destination(backup_destination(root, path, &Local::now())?);

    info!("Backing up {} to {}", path.display(), destination.display());

    match fs::rename(path, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "{} is on another filesystem than {}, copying instead",
                path.display(),
                root.display()
            );
            copy_tree(path, &destination).map_err(|e| Error::Backup {
                src: path.to_path_buf(),
                dst: destination.clone(),
                message: e.to_string(),
            })?;
            remove_path(path)?;
        }
        Err(e) => {
            return Err(Error::Backup {
                src: path.to_path_buf(),
                dst: destination,
                message: e.to_string(),
            })
        }
    }

    Ok(destination)
}

fn unused_destination(candidate: PathBuf) -> PathBuf {
    if fs::symlink_metadata(&candidate).is_err() {
        return candidate;
    }
    let base = candidate.as_os_str().to_owned();
    (1..)
        .map(|n| {
            let mut name = base.clone();
            name.push(format!("_{}", n));
            PathBuf::from(name)
        })
        .find(|path| fs::symlink_metadata(path).is_err())
        .unwrap_or(candidate)
}

/// Removes `path`, whether it is a directory tree or a single file.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let file_type = fs::symlink_metadata(src)?.file_type();
    if file_type.is_symlink() {
        return copy_link(src, dst);
    }
    if !file_type.is_dir() {
        fs::copy(src, dst)?;
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| Error::Backup {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::InvariantViolation {
                message: format!("walked outside of {}: {}", src.display(), e),
            })?;
        let target = dst.join(relative);

        if entry.file_type().is_symlink() {
            copy_link(entry.path(), &target)?;
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recreates the link at `src` as `dst`, pointing at the same target.
#[cfg(unix)]
fn copy_link(src: &Path, dst: &Path) -> Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_link(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)?;
    Ok(())
}
