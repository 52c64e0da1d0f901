//! # Error Handling
//!
//! This module defines the centralized error type for the `vcs-workspace`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every failure mode of manifest loading, entry construction and
//! workspace reconciliation.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries the path, URI or entry
//!   name it concerns, so a message can be attributed to a single entry.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into four groups:
//!
//! - Configuration errors, raised while reading the manifest or constructing
//!   entries (`ConfigParse`, `InvalidEntry`, `UnsupportedBackend`).
//! - Operation failures (`CheckoutFailed`, `UpdateFailed`, `BackupDisabled`,
//!   `Backup`, `NotVersionable`, `VcsCommand`).
//! - Conflicts between the manifest and the disk (`Conflict`). These are only
//!   fatal when the conflict policy aborts or robust mode is on.
//! - Internal consistency violations (`InvariantViolation`), which indicate a
//!   bug rather than a user problem.

use std::path::PathBuf;

use thiserror::Error;

use crate::conflict::Conflict;

/// Main error type for vcs-workspace operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest could not be parsed.
    ///
    /// Includes an optional hint about how to fix the manifest.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// An entry could not be constructed from its manifest data.
    #[error("Invalid workspace entry: {message}")]
    InvalidEntry { message: String },

    /// The manifest names a backend for which no driver is available.
    #[error("No driver available for backend '{backend}'")]
    UnsupportedBackend { backend: String },

    /// A fresh checkout did not succeed.
    #[error("Checkout of {uri} version '{version}' into {} failed", path.display())]
    CheckoutFailed {
        uri: String,
        version: String,
        path: PathBuf,
    },

    /// Updating an existing checkout did not succeed.
    #[error("Update failed of {}", path.display())]
    UpdateFailed { path: PathBuf },

    /// A backup was requested but no backup directory is configured.
    #[error("Cannot install {}: backup disabled (no backup directory configured)", path.display())]
    BackupDisabled { path: PathBuf },

    /// Moving a directory to its backup location failed.
    #[error("Backup of {} to {} failed: {message}", src.display(), dst.display())]
    Backup {
        src: PathBuf,
        dst: PathBuf,
        message: String,
    },

    /// The disk state of an entry does not match the manifest.
    #[error("{}: {conflict}", path.display())]
    Conflict { path: PathBuf, conflict: Conflict },

    /// A versioned descriptor was requested for an entry that is not under
    /// version control.
    #[error("Cannot generate versioned output for '{local_name}': not a source entry")]
    NotVersionable { local_name: String },

    /// A version control command could not be executed.
    #[error("VCS command failed in {}: {command} - {stderr}", path.display())]
    VcsCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// An internal invariant was violated. This is a bug.
    #[error("Bug: {message}")]
    InvariantViolation { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this error only means the operation does not apply
    /// to the entry, as opposed to a genuine failure.
    pub fn is_not_versionable(&self) -> bool {
        matches!(self, Error::NotVersionable { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
