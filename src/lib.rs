//! # VCS Workspace Library
//!
//! This library reconciles a workspace of version-controlled checkouts with
//! a manifest that declares what the workspace should contain. It is used by
//! the `vcs-workspace` command-line tool but can be embedded in any program
//! that needs to install, update or inspect a set of checkouts.
//!
//! ## Quick Example
//!
//! ```
//! use vcs_workspace::manifest;
//! use vcs_workspace::vcs::DefaultClientFactory;
//! use vcs_workspace::workspace::Workspace;
//!
//! let descriptors = manifest::parse(r#"
//! - other: {local-name: ../ros}
//! - git: {local-name: clone, uri: https://example.com/clone.git, version: main}
//! "#).unwrap();
//!
//! let workspace =
//!     Workspace::from_descriptors("/tmp/ws", &descriptors, &DefaultClientFactory).unwrap();
//!
//! assert_eq!(workspace.len(), 2);
//! assert_eq!(workspace.get_yaml_all(), descriptors);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: The YAML descriptors that declare each entry.
//! - **Entries (`entry`)**: Plain directories, setup files and checkouts. Only
//!   checkouts have version control behavior.
//! - **Drivers (`vcs`, `git`)**: The [`vcs::VcsClient`] trait every backend
//!   implements, and the git implementation.
//! - **Reconciliation (`install`)**: Checks out missing entries, updates
//!   matching ones, and hands conflicts to the policy.
//! - **Conflict policy (`conflict`, `backup`)**: Scripted or interactive
//!   decisions about occupied paths, and the backup mechanics.
//! - **Workspace (`workspace`)**: Aggregate install, diff, status and
//!   snapshot operations over all entries.

pub mod backup;
pub mod conflict;
pub mod defaults;
pub mod entry;
pub mod error;
pub mod git;
pub mod install;
pub mod manifest;
pub mod output;
pub mod suggestions;
pub mod vcs;
pub mod workspace;

#[cfg(test)]
mod entry_proptest;
#[cfg(test)]
mod test_support;
