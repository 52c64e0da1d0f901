//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vcs_workspace::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Manifest not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;

/// Generate an error for when the manifest file is not found.
///
/// Includes hints about:
/// - Creating a manifest in the workspace root
/// - Using the -m/--manifest flag
/// - Using the VCS_WORKSPACE_MANIFEST environment variable
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest not found: {path}\n\n\
         hint: Create a .workspace.yaml file in the workspace root\n\
         hint: Use -m/--manifest to specify a different path\n\
         hint: Set VCS_WORKSPACE_MANIFEST environment variable",
        path = path.display()
    )
}

/// Generate an error for a backup requested without a backup directory.
pub fn backup_disabled(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Cannot back up {path}: no backup directory configured\n\n\
         hint: Use --backup-dir <DIR> to choose where backups go\n\
         hint: Set VCS_WORKSPACE_BACKUP environment variable\n\
         hint: Use --mode delete to discard the existing directory instead",
        path = path.display()
    )
}

/// Generate an error for an entry that conflicts with the manifest.
///
/// Includes hints about the conflict handling modes.
pub fn conflict(path: &Path, conflict: &crate::conflict::Conflict) -> anyhow::Error {
    anyhow::anyhow!(
        "{path}: {conflict}\n\n\
         hint: Use --mode backup --backup-dir <DIR> to move it out of the way\n\
         hint: Use --mode delete to replace it with a fresh checkout\n\
         hint: Use --mode skip to leave it as it is",
        path = path.display()
    )
}

/// Generate an error for a name on the command line that matches no entry.
///
/// Includes a "did you mean" hint when a local name is close.
pub fn unknown_entry(name: &str, local_names: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(name, local_names)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "No entry named '{name}' in the manifest{did_you_mean}\n\n\
         hint: Run 'vcs-workspace info' to list the entries"
    )
}

/// Turn a library error into a CLI error, attaching hints where one helps.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::BackupDisabled { path } => backup_disabled(&path),
        Error::Conflict { path, conflict } => self::conflict(&path, &conflict),
        other => anyhow::Error::new(other),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Single-row variant: previous[j] holds the distance for a[..i-1], b[..j].
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b_chars.len()]
}
