//! Interactive conflict resolution at a terminal.

use std::io;
use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Input, Select};

use vcs_workspace::conflict::{Conflict, ConflictResolver, Resolution};
use vcs_workspace::error::{Error, Result};

/// The choices offered for a conflict, in menu order.
const CHOICES: [(&str, Choice); 5] = [
    ("delete: remove it and check out afresh", Choice::Delete),
    ("backup: move it away and check out afresh", Choice::Backup),
    ("abort: stop with an error", Choice::Abort),
    ("retry: inspect the path again", Choice::Retry),
    ("skip: leave it as it is", Choice::Skip),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Delete,
    Backup,
    Abort,
    Retry,
    Skip,
}

/// Asks the operator what to do about each conflict.
pub struct TerminalResolver {
    /// Offered as the default answer when the operator picks backup.
    backup_root: PathBuf,
}

impl TerminalResolver {
    pub fn new(backup_root: PathBuf) -> Self {
        Self { backup_root }
    }
}

impl ConflictResolver for TerminalResolver {
    fn resolve(&self, path: &Path, conflict: &Conflict) -> Result<Resolution> {
        let theme = ColorfulTheme::default();

        eprintln!();
        eprintln!("{}: {}", path.display(), conflict);

        let items: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::with_theme(&theme)
            .with_prompt(format!("How should {} be handled?", path.display()))
            .items(&items)
            .default(2)
            .interact()
            .map_err(prompt_error)?;

        match CHOICES[selection].1 {
            Choice::Backup => {
                let root: String = Input::with_theme(&theme)
                    .with_prompt("Backup directory")
                    .default(self.backup_root.display().to_string())
                    .interact_text()
                    .map_err(prompt_error)?;
                Ok(Resolution::Backup {
                    root: Some(PathBuf::from(root)),
                })
            }
            other => Ok(resolution(other)),
        }
    }
}

fn resolution(choice: Choice) -> Resolution {
    match choice {
        Choice::Delete => Resolution::Delete,
        Choice::Backup => Resolution::Backup { root: None },
        Choice::Abort => Resolution::Abort,
        Choice::Retry => Resolution::Retry,
        Choice::Skip => Resolution::Skip,
    }
}

fn prompt_error(error: dialoguer::Error) -> Error {
    Error::Io(io::Error::other(error.to_string()))
}
