//! # Info Command Implementation
//!
//! This module implements the `info` subcommand, which lists the entries of
//! the manifest together with what is currently on disk for each of them:
//!
//! - `missing`: nothing exists at the entry's path
//! - `ok`: the path holds what the manifest asks for
//! - `conflict`: the path is occupied by something else
//!
//! With `--json` the same information is printed as a JSON array.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use vcs_workspace::entry::Entry;
use vcs_workspace::install::EntryState;
use vcs_workspace::output::{state_label, OutputConfig};
use vcs_workspace::workspace::Workspace;

use super::WorkspaceArgs;

/// List the entries of the manifest and their state on disk
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Print the entries as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One row of the listing.
#[derive(Debug, Serialize)]
struct EntryInfo {
    local_name: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<String>,
    #[serde(skip)]
    entry_state: EntryState,
}

impl EntryInfo {
    fn from_entry(entry: &Entry) -> vcs_workspace::error::Result<Self> {
        let state = entry.state()?;
        let (uri, version) = match entry.as_vcs() {
            Some(vcs) => (
                Some(vcs.uri().to_string()),
                Some(vcs.version().to_string()).filter(|v| !v.is_empty()),
            ),
            None => (None, None),
        };
        let conflict = match &state {
            EntryState::Conflict(conflict) => Some(conflict.to_string()),
            _ => None,
        };
        Ok(Self {
            local_name: entry.local_name().to_string(),
            kind: entry.get_yaml().kind(),
            uri,
            version,
            state: state.to_string(),
            conflict,
            entry_state: state,
        })
    }
}

/// Execute the `info` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: InfoArgs, color_flag: &str) -> Result<()> {
    let workspace = args.workspace.load()?;
    let rows = collect(&workspace)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let out = OutputConfig::from_env_and_flag(color_flag);
    println!("Workspace: {}", workspace.root().display());
    if rows.is_empty() {
        println!("No entries in the manifest.");
        return Ok(());
    }
    print!("{}", render_table(&rows, &out));
    Ok(())
}

fn collect(workspace: &Workspace) -> Result<Vec<EntryInfo>> {
    Ok(workspace
        .entries()
        .iter()
        .map(EntryInfo::from_entry)
        .collect::<vcs_workspace::error::Result<Vec<_>>>()?)
}

fn column_width(rows: &[EntryInfo], header: &str, cell: impl Fn(&EntryInfo) -> usize) -> usize {
    rows.iter().map(cell).max().unwrap_or(0).max(header.len())
}

fn render_table(rows: &[EntryInfo], out: &OutputConfig) -> String {
    let name_width = column_width(rows, "Local name", |r| r.local_name.len());
    let kind_width = column_width(rows, "Type", |r| r.kind.len());
    let version_width = column_width(rows, "Version", |r| r.version.as_deref().map_or(1, str::len));
    let uri_width = column_width(rows, "URI", |r| r.uri.as_deref().map_or(1, str::len));

    let mut table = format!(
        "{:<name_width$}  {:<kind_width$}  {:<version_width$}  {:<uri_width$}  State\n",
        "Local name", "Type", "Version", "URI"
    );
    for row in rows {
        let state = state_label(out, &row.entry_state);
        let line = format!(
            "{:<name_width$}  {:<kind_width$}  {:<version_width$}  {:<uri_width$}  {}",
            row.local_name,
            row.kind,
            row.version.as_deref().unwrap_or("-"),
            row.uri.as_deref().unwrap_or("-"),
            state
        );
        table.push_str(line.trim_end());
        table.push('\n');
    }
    table
}
