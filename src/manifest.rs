//! # Manifest Schema and Parsing
//!
//! This module defines the descriptors that make up a workspace manifest
//! (`.workspace.yaml` by default) and the logic to read and write them.
//!
//! ## Format
//!
//! A manifest is a YAML list. Each item is a mapping with exactly one key
//! naming the entry type:
//!
//! ```yaml
//! - other: {local-name: ../ros}
//! - setup-file: {local-name: setup.sh}
//! - git: {local-name: clone, uri: ../remote, version: v1.0}
//! ```
//!
//! The key of a source entry is the backend name (`git`, `hg`, `svn`, `bzr`
//! or `tar`). `version` is optional and omitted on output when empty.
//! Versioned output, produced by
//! [`Workspace::get_versioned_yaml_all`](crate::workspace::Workspace::get_versioned_yaml_all),
//! additionally carries a `revision` field.
//!
//! ## Parsing
//!
//! Entries are read as raw YAML values first and converted by hand. Scalar
//! fields accept numbers and booleans as well as strings, so `version: 2`
//! reads the same as `version: "2"`.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::vcs::Backend;

const OTHER_KEY: &str = "other";
const SETUP_FILE_KEY: &str = "setup-file";

/// Fields of a source-controlled entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSpec {
    /// Where the checkout lives, relative to the workspace root or absolute.
    pub local_name: String,
    /// Remote location to check out from. Required for installation, but
    /// kept optional here so a manifest with a missing `uri` can still be
    /// read and reported entry by entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Pinned revision (tag, branch or commit). `None` tracks the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Resolved pin, only present in versioned output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct LocalName<'a> {
    local_name: &'a str,
}

/// One entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A directory tracked in the manifest but not under version control.
    Other { local_name: String },
    /// A single configuration file.
    SetupFile { local_name: String },
    /// A checkout managed by a version control backend.
    Source { backend: Backend, spec: SourceSpec },
}

impl Descriptor {
    /// The `local-name` of the entry.
    pub fn local_name(&self) -> &str {
        match self {
            Descriptor::Other { local_name } | Descriptor::SetupFile { local_name } => local_name,
            Descriptor::Source { spec, .. } => &spec.local_name,
        }
    }

    /// The manifest key of the entry.
    pub fn kind(&self) -> &'static str {
        match self {
            Descriptor::Other { .. } => OTHER_KEY,
            Descriptor::SetupFile { .. } => SETUP_FILE_KEY,
            Descriptor::Source { backend, .. } => backend.name(),
        }
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Descriptor::Other { local_name } | Descriptor::SetupFile { local_name } => {
                map.serialize_entry(self.kind(), &LocalName { local_name })?;
            }
            Descriptor::Source { spec, .. } => {
                map.serialize_entry(self.kind(), spec)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Mapping::deserialize(deserializer)?;
        convert_yaml_mapping_to_descriptor(map).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_yaml::to_string(&[self]) {
            Ok(yaml) => f.write_str(yaml.trim_end()),
            Err(_) => write!(f, "{}: {}", self.kind(), self.local_name()),
        }
    }
}

/// Parses a manifest from a YAML string.
///
/// An empty document is an empty manifest.
pub fn parse(yaml_content: &str) -> Result<Vec<Descriptor>> {
    let raw: Value = serde_yaml::from_str(yaml_content).map_err(Error::Yaml)?;

    let items = match raw {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(Error::ConfigParse {
                message: "Manifest must be a list of entries".to_string(),
                hint: Some("Start each entry with '- ', e.g. '- git: {local-name: foo, uri: ...}'".to_string()),
            })
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Mapping(map) => convert_yaml_mapping_to_descriptor(map),
            _ => Err(Error::ConfigParse {
                message: "Expected YAML mapping for entry".to_string(),
                hint: None,
            }),
        })
        .collect()
}

/// Parses a manifest from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Descriptor>> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Serializes descriptors back into manifest YAML.
pub fn to_yaml(descriptors: &[Descriptor]) -> Result<String> {
    Ok(serde_yaml::to_string(descriptors)?)
}

/// Convert a single-key YAML mapping into a `Descriptor`.
fn convert_yaml_mapping_to_descriptor(map: Mapping) -> Result<Descriptor> {
    if map.len() != 1 {
        return Err(Error::ConfigParse {
            message: format!("Entry must have exactly one key, found {}", map.len()),
            hint: None,
        });
    }
    let (key, value) = map.into_iter().next().ok_or_else(|| Error::ConfigParse {
        message: "Empty entry mapping".to_string(),
        hint: None,
    })?;

    let entry_type = key.as_str().ok_or_else(|| Error::ConfigParse {
        message: "Entry key must be a string".to_string(),
        hint: None,
    })?;

    let mut fields = match value {
        Value::Mapping(fields) => fields,
        _ => {
            return Err(Error::ConfigParse {
                message: format!("Entry '{}' must be a mapping", entry_type),
                hint: None,
            })
        }
    };

    let local_name = take_scalar(&mut fields, "local-name").ok_or_else(|| Error::ConfigParse {
        message: format!("Entry '{}' is missing local-name", entry_type),
        hint: Some("Add 'local-name:' with the path of the entry in the workspace".to_string()),
    })?;

    let descriptor = match entry_type {
        OTHER_KEY => Descriptor::Other { local_name },
        SETUP_FILE_KEY => Descriptor::SetupFile { local_name },
        name => {
            let backend = name.parse::<Backend>().map_err(|_| Error::ConfigParse {
                message: format!("Unknown entry type: {}", name),
                hint: Some(format!(
                    "Supported types are {}, {} and the backends {}",
                    OTHER_KEY,
                    SETUP_FILE_KEY,
                    Backend::ALL
                        .iter()
                        .map(Backend::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            })?;
            let spec = SourceSpec {
                local_name,
                uri: take_scalar(&mut fields, "uri"),
                version: take_scalar(&mut fields, "version").filter(|v| !v.is_empty()),
                revision: take_scalar(&mut fields, "revision"),
            };
            Descriptor::Source { backend, spec }
        }
    };

    for (ignored, _) in fields {
        debug!(
            "Ignoring unknown field {:?} in '{}' entry",
            ignored,
            descriptor.local_name()
        );
    }

    Ok(descriptor)
}

/// Removes `key` from `fields` and returns it as a string, if it is a scalar.
fn take_scalar(fields: &mut Mapping, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Rewrites relative local URIs (`../remote`, `./mirror`) so they are
/// anchored at `root` instead of the current directory.
///
/// Remote URIs (`https://...`, `git@host:repo`) and absolute paths are left
/// untouched.
pub fn resolve_relative_uris(descriptors: &mut [Descriptor], root: &Path) {
    for descriptor in descriptors.iter_mut() {
        if let Descriptor::Source { spec, .. } = descriptor {
            if let Some(uri) = spec.uri.as_mut() {
                if is_relative_local_uri(uri) {
                    let resolved = normalize_path(&root.join(uri.as_str()));
                    debug!("Resolved uri {} to {}", uri, resolved.display());
                    *uri = resolved.to_string_lossy().into_owned();
                }
            }
        }
    }
}

fn is_relative_local_uri(uri: &str) -> bool {
    !uri.is_empty() && !uri.contains(':') && Path::new(uri).is_relative()
}

/// Lexically removes `.` and `..` components from `path`.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
