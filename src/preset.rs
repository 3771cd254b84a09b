//! LooksMenu preset parsing.
//!
//! A preset is a JSON document describing a saved character appearance.
//! Two of its fields can carry plugin references:
//!
//! - `HairColor`: a single string of the form `"<plugin>|<form id>"`
//! - `HeadParts`: an array of strings in the same form
//!
//! Only the segment before the first `|` names a plugin; the remainder is
//! form data this library does not interpret. A field that is absent, or
//! present with an unexpected shape, contributes no references. Absent
//! field, wrong-shaped field, and unparseable file are three distinct
//! outcomes: the first two are debug-level non-events, the last is a
//! [`PresetError`] the caller is expected to log and recover from.

use crate::plugins::ActivePluginSet;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a file into a usable preset.
///
/// Always scoped to a single file. A scan over many presets logs these and
/// moves on; one broken preset never aborts the batch.
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("failed to read preset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid LooksMenu preset: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The recognized fields of a preset document.
///
/// Everything else in the file is ignored. The fields are kept as raw JSON
/// values so that "present but wrong shape" can be told apart from "absent".
#[derive(Debug, Clone, Deserialize)]
struct PresetDocument {
    #[serde(rename = "HairColor")]
    hair_color: Option<Value>,
    #[serde(rename = "HeadParts")]
    head_parts: Option<Value>,
}

/// A single preset file, parsed once at construction.
///
/// Parsing is idempotent: loading the same unchanged bytes always yields
/// the same reference set.
#[derive(Debug, Clone)]
pub struct PresetRecord {
    path: PathBuf,
    document: PresetDocument,
}

impl PresetRecord {
    /// Read and parse a preset file.
    ///
    /// Fails when the file cannot be read or its content is not a JSON
    /// object. Top-level arrays and scalars are valid JSON but not valid
    /// presets, so they fail here too.
    pub fn load(path: &Path) -> Result<PresetRecord, PresetError> {
        let content = fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document = serde_json::from_str(&content).map_err(|source| PresetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(PresetRecord {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the preset, for display. Hosts show this instead of the
    /// full path to keep diagnostics panels readable.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Extract the plugins this preset references.
    ///
    /// Order of first appearance is preserved and duplicates are dropped,
    /// comparing case-insensitively. The `HairColor` reference, when
    /// present, comes before any `HeadParts` references.
    pub fn plugin_references(&self) -> Vec<String> {
        let mut references = Vec::new();
        let mut seen = HashSet::new();
        let mut collect = |field: &str| {
            let plugin = plugin_identifier(field);
            if seen.insert(plugin.to_ascii_lowercase()) {
                references.push(plugin.to_string());
            }
        };

        match &self.document.hair_color {
            Some(Value::String(value)) => collect(value),
            Some(other) => debug!(
                "{}: HairColor is not a string (found {})",
                self.path.display(),
                json_type_name(other)
            ),
            None => debug!("{} has no HairColor attribute.", self.path.display()),
        }

        match &self.document.head_parts {
            Some(Value::Array(parts)) => {
                for part in parts {
                    match part.as_str() {
                        Some(value) => collect(value),
                        None => debug!(
                            "{}: skipping non-string HeadParts entry ({})",
                            self.path.display(),
                            json_type_name(part)
                        ),
                    }
                }
            }
            Some(other) => debug!(
                "{}: HeadParts is not an array (found {})",
                self.path.display(),
                json_type_name(other)
            ),
            None => debug!("{} has no HeadParts attribute.", self.path.display()),
        }

        references
    }

    /// Return every referenced plugin that is not in the active set, in
    /// extraction order. An empty result means the preset is fully
    /// satisfied by the current load order.
    pub fn missing_plugins(&self, active: &ActivePluginSet) -> Vec<String> {
        self.plugin_references()
            .into_iter()
            .filter(|plugin| !active.contains(plugin))
            .collect()
    }
}

/// Returns whether the path looks like a LooksMenu preset file.
pub fn is_preset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(crate::PRESET_EXTENSION))
}

/// The plugin segment of a `"<plugin>|<form id>"` field value.
fn plugin_identifier(field: &str) -> &str {
    field.split('|').next().unwrap_or(field)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
