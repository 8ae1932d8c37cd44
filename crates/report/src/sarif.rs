// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal SARIF 2.1.0 model.
//!
//! Only the fields the pipeline reads are typed; everything else an
//! analyzer emits is carried through untouched in per-struct `extra` maps
//! so annotating a file never drops tool metadata we do not understand.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level SARIF log: a version plus one run per tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SarifLog {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One tool invocation and its results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub tool: Tool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<SarifResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(default)]
    pub driver: ToolComponent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolComponent {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SarifResult {
    /// Checker identifier, e.g. `core.NullDereference`.
    #[serde(rename = "ruleId", default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub message: Message,
    /// Severity: `note`, `warning` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    /// Bug path. Each flow is an ordered walk from cause to report point.
    #[serde(rename = "codeFlows", default, skip_serializing_if = "Vec::is_empty")]
    pub code_flows: Vec<CodeFlow>,
    #[serde(
        rename = "partialFingerprints",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub partial_fingerprints: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        rename = "physicalLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_location: Option<PhysicalLocation>,
    #[serde(
        rename = "logicalLocations",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub logical_locations: Vec<LogicalLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLocation {
    #[serde(
        rename = "artifactLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub artifact_location: Option<ArtifactLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "startLine", default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(rename = "startColumn", default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(rename = "endLine", default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(rename = "endColumn", default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Symbol scope of a location, used for the enclosing-function name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "fullyQualifiedName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fully_qualified_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeFlow {
    #[serde(rename = "threadFlows", default, skip_serializing_if = "Vec::is_empty")]
    pub thread_flows: Vec<ThreadFlow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadFlow {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ThreadFlowLocation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadFlowLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SarifLog {
    /// Read and parse a SARIF file.
    pub fn load(path: &Path) -> Result<SarifLog, ReportError> {
        let text = fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ReportError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the log back out as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let write_err = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| write_err(std::io::Error::other(source)))?;
        fs::write(path, text).map_err(write_err)
    }

    /// All results across all runs, mutably, for fingerprint annotation.
    pub fn results_mut(&mut self) -> impl Iterator<Item = &mut SarifResult> {
        self.runs.iter_mut().flat_map(|run| run.results.iter_mut())
    }
}

impl SarifResult {
    /// The report point: the first location with a physical component.
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations
            .iter()
            .find(|loc| loc.physical_location.is_some())
    }

    /// Enclosing-function name, from the first function-scoped logical
    /// location anywhere in the result.
    pub fn enclosing_function(&self) -> Option<&str> {
        self.locations
            .iter()
            .flat_map(|loc| loc.logical_locations.iter())
            .find_map(LogicalLocation::function_name)
    }
}

impl Location {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.physical_location
            .as_ref()?
            .artifact_location
            .as_ref()?
            .resolved_path()
    }

    pub fn line(&self) -> Option<u32> {
        self.physical_location.as_ref()?.region.as_ref()?.start_line
    }

    pub fn column(&self) -> Option<u32> {
        self.physical_location
            .as_ref()?
            .region
            .as_ref()?
            .start_column
    }

    pub fn message_text(&self) -> &str {
        self.message.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }
}

impl ArtifactLocation {
    /// Filesystem path behind the `uri`, with the `file://` scheme stripped
    /// and percent-escapes decoded. Non-file schemes yield `None`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let uri = self.uri.as_deref()?;
        let path = match uri.strip_prefix("file://") {
            Some(rest) => rest,
            None if uri.contains("://") => return None,
            None => uri,
        };
        Some(PathBuf::from(percent_decode(path)))
    }
}

impl LogicalLocation {
    fn function_name(&self) -> Option<&str> {
        match self.kind.as_deref() {
            Some("function") | Some("member") | None => self
                .fully_qualified_name
                .as_deref()
                .or(self.name.as_deref()),
            _ => None,
        }
    }
}

/// Decode `%XX` escapes. Invalid escapes pass through literally.
fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut rest = input.as_bytes();
    while let Some(pos) = rest.iter().position(|&b| b == b'%') {
        bytes.extend_from_slice(&rest[..pos]);
        let escape = rest.get(pos + 1..pos + 3);
        match escape.and_then(|hex| u8::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()) {
            Some(byte) => {
                bytes.push(byte);
                rest = &rest[pos + 3..];
            }
            None => {
                bytes.push(b'%');
                rest = &rest[pos + 1..];
            }
        }
    }
    bytes.extend_from_slice(rest);
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
#[path = "sarif_tests.rs"]
pub(crate) mod tests;
