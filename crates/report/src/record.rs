// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-neutral view of one diagnostic.
//!
//! Hashing works on [`ReportRecord`]s, not raw SARIF, so every engine that
//! can be mapped into this shape gets identical identity semantics.

use crate::sarif::{SarifLog, SarifResult};
use std::path::PathBuf;

/// One step of a bug path, in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugPathStep {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// A single diagnostic with everything identity hashing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    /// Main file of the report, absolute when the analyzer gave one.
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    /// Checker identifier, e.g. `core.NullDereference`.
    pub checker: String,
    pub message: String,
    pub severity: Option<String>,
    /// Bug path from cause to report point. Never empty: a diagnostic
    /// without an explicit flow carries its report point as the only step.
    pub path: Vec<BugPathStep>,
    /// Name of the function enclosing the report point, when known.
    pub function: Option<String>,
}

impl ReportRecord {
    /// Extract a record from one SARIF result.
    ///
    /// Returns `None` when the result has no physical location at all;
    /// such results cannot be identified stably and are left unhashed.
    pub fn from_result(result: &SarifResult) -> Option<ReportRecord> {
        let primary = result.primary_location()?;
        let file = primary.file_path()?;
        let line = primary.line().unwrap_or(0);
        let column = primary.column().unwrap_or(0);

        let mut path = Vec::new();
        for step in result
            .code_flows
            .iter()
            .flat_map(|flow| flow.thread_flows.iter())
            .flat_map(|thread| thread.locations.iter())
        {
            let Some(location) = step.location.as_ref() else {
                continue;
            };
            path.push(BugPathStep {
                file: location.file_path().unwrap_or_else(|| file.clone()),
                line: location.line().unwrap_or(0),
                column: location.column().unwrap_or(0),
                message: location.message_text().to_string(),
            });
        }
        if path.is_empty() {
            path.push(BugPathStep {
                file: file.clone(),
                line,
                column,
                message: result.message.text.clone(),
            });
        }

        Some(ReportRecord {
            file,
            line,
            column,
            checker: result.rule_id.clone().unwrap_or_default(),
            message: result.message.text.clone(),
            severity: result.level.clone(),
            path,
            function: result.enclosing_function().map(str::to_string),
        })
    }

    /// Extract records for every hashable result in a log, in file order.
    pub fn from_log(log: &SarifLog) -> Vec<ReportRecord> {
        log.runs
            .iter()
            .flat_map(|run| run.results.iter())
            .filter_map(ReportRecord::from_result)
            .collect()
    }

    /// File name without directories, as used in identity hashes.
    pub(crate) fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
