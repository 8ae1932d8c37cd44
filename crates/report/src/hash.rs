// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable report identity hashes.
//!
//! Identity is keyed on file content rather than positions: the
//! context-sensitive hash folds in the text of every bug-path line, so a
//! report keeps its hash when unrelated edits shift it up or down, and
//! changes it when the implicated code changes. The context-free hash
//! drops the path entirely and survives message wording that varies by
//! symbol name or count, at the cost of merging same-shaped reports.

use crate::record::ReportRecord;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

/// How report identity is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashMode {
    /// File name, checker, message, and each bug-path step's
    /// (line text, column, step message). The default.
    #[default]
    ContextSensitive,
    /// File name, checker, normalized message template, enclosing
    /// function. Uniform across engines, independent of the bug path.
    ContextFree,
}

impl HashMode {
    /// Parse the CLI spelling.
    pub fn parse(value: &str) -> Option<HashMode> {
        match value {
            "context-sensitive" => Some(HashMode::ContextSensitive),
            "context-free" => Some(HashMode::ContextFree),
            _ => None,
        }
    }
}

assay_core::simple_display! {
    HashMode {
        ContextSensitive => "context-sensitive",
        ContextFree => "context-free",
    }
}

/// Memoized source file lines for line-text lookups.
///
/// One cache serves all results of an analysis run; an unreadable file is
/// recorded once and every lookup into it yields the empty string.
#[derive(Debug, Default)]
pub struct LineCache {
    files: HashMap<PathBuf, Option<Vec<String>>>,
}

impl LineCache {
    pub fn new() -> LineCache {
        LineCache::default()
    }

    /// Text of the 1-based `line` of `file`, without the terminator.
    /// Missing files and out-of-range lines yield `""`.
    pub fn line_text(&mut self, file: &Path, line: u32) -> String {
        let lines = self
            .files
            .entry(file.to_path_buf())
            .or_insert_with(|| match fs::read_to_string(file) {
                Ok(text) => Some(
                    text.split('\n')
                        .map(|l| l.trim_end_matches('\r').to_string())
                        .collect(),
                ),
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "cannot read source for report hash");
                    None
                }
            });
        let Some(lines) = lines else {
            return String::new();
        };
        if line == 0 {
            return String::new();
        }
        lines
            .get(line as usize - 1)
            .cloned()
            .unwrap_or_default()
    }
}

/// Compute the identity hash of one report.
pub fn report_hash(record: &ReportRecord, mode: HashMode, cache: &mut LineCache) -> String {
    let parts = match mode {
        HashMode::ContextSensitive => context_sensitive_parts(record, cache),
        HashMode::ContextFree => context_free_parts(record),
    };
    format!("{:x}", Sha256::digest(parts.join("|").as_bytes()))
}

fn context_sensitive_parts(record: &ReportRecord, cache: &mut LineCache) -> Vec<String> {
    let mut parts = vec![
        record.file_name(),
        record.checker.clone(),
        record.message.clone(),
    ];
    for step in &record.path {
        parts.push(cache.line_text(&step.file, step.line));
        parts.push(step.column.to_string());
        parts.push(step.message.clone());
    }
    parts
}

fn context_free_parts(record: &ReportRecord) -> Vec<String> {
    vec![
        record.file_name(),
        record.checker.clone(),
        normalize_message(&record.message),
        record.function.clone().unwrap_or_default(),
    ]
}

#[allow(clippy::expect_used)]
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'[^']*'|"[^"]*""#).expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("constant regex pattern is valid"));

/// Collapse the parts of a message that vary per instance. Quoted symbol
/// names become empty quotes and digit runs become `0`, so
/// `Array index 42 is past the end` and `Array index 7 is past the end`
/// template to the same string.
fn normalize_message(message: &str) -> String {
    let without_quotes = QUOTED.replace_all(message, "''");
    NUMBERS.replace_all(&without_quotes, "0").into_owned()
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
