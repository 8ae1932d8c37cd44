// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compilation database loading.
//!
//! The database is the JSON array produced by build interception or
//! CMake's `CMAKE_EXPORT_COMPILE_COMMANDS`: one record per compiler
//! invocation with `directory`, `command` (or `arguments`) and `file`.

use crate::error::LogError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One recorded compiler invocation, command in single-string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationRecord {
    /// Working directory of the invocation.
    pub directory: PathBuf,
    /// The full command with shell quoting intact.
    pub command: String,
    /// The translation unit the record is about.
    pub file: String,
}

#[derive(Deserialize)]
struct RawRecord {
    directory: PathBuf,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
    file: String,
}

/// Load a compilation database. Records in `arguments` array form are
/// normalized to a quoted command string.
pub fn load(path: &Path) -> Result<Vec<CompilationRecord>, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Vec<RawRecord> = serde_json::from_str(&text).map_err(|source| LogError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(raw
        .into_iter()
        .map(|r| {
            let command = match (r.command, r.arguments) {
                (Some(command), _) => command,
                (None, Some(arguments)) => join_words(&arguments),
                (None, None) => String::new(),
            };
            CompilationRecord {
                directory: r.directory,
                command,
                file: r.file,
            }
        })
        .collect())
}

/// Join argv-style words back into one command string, quoting words
/// the tokenizer would otherwise split.
pub fn join_words(words: &[String]) -> String {
    let mut out = String::new();
    for word in words {
        if !out.is_empty() {
            out.push(' ');
        }
        if word.is_empty() || word.chars().any(|c| c.is_whitespace() || "'\"\\".contains(c)) {
            out.push('\'');
            out.push_str(&word.replace('\'', r"'\''"));
            out.push('\'');
        } else {
            out.push_str(word);
        }
    }
    out
}

#[cfg(test)]
#[path = "compdb_tests.rs"]
mod tests;
