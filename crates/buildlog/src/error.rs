// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for compilation database interpretation.

use crate::tokenize::TokenizeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading a compilation database or its side artifacts.
#[derive(Debug, Error)]
pub enum LogError {
    /// The database file could not be read.
    #[error("cannot read compilation database {path}: {source}")]
    Read {
        /// Path to the database file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The database file is not valid JSON of the expected shape.
    #[error("malformed compilation database {path}: {source}")]
    Malformed {
        /// Path to the database file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An artifact could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Path to the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Per-record parse failures. One bad record is skipped and reported;
/// it never aborts the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The record's command string is empty.
    #[error("record for {file:?} has an empty command")]
    EmptyCommand {
        /// The record's file field.
        file: String,
    },

    /// The command string could not be split into words.
    #[error("cannot tokenize command: {source}")]
    Tokenize {
        /// Underlying tokenizer error.
        #[source]
        source: TokenizeError,
        /// The offending command.
        command: String,
    },

    /// A compile or preprocess action without a usable source file.
    #[error("no source file in record: {command}")]
    MissingSource {
        /// The offending command.
        command: String,
    },

    /// The record is not a compilation relevant to analysis
    /// (assembler input, unsupported explicit language).
    #[error("record is not a compilation: {command}")]
    NotCompilation {
        /// The offending command.
        command: String,
    },
}

/// Fatal uniqueing failures. These abort the run before any analyzer
/// is dispatched.
#[derive(Debug, Error)]
pub enum DedupeError {
    /// Strict policy: at least one source file has conflicting actions.
    #[error("duplicate build actions for {} source file(s):\n{}", conflicts.len(), format_conflicts(conflicts))]
    DuplicateSources {
        /// Source path and every conflicting command, in input order.
        conflicts: Vec<(PathBuf, Vec<String>)>,
    },

    /// Regex policy: the pattern selected zero or several actions for
    /// a duplicated source.
    #[error("uniqueing pattern matched {matched} action(s) for {source_file}, expected exactly 1")]
    AmbiguousMatch {
        /// The duplicated source file.
        source_file: PathBuf,
        /// How many of its actions matched the pattern.
        matched: usize,
    },

    /// Regex policy: the pattern itself does not compile.
    #[error("invalid uniqueing pattern {pattern:?}: {source}")]
    BadPattern {
        /// The pattern as given.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

fn format_conflicts(conflicts: &[(PathBuf, Vec<String>)]) -> String {
    let mut out = String::new();
    for (source, commands) in conflicts {
        out.push_str(&format!("  {}\n", source.display()));
        for command in commands {
            out.push_str(&format!("    {command}\n"));
        }
    }
    out
}
