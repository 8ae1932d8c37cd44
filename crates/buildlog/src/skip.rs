// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source skip lists.
//!
//! A skip file holds one rule per line: `-<glob>` excludes matching
//! sources from analysis, `+<glob>` re-includes them. The first
//! matching rule wins; unmatched sources are analyzed. Blank lines and
//! `#` comments are ignored.

use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or parsing a skip file.
#[derive(Debug, Error)]
pub enum SkipError {
    /// The skip file could not be read.
    #[error("cannot read skip file {path}: {source}")]
    Read {
        /// Path to the skip file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rule line does not start with `+` or `-`.
    #[error("skip file line {line} must start with '+' or '-': {text:?}")]
    BadRule {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A rule's glob pattern does not compile.
    #[error("invalid glob on skip file line {line}: {source}")]
    BadPattern {
        /// 1-based line number.
        line: usize,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Include,
    Exclude,
}

#[derive(Debug)]
struct SkipRule {
    kind: RuleKind,
    pattern: Pattern,
}

/// An ordered list of include/exclude rules over source paths.
#[derive(Debug, Default)]
pub struct SkipFilter {
    rules: Vec<SkipRule>,
}

impl SkipFilter {
    /// Parse skip rules from a file.
    pub fn from_file(path: &Path) -> Result<Self, SkipError> {
        let text = fs::read_to_string(path).map_err(|source| SkipError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse skip rules from text.
    pub fn parse(text: &str) -> Result<Self, SkipError> {
        let mut rules = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (kind, pattern_text) = if let Some(rest) = line.strip_prefix('+') {
                (RuleKind::Include, rest)
            } else if let Some(rest) = line.strip_prefix('-') {
                (RuleKind::Exclude, rest)
            } else {
                return Err(SkipError::BadRule {
                    line: number + 1,
                    text: line.to_string(),
                });
            };
            let pattern =
                Pattern::new(pattern_text.trim()).map_err(|source| SkipError::BadPattern {
                    line: number + 1,
                    source,
                })?;
            rules.push(SkipRule { kind, pattern });
        }
        Ok(Self { rules })
    }

    /// True when `source` must not be analyzed. First matching rule
    /// decides.
    pub fn should_skip(&self, source: &Path) -> bool {
        // `*` crosses directory separators here, like editors and
        // build tools treat skip globs.
        let options = MatchOptions {
            require_literal_separator: false,
            ..MatchOptions::new()
        };
        for rule in &self.rules {
            if rule.pattern.matches_path_with(source, options) {
                return rule.kind == RuleKind::Exclude;
            }
        }
        false
    }

    /// True when no rules were configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[path = "skip_tests.rs"]
mod tests;
