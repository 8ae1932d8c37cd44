// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Uniqueing of duplicate build actions.
//!
//! A source file compiled for several build targets shows up once per
//! target in the database. Cross-translation-unit analysis needs
//! exactly one action per source, and even plain analysis usually
//! wants one. The policy decides which action survives; Strict and
//! Regex turn unresolved duplication into a hard error before any
//! analyzer runs.

use crate::error::{DedupeError, LogError};
use assay_core::{BuildAction, UniqueingPolicy};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Apply the uniqueing policy. Survivors keep their input order.
/// Actions without a source (links) never participate in grouping.
pub fn dedupe(
    actions: Vec<BuildAction>,
    policy: &UniqueingPolicy,
) -> Result<Vec<BuildAction>, DedupeError> {
    if matches!(policy, UniqueingPolicy::None) {
        return Ok(actions);
    }

    let mut groups: IndexMap<PathBuf, Vec<usize>> = IndexMap::new();
    for (i, action) in actions.iter().enumerate() {
        if let Some(source) = &action.source {
            groups.entry(source.clone()).or_default().push(i);
        }
    }

    let mut keep = vec![true; actions.len()];
    match policy {
        UniqueingPolicy::None => {}
        UniqueingPolicy::Strict => {
            let conflicts: Vec<(PathBuf, Vec<String>)> = groups
                .iter()
                .filter(|(_, indices)| indices.len() > 1)
                .map(|(source, indices)| {
                    let commands = indices
                        .iter()
                        .map(|&i| actions[i].original_command.clone())
                        .collect();
                    (source.clone(), commands)
                })
                .collect();
            if !conflicts.is_empty() {
                return Err(DedupeError::DuplicateSources { conflicts });
            }
        }
        UniqueingPolicy::Alpha => {
            for indices in groups.values() {
                if indices.len() < 2 {
                    continue;
                }
                let winner = indices
                    .iter()
                    .copied()
                    .min_by_key(|&i| output_key(&actions[i]))
                    .unwrap_or(indices[0]);
                for &i in indices {
                    keep[i] = i == winner;
                }
            }
        }
        UniqueingPolicy::Regex(pattern) => {
            let re = Regex::new(pattern).map_err(|source| DedupeError::BadPattern {
                pattern: pattern.clone(),
                source,
            })?;
            for (source, indices) in &groups {
                if indices.len() < 2 {
                    continue;
                }
                let matched: Vec<usize> = indices
                    .iter()
                    .copied()
                    .filter(|&i| re.is_match(&actions[i].original_command))
                    .collect();
                if matched.len() != 1 {
                    return Err(DedupeError::AmbiguousMatch {
                        source_file: source.clone(),
                        matched: matched.len(),
                    });
                }
                let winner = matched[0];
                for &i in indices {
                    keep[i] = i == winner;
                }
            }
        }
    }

    let total = actions.len();
    let kept: Vec<BuildAction> = actions
        .into_iter()
        .zip(keep)
        .filter_map(|(action, k)| k.then_some(action))
        .collect();
    debug!(total, kept = kept.len(), policy = %policy, "uniqued build actions");
    Ok(kept)
}

/// Alpha uniqueing sorts by the output identifier; an action without
/// `-o` sorts before every named output.
fn output_key(action: &BuildAction) -> String {
    action
        .output
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Serialize)]
struct UniqueRecord<'a> {
    directory: &'a Path,
    command: &'a str,
    file: String,
}

/// Write the post-uniqueing action set for audit, in compilation
/// database shape.
pub fn write_unique_commands(actions: &[BuildAction], path: &Path) -> Result<(), LogError> {
    let records: Vec<UniqueRecord<'_>> = actions
        .iter()
        .map(|action| UniqueRecord {
            directory: &action.directory,
            command: &action.original_command,
            file: action
                .source
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&records).map_err(|source| LogError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(source),
    })?;
    fs::write(path, json).map_err(|source| LogError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod tests;
