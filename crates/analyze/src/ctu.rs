// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-translation-unit orchestration.
//!
//! CTU analysis runs two strictly ordered phases over one action set:
//! every action is collected (AST artifact plus external-definition
//! mapping lines) before any action is analyzed against the merged
//! map. The artifact directory lives inside the output tree; whether
//! it outlives the run depends on the requested mode. Collection
//! failures are recorded per action and never block the phase
//! boundary.

use crate::config::CtuPhase;
use crate::engine::ClangSa;
use crate::error::ConfigError;
use crate::scheduler::{execute, Execution};
use assay_core::BuildAction;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Artifact directory name inside the output directory.
pub const CTU_DIR: &str = "ctu-dir";
/// Merged symbol-to-AST index consumed by the analyzer.
pub const EXTDEF_MAP_FILE: &str = "externalDefMap.txt";

/// Lifecycle of the artifact directory across one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtuState {
    Idle,
    Collecting,
    CollectDone,
    Analyzing,
    Done,
}

/// What the collect phase got through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Actions whose AST and mapping both landed.
    pub collected: usize,
    /// Actions that failed either step; recorded, never fatal.
    pub failures: usize,
}

/// Drives the collect and analyze phases for one run.
#[derive(Debug)]
pub struct CtuOrchestrator {
    phase: CtuPhase,
    dir: PathBuf,
    state: CtuState,
}

impl CtuOrchestrator {
    pub fn new(output_dir: &Path, phase: CtuPhase) -> CtuOrchestrator {
        CtuOrchestrator {
            phase,
            dir: output_dir.join(CTU_DIR),
            state: CtuState::Idle,
        }
    }

    pub fn phase(&self) -> CtuPhase {
        self.phase
    }

    pub fn state(&self) -> CtuState {
        self.state
    }

    /// The artifact directory, whether or not it exists yet.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check preconditions and prepare the artifact directory.
    ///
    /// Analyze-only runs against artifacts from an earlier collect; a
    /// missing or never-merged directory is a configuration error, not
    /// a per-action failure. Collecting modes start from a clean
    /// directory so stale artifacts never mix into the new map.
    pub fn prepare(&mut self) -> Result<(), ConfigError> {
        match self.phase {
            CtuPhase::Analyze => {
                if !self.dir.join(EXTDEF_MAP_FILE).is_file() {
                    return Err(ConfigError::CtuArtifactsMissing {
                        dir: self.dir.clone(),
                    });
                }
                self.state = CtuState::CollectDone;
            }
            CtuPhase::Collect | CtuPhase::Both => {
                let wrap = |source| ConfigError::OutputDir {
                    path: self.dir.clone(),
                    source,
                };
                if self.dir.exists() {
                    fs::remove_dir_all(&self.dir).map_err(wrap)?;
                }
                fs::create_dir_all(self.dir.join("ast")).map_err(wrap)?;
            }
        }
        Ok(())
    }

    /// Run the collect phase over every action, bounded by `jobs`
    /// workers, then merge the external definition map. Returns once
    /// every action has either collected or had its failure recorded.
    pub async fn collect(
        &mut self,
        actions: &[BuildAction],
        engine: &ClangSa,
        jobs: usize,
        timeout: Option<Duration>,
    ) -> Result<CollectStats, ConfigError> {
        self.state = CtuState::Collecting;

        let queue: VecDeque<BuildAction> = actions.iter().filter(|a| a.is_analyzable()).cloned().collect();
        let total = queue.len();
        let workers = jobs.max(1).min(total.max(1));
        let queue = Arc::new(Mutex::new(queue));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let engine = engine.clone();
            let dir = self.dir.clone();
            handles.push(tokio::spawn(async move {
                let mut entries: Vec<(String, String)> = Vec::new();
                let mut failures = 0usize;
                loop {
                    let action = queue.lock().pop_front();
                    let Some(action) = action else { break };
                    match collect_action(&action, &engine, &dir, timeout).await {
                        Ok(mut lines) => entries.append(&mut lines),
                        Err(()) => failures += 1,
                    }
                }
                (entries, failures)
            }));
        }

        let mut merged: Vec<(String, String)> = Vec::new();
        let mut failures = 0usize;
        for handle in handles {
            if let Ok((entries, worker_failures)) = handle.await {
                merged.extend(entries);
                failures += worker_failures;
            }
        }

        self.merge_map(merged)?;
        self.state = CtuState::CollectDone;

        let stats = CollectStats {
            collected: total - failures,
            failures,
        };
        info!(
            collected = stats.collected,
            failures = stats.failures,
            dir = %self.dir.display(),
            "CTU collect phase finished"
        );
        Ok(stats)
    }

    /// Write `externalDefMap.txt`: one `<symbol> <ast path>` line per
    /// symbol, sorted, first mapping wins for duplicated symbols.
    fn merge_map(&self, mut entries: Vec<(String, String)>) -> Result<(), ConfigError> {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|a, b| a.0 == b.0);

        let mut text = String::new();
        for (symbol, ast_path) in &entries {
            text.push_str(symbol);
            text.push(' ');
            text.push_str(ast_path);
            text.push('\n');
        }
        let path = self.dir.join(EXTDEF_MAP_FILE);
        fs::write(&path, text).map_err(|source| ConfigError::CtuWrite { path, source })
    }

    /// The artifact directory to inject into analysis invocations, for
    /// runs that analyze.
    pub fn analysis_dir(&self) -> Option<&Path> {
        match self.phase {
            CtuPhase::Analyze | CtuPhase::Both => Some(&self.dir),
            CtuPhase::Collect => None,
        }
    }

    pub fn begin_analysis(&mut self) {
        self.state = CtuState::Analyzing;
    }

    /// Mark the run finished. Both-mode artifacts are ephemeral and
    /// removed here; collect-only artifacts are the product and stay.
    pub fn finish(&mut self) {
        if self.phase == CtuPhase::Both {
            if let Err(err) = fs::remove_dir_all(&self.dir) {
                warn!(dir = %self.dir.display(), error = %err, "cannot remove CTU artifacts");
            }
        }
        self.state = CtuState::Done;
    }
}

/// Collect one action: dump its AST under `ast/`, then map its
/// external definitions. Either step failing fails the action.
async fn collect_action(
    action: &BuildAction,
    engine: &ClangSa,
    ctu_dir: &Path,
    timeout: Option<Duration>,
) -> Result<Vec<(String, String)>, ()> {
    let source = action.source_path();
    let ast_file = ClangSa::ast_path(ctu_dir, source);
    if let Some(parent) = ast_file.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(source = %source.display(), error = %err, "cannot create AST directory");
            return Err(());
        }
    }

    let dump = engine.ast_dump_invocation(action, ctu_dir);
    match execute(&dump, &action.directory, timeout).await {
        Execution::Completed(output) if output.status.success() => {}
        Execution::Completed(output) => {
            warn!(
                source = %source.display(),
                exit = ?output.status.code(),
                "AST dump failed"
            );
            return Err(());
        }
        Execution::TimedOut => {
            warn!(source = %source.display(), "AST dump timed out");
            return Err(());
        }
        Execution::SpawnFailed(err) => {
            warn!(source = %source.display(), error = %err, "cannot run AST dump");
            return Err(());
        }
    }

    let mapping = engine.extdef_invocation(action);
    let output = match execute(&mapping, &action.directory, timeout).await {
        Execution::Completed(output) if output.status.success() => output,
        Execution::Completed(output) => {
            warn!(
                source = %source.display(),
                exit = ?output.status.code(),
                "external definition mapping failed"
            );
            return Err(());
        }
        Execution::TimedOut => {
            warn!(source = %source.display(), "external definition mapping timed out");
            return Err(());
        }
        Execution::SpawnFailed(err) => {
            warn!(source = %source.display(), error = %err, "cannot run external definition mapping");
            return Err(());
        }
    };

    let text = String::from_utf8_lossy(&output.stdout);
    let entries = parse_mapping_lines(&text);
    debug!(source = %source.display(), symbols = entries.len(), "collected");
    Ok(entries)
}

/// Parse `<symbol> <source path>` mapping lines, rewriting each path
/// to the AST artifact the analyzer will load.
fn parse_mapping_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let (symbol, path) = line.trim().rsplit_once(' ')?;
            Some((symbol.to_string(), ast_map_path(Path::new(path))))
        })
        .collect()
}

/// The map value: the AST artifact path relative to the CTU dir, e.g.
/// `ast/home/user/a.cpp.ast`.
fn ast_map_path(source: &Path) -> String {
    let mut text = String::from("ast");
    let path = source.display().to_string();
    if !path.starts_with('/') {
        text.push('/');
    }
    text.push_str(&path);
    text.push_str(".ast");
    text
}

/// CTU needs exactly one action per source; under the `none` policy
/// the set may legitimately carry duplicates, which is a configuration
/// error here.
pub fn ensure_unique_sources(actions: &[BuildAction]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    for action in actions {
        if let Some(source) = &action.source {
            if !seen.insert(source) {
                duplicated.insert(source.clone());
            }
        }
    }
    if duplicated.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::CtuDuplicateSources {
            count: duplicated.len(),
        })
    }
}

#[cfg(test)]
#[path = "ctu_tests.rs"]
mod tests;
