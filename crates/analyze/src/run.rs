// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The analysis pipeline, end to end.
//!
//! Wires the stages together in their fixed order: load, parse, skip,
//! unique, enrich, validate checkers, optionally collect CTU
//! artifacts, schedule, settle artifacts. Configuration problems abort
//! before the first analyzer is dispatched; everything after that
//! degrades per action.

use crate::checkers;
use crate::config::{AnalyzeConfig, CtuPhase, EngineKind};
use crate::ctu::{self, CtuOrchestrator};
use crate::engine::{AnalyzerEngine, ClangSa, ClangTidy, EngineContext};
use crate::error::ConfigError;
use crate::ledger::RunLedger;
use crate::scheduler::{self, AnalysisJob, AnalysisResult, AnalysisStatus, SchedulerOptions};
use assay_buildlog::{compdb, dedupe, parse_all, CompilerInfoCache, ProbeOptions, SkipFilter};
use assay_core::BuildAction;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Probed compiler configuration snapshot inside the output directory.
pub const COMPILER_INFO_FILE: &str = "compiler_info.json";
/// Uniqueing audit artifact inside the output directory.
pub const UNIQUE_COMMANDS_FILE: &str = "unique_compile_commands.json";

/// Tally of one finished run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Jobs handed to the scheduler (actions × engines).
    pub scheduled: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub skipped: usize,
    /// Records the parser had to drop.
    pub parse_failures: usize,
    /// Actions the CTU collect phase could not capture.
    pub collect_failures: usize,
    /// Checker toggle names that matched nothing in any engine catalog.
    pub unknown_checkers: Vec<String>,
    pub results: Vec<AnalysisResult>,
}

impl RunSummary {
    /// Exit code for the finished run: 3 when at least one analysis
    /// failed or timed out, otherwise 0. Configuration errors abort
    /// earlier and exit 2 without a summary.
    pub fn exit_code(&self) -> i32 {
        if self.failed + self.timed_out > 0 {
            3
        } else {
            0
        }
    }
}

/// Run one full analysis.
pub async fn run_analysis(config: AnalyzeConfig) -> Result<RunSummary, ConfigError> {
    prepare_output_dir(&config)?;

    let records = compdb::load(&config.compile_commands)?;
    let (mut actions, parse_failures) = parse_all(&records, &config.parser);

    if let Some(path) = &config.skip_file {
        let filter = SkipFilter::from_file(path)?;
        let before = actions.len();
        actions.retain(|action| !filter.should_skip(action.source_path()));
        info!(excluded = before - actions.len(), "skip list applied");
    }

    let actions = dedupe(actions, &config.uniqueing)?;
    dedupe::write_unique_commands(&actions, &config.output_dir.join(UNIQUE_COMMANDS_FILE))?;

    let mut actions: Vec<BuildAction> = actions
        .into_iter()
        .filter(BuildAction::is_analyzable)
        .collect();
    debug!(actions = actions.len(), "analyzable actions");

    let mut orchestrator = config
        .ctu
        .map(|phase| CtuOrchestrator::new(&config.output_dir, phase));
    if let Some(orch) = &mut orchestrator {
        if !config.uniqueing.guarantees_unique_sources() {
            ctu::ensure_unique_sources(&actions)?;
        }
        orch.prepare()?;
    }

    let probe = ProbeOptions {
        skip_gcc_fix_headers: config.skip_gcc_fix_headers,
    };
    let cache = match &config.compiler_info_file {
        Some(path) => CompilerInfoCache::with_overrides(probe, path)?,
        None => CompilerInfoCache::new(probe),
    };
    cache.enrich_actions(&mut actions).await;
    if let Err(err) = cache.save(&config.output_dir.join(COMPILER_INFO_FILE)) {
        warn!(error = %err, "cannot save compiler info snapshot");
    }

    let (engines, sa, unknown_checkers) = configure_engines(&config).await;

    let mut collect_failures = 0;
    if let Some(orch) = &mut orchestrator {
        if matches!(orch.phase(), CtuPhase::Collect | CtuPhase::Both) {
            let stats = orch
                .collect(&actions, &sa, config.jobs, config.timeout)
                .await?;
            collect_failures = stats.failures;
        }
        if orch.phase() == CtuPhase::Collect {
            orch.finish();
            info!(collect_failures, "collect-only run finished");
            return Ok(RunSummary {
                parse_failures: parse_failures.len(),
                collect_failures,
                unknown_checkers,
                ..RunSummary::default()
            });
        }
    }

    let ctx = Arc::new(EngineContext {
        report_dir: config.output_dir.clone(),
        z3: config.z3,
        ctu_dir: orchestrator
            .as_ref()
            .and_then(|orch| orch.analysis_dir().map(Path::to_path_buf)),
    });
    if let Some(orch) = &mut orchestrator {
        orch.begin_analysis();
    }

    let mut jobs = Vec::with_capacity(actions.len() * engines.len());
    for action in &actions {
        for engine in &engines {
            jobs.push(AnalysisJob {
                action: action.clone(),
                engine: Arc::clone(engine),
            });
        }
    }

    let ledger = Arc::new(RunLedger::load(&config.output_dir));
    let opts = SchedulerOptions {
        jobs: config.jobs,
        timeout: config.timeout,
        capture_output: config.capture_output,
        hash_mode: config.hash_mode,
    };
    let results = scheduler::run_jobs(jobs, ctx, opts, Arc::clone(&ledger)).await;

    if let Err(err) = ledger.save(&config.output_dir) {
        warn!(error = %err, "cannot save run ledger");
    }
    if let Some(orch) = &mut orchestrator {
        orch.finish();
    }

    let mut summary = RunSummary {
        scheduled: results.len(),
        parse_failures: parse_failures.len(),
        collect_failures,
        unknown_checkers,
        results,
        ..RunSummary::default()
    };
    for result in &summary.results {
        match result.status {
            AnalysisStatus::Success => summary.succeeded += 1,
            AnalysisStatus::Failed { .. } => summary.failed += 1,
            AnalysisStatus::TimedOut => summary.timed_out += 1,
            AnalysisStatus::Skipped => summary.skipped += 1,
        }
    }
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        timed_out = summary.timed_out,
        skipped = summary.skipped,
        "analysis run finished"
    );
    Ok(summary)
}

fn prepare_output_dir(config: &AnalyzeConfig) -> Result<(), ConfigError> {
    let wrap = |source| ConfigError::OutputDir {
        path: config.output_dir.clone(),
        source,
    };
    if config.clean && config.output_dir.exists() {
        fs::remove_dir_all(&config.output_dir).map_err(wrap)?;
    }
    fs::create_dir_all(&config.output_dir).map_err(wrap)
}

/// Build the engine adapters and hand each its validated checker view.
///
/// A catalog that cannot be listed (broken or absent binary) skips
/// validation for the whole run rather than dropping toggles the
/// engine might know; the aggregated unknown-name warning only fires
/// when every requested engine produced a catalog.
async fn configure_engines(
    config: &AnalyzeConfig,
) -> (Vec<Arc<dyn AnalyzerEngine>>, ClangSa, Vec<String>) {
    let mut sa = ClangSa::new(
        config
            .clangsa_binary
            .clone()
            .unwrap_or_else(|| "clang".to_string()),
    );
    let mut tidy = ClangTidy::new(
        config
            .tidy_binary
            .clone()
            .unwrap_or_else(|| "clang-tidy".to_string()),
    );

    let mut catalogs: Vec<Vec<String>> = Vec::new();
    let mut catalog_missing = false;

    if !config.checkers.is_empty() {
        for kind in &config.engines {
            let listed = match kind {
                EngineKind::ClangSa => sa.checkers().await,
                EngineKind::Tidy => tidy.checkers().await,
            };
            match listed {
                Ok(catalog) => {
                    let view = checkers::for_catalog(&config.checkers, &catalog);
                    match kind {
                        EngineKind::ClangSa => sa.checkers = view,
                        EngineKind::Tidy => tidy.checkers = view,
                    }
                    catalogs.push(catalog);
                }
                Err(err) => {
                    warn!(engine = %kind, error = %err, "cannot list checkers, skipping validation");
                    match kind {
                        EngineKind::ClangSa => sa.checkers = config.checkers.clone(),
                        EngineKind::Tidy => tidy.checkers = config.checkers.clone(),
                    }
                    catalog_missing = true;
                }
            }
        }
    }

    let unknown: Vec<String> = if catalog_missing || config.checkers.is_empty() {
        Vec::new()
    } else {
        checkers::unknown_names(&config.checkers, &catalogs)
            .into_iter()
            .map(String::from)
            .collect()
    };
    if !unknown.is_empty() {
        warn!(
            "No checker(s) with these names was found: {}",
            unknown.join(", ")
        );
    }

    let engines: Vec<Arc<dyn AnalyzerEngine>> = config
        .engines
        .iter()
        .map(|kind| match kind {
            EngineKind::ClangSa => Arc::new(sa.clone()) as Arc<dyn AnalyzerEngine>,
            EngineKind::Tidy => Arc::new(tidy.clone()) as Arc<dyn AnalyzerEngine>,
        })
        .collect();

    (engines, sa, unknown)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
