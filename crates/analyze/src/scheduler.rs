// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-parallel analysis execution.
//!
//! Jobs are grouped into per-source chains and drained from a shared
//! queue by a fixed set of workers, so the pool size is the only
//! parallelism knob and no two workers ever touch the same source
//! concurrently. Every job ends in exactly one of four states:
//! Success, Failed, TimedOut, Skipped. A failing action is quarantined
//! and the run continues; nothing is ever retried within a run.

use crate::config::EngineKind;
use crate::engine::{AnalyzerEngine, DiagnosticSink, EngineContext, Invocation};
use crate::failure::FailureBundle;
use crate::ledger::{self, LedgerEntry, RunLedger};
use assay_core::{BuildAction, SourceId};
use assay_report::{annotate_file, HashMode, ReportError};
use indexmap::IndexMap;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Quarantine directory name inside the output directory.
pub const FAILED_DIR: &str = "failed";
/// Capture directory name inside the output directory.
pub const SUCCESS_DIR: &str = "success";

/// Scheduler knobs, all taken from the run configuration.
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Worker pool size.
    pub jobs: usize,
    /// Per-action wall-clock budget.
    pub timeout: Option<Duration>,
    /// Keep analyzer stdout/stderr for successful actions.
    pub capture_output: bool,
    /// Report identity derivation for fingerprint annotation.
    pub hash_mode: HashMode,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        SchedulerOptions {
            jobs: 1,
            timeout: None,
            capture_output: false,
            hash_mode: HashMode::default(),
        }
    }
}

/// One unit of analysis work: an action bound to an engine.
pub struct AnalysisJob {
    pub action: BuildAction,
    pub engine: Arc<dyn AnalyzerEngine>,
}

/// Terminal state of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    Success,
    Failed { exit: Option<i32> },
    TimedOut,
    /// The ledger proved the slot current; nothing ran and the
    /// diagnostic file was left untouched.
    Skipped,
}

/// What one job produced.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub source: PathBuf,
    pub engine: EngineKind,
    pub status: AnalysisStatus,
    /// The annotated diagnostic file, when one exists.
    pub diagnostic_file: Option<PathBuf>,
    /// The quarantine bundle, on failure or timeout.
    pub failure_dir: Option<PathBuf>,
    pub duration: Duration,
}

/// Run every job through a pool of `opts.jobs` workers. Jobs sharing a
/// source run on the same worker, back to back; results arrive in
/// completion order.
pub async fn run_jobs(
    jobs: Vec<AnalysisJob>,
    ctx: Arc<EngineContext>,
    opts: SchedulerOptions,
    ledger: Arc<RunLedger>,
) -> Vec<AnalysisResult> {
    let total = jobs.len();
    if total == 0 {
        return Vec::new();
    }

    let queue = chain_by_source(jobs);
    let workers = opts.jobs.max(1).min(queue.len());
    let queue = Arc::new(Mutex::new(queue));
    let results = Arc::new(Mutex::new(Vec::with_capacity(total)));
    let opts = Arc::new(opts);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let results = Arc::clone(&results);
        let ctx = Arc::clone(&ctx);
        let opts = Arc::clone(&opts);
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            loop {
                let chain = queue.lock().pop_front();
                let Some(chain) = chain else { break };
                for job in chain {
                    let result = run_job(&job, &ctx, &opts, &ledger).await;
                    results.lock().push(result);
                }
            }
        }));
    }
    for handle in handles {
        let _ = handle.await;
    }

    let mut results = results.lock();
    std::mem::take(&mut *results)
}

/// Group jobs by source file, preserving input order. One chain is
/// handed to one worker as a unit.
fn chain_by_source(jobs: Vec<AnalysisJob>) -> VecDeque<Vec<AnalysisJob>> {
    let mut chains: IndexMap<PathBuf, Vec<AnalysisJob>> = IndexMap::new();
    for job in jobs {
        chains
            .entry(job.action.source_path().to_path_buf())
            .or_default()
            .push(job);
    }
    chains.into_values().collect()
}

async fn run_job(
    job: &AnalysisJob,
    ctx: &EngineContext,
    opts: &SchedulerOptions,
    ledger: &RunLedger,
) -> AnalysisResult {
    let action = &job.action;
    let engine = job.engine.kind();
    let source = action.source_path().to_path_buf();
    let id = SourceId::new(&source, engine.name());
    let invocation = job.engine.invocation(action, ctx);
    let command_text = invocation.command_text();

    let key = RunLedger::key(&source, engine.name());
    let command_digest = ledger::digest_text(&command_text);
    let source_digest = ledger::digest_file(&source);
    let out_file = invocation.out_file().map(Path::to_path_buf);
    let started = Instant::now();

    // Unchanged input with a surviving diagnostic file: nothing to run.
    if let (Some(out), Some(digest)) = (&out_file, &source_digest) {
        if ledger.is_current(&key, &command_digest, digest) && out.exists() {
            info!(source = %source.display(), engine = %engine, "up to date, skipping");
            return AnalysisResult {
                source,
                engine,
                status: AnalysisStatus::Skipped,
                diagnostic_file: out_file,
                failure_dir: None,
                duration: started.elapsed(),
            };
        }
    }

    let span = tracing::info_span!(
        "analyze.cmd",
        source = %source.display(),
        engine = %engine,
        exit_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );
    debug!(command = %command_text, "spawning analyzer");

    let execution = execute(&invocation, &action.directory, opts.timeout).await;
    let duration = started.elapsed();
    span.record("duration_ms", duration.as_millis() as u64);

    match execution {
        Execution::Completed(output) if output.status.success() => {
            span.record("exit_code", 0);
            let diagnostic_file = settle_success(&invocation, &id, ctx, opts, &output);
            if let (Some(_), Some(digest)) = (&diagnostic_file, source_digest) {
                ledger.record(
                    key,
                    LedgerEntry {
                        command_digest,
                        source_digest: digest,
                        diagnostic_file: id.diagnostic_file_name(),
                    },
                );
            }
            info!(source = %source.display(), engine = %engine, "analysis succeeded");
            AnalysisResult {
                source,
                engine,
                status: AnalysisStatus::Success,
                diagnostic_file,
                failure_dir: None,
                duration,
            }
        }
        Execution::Completed(output) => {
            let exit = output.status.code();
            span.record("exit_code", exit.unwrap_or(-1));
            let failure_dir = quarantine(
                ctx,
                &id,
                action,
                &command_text,
                &output.stderr,
                out_file.as_deref(),
            );
            ledger.forget(&key);
            warn!(
                source = %source.display(),
                engine = %engine,
                exit = ?exit,
                "analysis failed"
            );
            AnalysisResult {
                source,
                engine,
                status: AnalysisStatus::Failed { exit },
                diagnostic_file: None,
                failure_dir,
                duration,
            }
        }
        Execution::TimedOut => {
            let limit = opts.timeout.unwrap_or_default();
            let note = format!(
                "analysis killed after exceeding the {}s timeout\n",
                limit.as_secs()
            );
            let failure_dir = quarantine(
                ctx,
                &id,
                action,
                &command_text,
                note.as_bytes(),
                out_file.as_deref(),
            );
            ledger.forget(&key);
            warn!(source = %source.display(), engine = %engine, "analysis timed out");
            AnalysisResult {
                source,
                engine,
                status: AnalysisStatus::TimedOut,
                diagnostic_file: None,
                failure_dir,
                duration,
            }
        }
        Execution::SpawnFailed(err) => {
            let note = format!("cannot run {}: {err}\n", invocation.program);
            let failure_dir = quarantine(
                ctx,
                &id,
                action,
                &command_text,
                note.as_bytes(),
                out_file.as_deref(),
            );
            ledger.forget(&key);
            warn!(
                source = %source.display(),
                engine = %engine,
                error = %err,
                "cannot spawn analyzer"
            );
            AnalysisResult {
                source,
                engine,
                status: AnalysisStatus::Failed { exit: None },
                diagnostic_file: None,
                failure_dir,
                duration,
            }
        }
    }
}

pub(crate) enum Execution {
    Completed(std::process::Output),
    TimedOut,
    SpawnFailed(std::io::Error),
}

/// Spawn the invocation as the leader of a fresh process group and
/// wait, enforcing the timeout with a SIGKILL to the whole group.
pub(crate) async fn execute(
    invocation: &Invocation,
    directory: &Path,
    timeout: Option<Duration>,
) -> Execution {
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .current_dir(directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(source) => return Execution::SpawnFailed(source),
    };
    let pid = child.id();
    let wait = child.wait_with_output();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(outcome) => outcome,
            Err(_) => {
                // The analyzer may have forked helpers; the group id
                // equals the child pid because it became leader.
                if let Some(pid) = pid {
                    let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
                }
                return Execution::TimedOut;
            }
        },
        None => wait.await,
    };
    match outcome {
        Ok(output) => Execution::Completed(output),
        Err(source) => Execution::SpawnFailed(source),
    }
}

/// Settle a successful invocation: materialize stdout-sink
/// diagnostics, annotate fingerprints, clear any stale quarantine
/// bundle, capture output when asked to.
fn settle_success(
    invocation: &Invocation,
    id: &SourceId,
    ctx: &EngineContext,
    opts: &SchedulerOptions,
    output: &std::process::Output,
) -> Option<PathBuf> {
    let diagnostic = match &invocation.sink {
        DiagnosticSink::File(path) => path.exists().then(|| path.clone()),
        DiagnosticSink::Stdout(path) => match fs::write(path, &output.stdout) {
            Ok(()) => Some(path.clone()),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "cannot write diagnostic file");
                None
            }
        },
        DiagnosticSink::None => None,
    };

    if let Some(path) = &diagnostic {
        match annotate_file(path, opts.hash_mode) {
            Ok(_) => {}
            Err(ReportError::Malformed { .. }) => {
                // Not SARIF; the engine output passes through untouched.
                debug!(file = %path.display(), "diagnostic file is not SARIF, left unannotated");
            }
            Err(err) => warn!(error = %err, "cannot annotate diagnostic file"),
        }
    }

    // A retry that succeeds clears the slot's quarantine bundle.
    let stale_bundle = ctx.report_dir.join(FAILED_DIR).join(id.failure_dir_name());
    if stale_bundle.exists() {
        let _ = fs::remove_dir_all(&stale_bundle);
    }

    if opts.capture_output {
        let capture_dir = ctx.report_dir.join(SUCCESS_DIR);
        if let Err(err) = fs::create_dir_all(&capture_dir) {
            warn!(dir = %capture_dir.display(), error = %err, "cannot create capture directory");
        } else {
            let stem = id.capture_stem();
            for (suffix, bytes) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
                let path = capture_dir.join(format!("{stem}.{suffix}.txt"));
                if let Err(err) = fs::write(&path, bytes) {
                    warn!(file = %path.display(), error = %err, "cannot write capture file");
                }
            }
        }
    }

    diagnostic
}

/// Quarantine a failed slot: drop its stale diagnostic, write the
/// bundle. Bundle write problems degrade to a warning; the failure
/// status itself is already decided.
fn quarantine(
    ctx: &EngineContext,
    id: &SourceId,
    action: &BuildAction,
    command_text: &str,
    stderr: &[u8],
    stale_diagnostic: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = stale_diagnostic {
        let _ = fs::remove_file(path);
    }
    let failed_dir = ctx.report_dir.join(FAILED_DIR);
    if let Err(err) = fs::create_dir_all(&failed_dir) {
        warn!(dir = %failed_dir.display(), error = %err, "cannot create quarantine directory");
        return None;
    }
    match FailureBundle::write(&failed_dir, id, action, command_text, stderr) {
        Ok(bundle) => Some(bundle.dir),
        Err(err) => {
            warn!(error = %err, "cannot write failure bundle");
            None
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
