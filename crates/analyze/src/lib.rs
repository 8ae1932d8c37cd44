// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! assay-analyze: analysis orchestration.
//!
//! Takes the normalized [`BuildAction`](assay_core::BuildAction)s produced
//! by `assay-buildlog` and runs static analyzers over them: engine
//! adapters build the invocations, a bounded worker pool executes them
//! with timeout and capture, failures are quarantined as on-disk bundles,
//! and cross-TU analysis coordinates its two phases over the same
//! machinery.

pub mod checkers;
pub mod config;
pub mod ctu;
pub mod engine;
pub mod error;
pub mod failure;
pub mod ledger;
pub mod run;
pub mod scheduler;

pub use checkers::CheckerToggle;
pub use config::{AnalyzeConfig, CtuPhase, EngineKind};
pub use ctu::{CtuOrchestrator, CtuState};
pub use engine::{AnalyzerEngine, ClangSa, ClangTidy, EngineContext, Invocation};
pub use error::{ConfigError, EngineError};
pub use ledger::RunLedger;
pub use run::{run_analysis, RunSummary};
pub use scheduler::{AnalysisJob, AnalysisResult, AnalysisStatus, SchedulerOptions};
