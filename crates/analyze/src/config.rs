// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run configuration for the analysis pipeline.

use crate::checkers::CheckerToggle;
use assay_buildlog::ParserOptions;
use assay_core::UniqueingPolicy;
use assay_report::HashMode;
use std::path::PathBuf;
use std::time::Duration;

/// Which analyzer engine an action is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// The Clang static analyzer (`clang --analyze`).
    ClangSa,
    /// The lint-style checker (`clang-tidy`).
    Tidy,
}

impl EngineKind {
    /// Parse the CLI spelling.
    pub fn parse(value: &str) -> Option<EngineKind> {
        match value {
            "clangsa" => Some(EngineKind::ClangSa),
            "tidy" | "clang-tidy" => Some(EngineKind::Tidy),
            _ => None,
        }
    }

    /// Short name, used in output file names and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::ClangSa => "clangsa",
            EngineKind::Tidy => "tidy",
        }
    }
}

assay_core::simple_display! {
    EngineKind {
        ClangSa => "clangsa",
        Tidy => "tidy",
    }
}

/// Which cross-TU phases one run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtuPhase {
    /// Generate artifacts, analyze against them, then drop them.
    Both,
    /// Generate and keep artifacts; no analysis.
    Collect,
    /// Analyze against artifacts produced by an earlier collect run.
    Analyze,
}

/// Everything one analysis run needs.
///
/// Built by the CLI from arguments and `assay.toml`, or directly by
/// tests. The pipeline never reads configuration from anywhere else.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// The compilation database to interpret.
    pub compile_commands: PathBuf,
    /// Report directory; created if missing.
    pub output_dir: PathBuf,
    /// Worker pool size. The only parallelism knob.
    pub jobs: usize,
    /// Per-action wall-clock budget; the whole process group is killed
    /// when it runs out.
    pub timeout: Option<Duration>,
    /// Engines to dispatch every action to, in the given order.
    pub engines: Vec<EngineKind>,
    /// Checker toggles in specification order; later entries override
    /// earlier ones inside the engine.
    pub checkers: Vec<CheckerToggle>,
    /// Cross-TU phases, when requested.
    pub ctu: Option<CtuPhase>,
    /// How duplicate actions per source are resolved.
    pub uniqueing: UniqueingPolicy,
    /// Report identity derivation.
    pub hash_mode: HashMode,
    /// Skip list file with `+`/`-` glob lines.
    pub skip_file: Option<PathBuf>,
    /// Pre-computed compiler info; listed keys are never probed.
    pub compiler_info_file: Option<PathBuf>,
    /// Keep analyzer stdout/stderr for successful actions.
    pub capture_output: bool,
    /// Drop previous results instead of analyzing incrementally.
    pub clean: bool,
    /// Use the Z3 constraint solver where the engine supports it.
    pub z3: bool,
    /// Drop GCC `include-fixed` directories from probed includes.
    pub skip_gcc_fix_headers: bool,
    /// Build command interpretation knobs.
    pub parser: ParserOptions,
    /// Engine binary overrides, e.g. a specific clang build.
    pub clangsa_binary: Option<String>,
    pub tidy_binary: Option<String>,
}

impl AnalyzeConfig {
    /// A single-threaded ClangSA run with defaults everywhere else.
    pub fn new(compile_commands: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        AnalyzeConfig {
            compile_commands: compile_commands.into(),
            output_dir: output_dir.into(),
            jobs: 1,
            timeout: None,
            engines: vec![EngineKind::ClangSa],
            checkers: Vec::new(),
            ctu: None,
            uniqueing: UniqueingPolicy::default(),
            hash_mode: HashMode::default(),
            skip_file: None,
            compiler_info_file: None,
            capture_output: false,
            clean: false,
            z3: false,
            skip_gcc_fix_headers: false,
            parser: ParserOptions::default(),
            clangsa_binary: None,
            tidy_binary: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
