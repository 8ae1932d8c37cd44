// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for analysis orchestration.

use assay_buildlog::{DedupeError, LogError, SkipError};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems.
///
/// Every variant aborts the run before a single analyzer is dispatched;
/// the process exits with code 2 and the output tree carries no partial
/// analysis results.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The output tree could not be created or cleaned.
    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        /// The directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compilation database could not be loaded, or a mandatory
    /// artifact could not be written.
    #[error(transparent)]
    BuildLog(#[from] LogError),

    /// The uniqueing policy rejected the action set.
    #[error(transparent)]
    Uniqueing(#[from] DedupeError),

    /// The skip list could not be loaded or parsed.
    #[error(transparent)]
    Skip(#[from] SkipError),

    /// Cross-TU analysis over an action set that still contains
    /// duplicated sources. The external definition map needs exactly
    /// one translation unit per source file.
    #[error(
        "cross-TU analysis needs one action per source file, but {count} source(s) \
         have several; pick a uniqueing policy other than 'none'"
    )]
    CtuDuplicateSources {
        /// How many sources have more than one action.
        count: usize,
    },

    /// Analyze-only CTU run without artifacts from an earlier collect.
    #[error("CTU artifact directory {dir} is missing or was never merged; run the collect phase first")]
    CtuArtifactsMissing {
        /// The expected artifact directory.
        dir: PathBuf,
    },

    /// A CTU artifact could not be written during the collect phase.
    #[error("cannot write CTU artifact {path}: {source}")]
    CtuWrite {
        /// The artifact that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to an analyzer executable outside a scheduled
/// analysis: checker catalog listing and similar one-off queries.
/// Scheduled analyses report through `AnalysisStatus` instead, so a
/// broken action never surfaces as an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        /// The binary as invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine exited nonzero while listing its checkers.
    #[error("{program} exited with code {code:?} while listing checkers")]
    CheckerList {
        /// The binary as invoked.
        program: String,
        /// Exit code, if the process exited at all.
        code: Option<i32>,
    },
}
