// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for diagnostic file handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing SARIF diagnostic files.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The diagnostic file could not be read.
    #[error("cannot read diagnostic file {path}: {source}")]
    Read {
        /// Path to the diagnostic file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The diagnostic file is not SARIF of the expected shape.
    #[error("malformed diagnostic file {path}: {source}")]
    Malformed {
        /// Path to the diagnostic file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The annotated diagnostic file could not be written back.
    #[error("cannot write diagnostic file {path}: {source}")]
    Write {
        /// Path to the diagnostic file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
