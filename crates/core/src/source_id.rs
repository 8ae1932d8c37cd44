// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable per-source identifiers for output-tree partitioning.
//!
//! Every analyzed source owns a distinct slice of the report directory so
//! concurrent workers never touch the same file and re-running one source
//! overwrites only its own artifacts.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Short stable digest of an absolute source path.
///
/// Two sources with the same file name in different directories must not
/// collide in the flat output tree, so the full path participates.
pub fn source_path_hash(source: &Path) -> String {
    let digest = format!("{:x}", Sha256::digest(source.to_string_lossy().as_bytes()));
    digest[..12].to_string()
}

/// Identity of one (source file, analyzer engine) output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceId {
    stem: String,
    engine: String,
    path_hash: String,
}

impl SourceId {
    pub fn new(source: &Path, engine: &str) -> SourceId {
        let stem = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        SourceId {
            stem,
            engine: engine.to_string(),
            path_hash: source_path_hash(source),
        }
    }

    /// File name of the diagnostic output, e.g. `main.cpp_clangsa_1a2b3c4d5e6f.sarif`.
    pub fn diagnostic_file_name(&self) -> String {
        format!("{}_{}_{}.sarif", self.stem, self.engine, self.path_hash)
    }

    /// Directory name of a quarantine bundle for this slot.
    pub fn failure_dir_name(&self) -> String {
        format!("{}_{}_{}", self.stem, self.engine, self.path_hash)
    }

    /// Stem for captured `success/` stdout/stderr pairs.
    pub fn capture_stem(&self) -> String {
        format!("{}_{}_{}", self.stem, self.engine, self.path_hash)
    }

    /// Resolve the diagnostic file path under a report directory.
    pub fn diagnostic_path(&self, report_dir: &Path) -> PathBuf {
        report_dir.join(self.diagnostic_file_name())
    }
}

#[cfg(test)]
#[path = "source_id_tests.rs"]
mod tests;
