// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure quarantine.
//!
//! A failed or timed-out analysis leaves a self-contained bundle under
//! `failed/`: the verbatim build command, the exact analyzer
//! invocation, the captured stderr, and a byte-for-byte copy of the
//! implicated source under `sources-root/`. Enough to replay the
//! invocation by hand without the original build tree.

use assay_core::{BuildAction, SourceId};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk quarantine bundle of one failed analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureBundle {
    pub dir: PathBuf,
}

impl FailureBundle {
    /// Write a bundle for one failed (action, engine) slot, replacing
    /// any bundle a previous run left for the same slot.
    pub fn write(
        failed_dir: &Path,
        id: &SourceId,
        action: &BuildAction,
        analyzer_command: &str,
        stderr: &[u8],
    ) -> Result<FailureBundle, io::Error> {
        let dir = failed_dir.join(id.failure_dir_name());
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        fs::write(dir.join("build-action"), &action.original_command)?;
        fs::write(dir.join("analyzer-command"), analyzer_command)?;
        fs::write(dir.join("analyzer-stderr.txt"), stderr)?;

        let source = action.source_path();
        let relative = source.strip_prefix("/").unwrap_or(source);
        let copy_to = dir.join("sources-root").join(relative);
        if let Some(parent) = copy_to.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Err(err) = fs::copy(source, &copy_to) {
            // The source may have vanished since the build was logged;
            // the bundle is still useful without it.
            warn!(
                source = %source.display(),
                error = %err,
                "cannot copy source into failure bundle"
            );
        }

        Ok(FailureBundle { dir })
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
