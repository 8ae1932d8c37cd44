// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fingerprint annotation of analyzer output.
//!
//! Runs right after an analyzer exits: each result gets its identity hash
//! written into `partialFingerprints`, then the file is saved back in
//! place. Consumers correlate reports across runs by this key alone.

use crate::hash::{report_hash, HashMode, LineCache};
use crate::record::ReportRecord;
use crate::sarif::SarifLog;
use crate::ReportError;
use std::path::Path;
use tracing::debug;

/// Fingerprint key carrying the report identity hash.
pub const FINGERPRINT_KEY: &str = "assayReportHash/v1";

/// Annotate every hashable result in a log. Returns how many were
/// annotated; results without a physical location are left untouched.
pub fn annotate_log(log: &mut SarifLog, mode: HashMode, cache: &mut LineCache) -> usize {
    let mut annotated = 0;
    for result in log.results_mut() {
        let Some(record) = ReportRecord::from_result(result) else {
            continue;
        };
        let hash = report_hash(&record, mode, cache);
        result
            .partial_fingerprints
            .insert(FINGERPRINT_KEY.to_string(), hash);
        annotated += 1;
    }
    annotated
}

/// Annotate a SARIF file in place.
///
/// A file with nothing to annotate is not rewritten, so clean diagnostic
/// files keep their timestamps.
pub fn annotate_file(path: &Path, mode: HashMode) -> Result<usize, ReportError> {
    let mut log = SarifLog::load(path)?;
    let mut cache = LineCache::new();
    let annotated = annotate_log(&mut log, mode, &mut cache);
    if annotated > 0 {
        log.save(path)?;
    }
    debug!(file = %path.display(), annotated, mode = %mode, "annotated diagnostic file");
    Ok(annotated)
}

#[cfg(test)]
#[path = "annotate_tests.rs"]
mod tests;
