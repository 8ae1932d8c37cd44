// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! assay-report: diagnostic model, report identity hashing, fingerprint
//! annotation.
//!
//! Analyzers emit SARIF; this crate reads the subset of it the pipeline
//! cares about, derives [`ReportRecord`]s, computes stable identity hashes
//! over them, and writes the hashes back into each result's
//! `partialFingerprints` so downstream consumers can correlate reports
//! across runs.

pub mod annotate;
pub mod error;
pub mod hash;
pub mod record;
pub mod sarif;

pub use annotate::{annotate_file, annotate_log, FINGERPRINT_KEY};
pub use error::ReportError;
pub use hash::{report_hash, HashMode, LineCache};
pub use record::{BugPathStep, ReportRecord};
pub use sarif::SarifLog;
