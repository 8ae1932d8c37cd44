// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental-analysis ledger.
//!
//! `run_ledger.json` in the output directory remembers, per
//! (source, engine) slot, the digests that produced the current
//! diagnostic file. A slot whose command digest and source digest both
//! still match is skipped on the next run with the file left
//! untouched; a failed slot is forgotten so the next run retries it.

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Ledger file name inside the output directory.
pub const LEDGER_FILE: &str = "run_ledger.json";

/// What produced one diagnostic file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Digest of the full analyzer invocation text.
    pub command_digest: String,
    /// Digest of the source file contents.
    pub source_digest: String,
    /// Diagnostic file name inside the output directory.
    pub diagnostic_file: String,
}

/// Shared, mutation-safe view of the ledger for one run.
#[derive(Debug, Default)]
pub struct RunLedger {
    entries: Mutex<IndexMap<String, LedgerEntry>>,
}

impl RunLedger {
    /// Load the previous run's ledger. A missing or unreadable file
    /// means a full run: first analysis, or after `--clean`.
    pub fn load(dir: &Path) -> RunLedger {
        let entries = fs::read_to_string(dir.join(LEDGER_FILE))
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        RunLedger {
            entries: Mutex::new(entries),
        }
    }

    /// Ledger key of one (source, engine) slot.
    pub fn key(source: &Path, engine: &str) -> String {
        format!("{}|{engine}", source.display())
    }

    /// Whether the slot is up to date with these digests.
    pub fn is_current(&self, key: &str, command_digest: &str, source_digest: &str) -> bool {
        self.entries.lock().get(key).is_some_and(|entry| {
            entry.command_digest == command_digest && entry.source_digest == source_digest
        })
    }

    /// Record a freshly produced diagnostic file.
    pub fn record(&self, key: String, entry: LedgerEntry) {
        self.entries.lock().insert(key, entry);
    }

    /// Drop a slot whose analysis failed, so the next run retries it.
    pub fn forget(&self, key: &str) {
        self.entries.lock().shift_remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Persist the ledger into the output directory.
    pub fn save(&self, dir: &Path) -> Result<(), std::io::Error> {
        let entries = self.entries.lock();
        let json = serde_json::to_string_pretty(&*entries)?;
        fs::write(dir.join(LEDGER_FILE), json)
    }
}

/// Digest of analyzer command text.
pub fn digest_text(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Digest of a file's bytes; `None` when the file cannot be read.
pub fn digest_file(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
