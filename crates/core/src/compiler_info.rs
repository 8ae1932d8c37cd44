// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Implicit per-compiler configuration discovered by probing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Implicit configuration of one (compiler executable, language) pair.
///
/// Populated by the buildlog prober or loaded from a pre-computed
/// `compiler_info.json`; an empty value is valid and means "probe failed,
/// analyze with what the command line already carries".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerInfo {
    /// Default language standard in flag form, e.g. `-std=gnu++14`.
    pub standard: Option<String>,
    /// Default target triple, e.g. `x86_64-unknown-linux-gnu`.
    pub target: Option<String>,
    /// Implicit system include directories, in search order.
    pub includes: Vec<PathBuf>,
}

impl CompilerInfo {
    pub fn is_empty(&self) -> bool {
        self.standard.is_none() && self.target.is_none() && self.includes.is_empty()
    }
}
