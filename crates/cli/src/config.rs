// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `assay.toml` discovery and parsing.
//!
//! Optional per-project defaults for the knobs people set once and
//! forget: worker count, timeout, engine list, analyzer binaries.
//! Command-line flags always win over the file.
//!
//! ```toml
//! jobs = 8
//! timeout = 600
//! analyzers = ["clangsa", "tidy"]
//!
//! [binaries]
//! clangsa = "/opt/llvm/bin/clang"
//! tidy = "clang-tidy"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "assay.toml";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Worker pool size when `-j` is not given.
    pub jobs: Option<usize>,
    /// Per-action timeout in seconds when `--timeout` is not given.
    pub timeout: Option<u64>,
    /// Engines to run when `--analyzers` is not given.
    #[serde(default)]
    pub analyzers: Vec<String>,
    #[serde(default)]
    pub binaries: Binaries,
}

#[derive(Debug, Default, Deserialize)]
pub struct Binaries {
    /// Clang build used for the static analyzer and the CTU tools.
    pub clangsa: Option<String>,
    /// clang-tidy build.
    pub tidy: Option<String>,
}

impl FileConfig {
    /// `./assay.toml`, then `<config dir>/assay/assay.toml`. A missing
    /// file means defaults; a file that will not parse is an error.
    pub fn discover() -> Result<FileConfig> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return FileConfig::load(&local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let fallback = config_dir.join("assay").join(CONFIG_FILE);
            if fallback.is_file() {
                return FileConfig::load(&fallback);
            }
        }
        Ok(FileConfig::default())
    }

    pub fn load(path: &Path) -> Result<FileConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
