// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Implicit compiler configuration probing.
//!
//! Cross compilers ship their own default standard, target triple and
//! system include directories; the analyzers need those spelled out
//! explicitly. Probing runs the compiler in preprocess-only modes that
//! never produce object output: `-E -dM` for the default-standard
//! macros and `-E -v` for the banner with the target and the include
//! search list. Results are cached per (compiler, language) for the
//! run and can be persisted to `compiler_info.json` for later runs.

use crate::error::LogError;
use assay_core::{BuildAction, CompilerInfo, Language};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Probe behavior knobs.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Remove GCC `include-fixed` directories from probed include
    /// paths. Their headers are compiler-internal rewrites that other
    /// frontends misparse.
    pub skip_gcc_fix_headers: bool,
}

/// Run-lifetime cache of compiler configurations.
///
/// Concurrent misses may race to probe the same key; the probe is
/// side-effect-free and deterministic, so the last writer wins with an
/// identical value.
pub struct CompilerInfoCache {
    entries: Mutex<HashMap<(String, Language), Arc<CompilerInfo>>>,
    options: ProbeOptions,
}

impl CompilerInfoCache {
    pub fn new(options: ProbeOptions) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            options,
        }
    }

    /// Build a cache pre-populated from a `compiler_info.json` file.
    /// Pre-populated keys are never probed.
    pub fn with_overrides(options: ProbeOptions, path: &Path) -> Result<Self, LogError> {
        let cache = Self::new(options);
        let stored = read_stored(path)?;
        {
            let mut entries = cache.entries.lock();
            for (compiler, by_lang) in stored {
                for (lang_name, info) in by_lang {
                    let Some(lang) = Language::from_flag_value(&lang_name) else {
                        warn!(compiler, lang = %lang_name, "unknown language in compiler info file");
                        continue;
                    };
                    entries.insert((compiler.clone(), lang), Arc::new(info.into_info()));
                }
            }
        }
        Ok(cache)
    }

    /// Look up or probe the configuration for one compiler/language
    /// pair. Probe failures degrade to an empty configuration.
    pub async fn resolve(&self, compiler: &str, lang: Language) -> Arc<CompilerInfo> {
        let key = (compiler.to_string(), lang);
        if let Some(info) = self.entries.lock().get(&key) {
            return Arc::clone(info);
        }
        let info = Arc::new(probe(compiler, lang, &self.options).await);
        self.entries.lock().insert(key, Arc::clone(&info));
        info
    }

    /// Enrich every analyzable action with its compiler configuration.
    pub async fn enrich_actions(&self, actions: &mut [BuildAction]) {
        for action in actions.iter_mut() {
            if !action.is_analyzable() {
                continue;
            }
            let Some(lang) = action.lang else { continue };
            let info = self.resolve(&action.compiler, lang).await;
            action.enrich(info);
        }
    }

    /// Number of cached (compiler, language) entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Persist the accumulated entries, sorted for stable output.
    pub fn save(&self, path: &Path) -> Result<(), LogError> {
        let mut stored: IndexMap<String, IndexMap<String, StoredInfo>> = IndexMap::new();
        let entries = self.entries.lock();
        let mut keys: Vec<&(String, Language)> = entries.keys().collect();
        keys.sort();
        for key in keys {
            let (compiler, lang) = key;
            if let Some(info) = entries.get(key) {
                stored
                    .entry(compiler.clone())
                    .or_default()
                    .insert(lang.to_string(), StoredInfo::from_info(info));
            }
        }
        let json = serde_json::to_string_pretty(&stored).map_err(|source| LogError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(source),
        })?;
        fs::write(path, json).map_err(|source| LogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// On-disk entry shape: includes carry their `-isystem` spelling.
#[derive(Debug, Serialize, Deserialize)]
struct StoredInfo {
    #[serde(default)]
    compiler_standard: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    compiler_includes: Vec<String>,
}

impl StoredInfo {
    fn from_info(info: &CompilerInfo) -> Self {
        Self {
            compiler_standard: info.standard.clone(),
            target: info.target.clone(),
            compiler_includes: info
                .includes
                .iter()
                .map(|dir| format!("-isystem {}", dir.display()))
                .collect(),
        }
    }

    fn into_info(self) -> CompilerInfo {
        CompilerInfo {
            standard: self.compiler_standard,
            target: self.target,
            includes: self
                .compiler_includes
                .iter()
                .map(|entry| PathBuf::from(entry.strip_prefix("-isystem ").unwrap_or(entry)))
                .collect(),
        }
    }
}

fn read_stored(path: &Path) -> Result<IndexMap<String, IndexMap<String, StoredInfo>>, LogError> {
    let text = fs::read_to_string(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LogError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

async fn probe(compiler: &str, lang: Language, options: &ProbeOptions) -> CompilerInfo {
    let standard = match run_probe(compiler, lang, &["-E", "-dM"]).await {
        Some(output) => parse_standard_macros(lang, &output.stdout),
        None => None,
    };
    let (target, includes) = match run_probe(compiler, lang, &["-E", "-v"]).await {
        Some(output) => parse_verbose_banner(&output.stderr),
        None => (None, Vec::new()),
    };

    let includes = if options.skip_gcc_fix_headers {
        includes
            .into_iter()
            .filter(|dir| !dir.to_string_lossy().ends_with("include-fixed"))
            .collect()
    } else {
        includes
    };

    debug!(compiler, lang = %lang, ?standard, ?target, includes = includes.len(), "probed compiler");
    CompilerInfo {
        standard,
        target,
        includes,
    }
}

struct ProbeOutput {
    stdout: String,
    stderr: String,
}

/// Run the compiler over an empty translation unit. `None` means the
/// probe failed; analysis proceeds with fewer implicit paths.
async fn run_probe(compiler: &str, lang: Language, mode: &[&str]) -> Option<ProbeOutput> {
    let result = tokio::process::Command::new(compiler)
        .arg("-x")
        .arg(lang.as_flag())
        .args(mode)
        .arg("/dev/null")
        .stdin(std::process::Stdio::null())
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => Some(ProbeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(output) => {
            warn!(compiler, lang = %lang, code = ?output.status.code(), "compiler probe failed");
            None
        }
        Err(err) => {
            warn!(compiler, lang = %lang, error = %err, "cannot run compiler probe");
            None
        }
    }
}

/// Pick the default-standard flag out of `-E -dM` macro output.
fn parse_standard_macros(lang: Language, stdout: &str) -> Option<String> {
    let macro_name = match lang {
        Language::C | Language::ObjC => "__STDC_VERSION__",
        Language::Cxx | Language::ObjCxx => "__cplusplus",
    };
    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("#define") || parts.next() != Some(macro_name) {
            continue;
        }
        let Some(raw) = parts.next() else { continue };
        let value = raw.trim_end_matches('L');
        let flag = match lang {
            Language::C | Language::ObjC => standard_flag_c(value),
            Language::Cxx | Language::ObjCxx => standard_flag_cxx(value),
        };
        return flag.map(String::from);
    }
    None
}

fn standard_flag_c(version: &str) -> Option<&'static str> {
    match version {
        "199409" => Some("-std=gnu90"),
        "199901" => Some("-std=gnu99"),
        "201112" => Some("-std=gnu11"),
        "201710" => Some("-std=gnu17"),
        "202311" => Some("-std=gnu23"),
        _ => None,
    }
}

fn standard_flag_cxx(version: &str) -> Option<&'static str> {
    match version {
        "199711" => Some("-std=gnu++98"),
        "201103" => Some("-std=gnu++11"),
        "201402" => Some("-std=gnu++14"),
        "201703" => Some("-std=gnu++17"),
        "202002" => Some("-std=gnu++20"),
        "202302" => Some("-std=gnu++23"),
        _ => None,
    }
}

/// Parse the `-E -v` stderr banner: `Target:` line plus the block
/// between `#include <...> search starts here:` and `End of search
/// list.`. GCC and Clang agree on these markers.
fn parse_verbose_banner(stderr: &str) -> (Option<String>, Vec<PathBuf>) {
    let mut target = None;
    let mut includes = Vec::new();
    let mut in_search_list = false;

    for line in stderr.lines() {
        if let Some(triple) = line.strip_prefix("Target: ") {
            target = Some(triple.trim().to_string());
        } else if line.starts_with("#include <...> search starts here:") {
            in_search_list = true;
        } else if line.starts_with("End of search list.") {
            in_search_list = false;
        } else if in_search_list {
            let dir = line.trim().trim_end_matches(" (framework directory)");
            if !dir.is_empty() {
                includes.push(PathBuf::from(dir));
            }
        }
    }
    (target, includes)
}

#[cfg(test)]
#[path = "compiler_info_tests.rs"]
mod tests;
