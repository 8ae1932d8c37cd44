// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analyzer engine adapters.
//!
//! An engine turns one enriched [`BuildAction`] into a concrete
//! subprocess invocation and knows how to list its checker catalog.
//! The scheduler treats engines as opaque: spawn the invocation, wait,
//! pick up the diagnostic file from wherever the sink says it lands.

use crate::checkers::CheckerToggle;
use crate::config::EngineKind;
use crate::error::EngineError;
use assay_buildlog::join_words;
use assay_core::{BuildAction, SourceId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Per-run inputs an engine needs to build invocations. Shared across
/// engines; per-engine state (binary, checker view) lives in the
/// adapter itself.
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    /// Directory diagnostic files land in.
    pub report_dir: PathBuf,
    /// Use the Z3 constraint solver where the engine supports it.
    pub z3: bool,
    /// Populated CTU artifact directory, when analyzing cross-TU.
    pub ctu_dir: Option<PathBuf>,
}

/// Where an invocation's diagnostics end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticSink {
    /// The engine writes the file itself at this path.
    File(PathBuf),
    /// The engine prints diagnostics on stdout; the scheduler writes
    /// them to this path.
    Stdout(PathBuf),
    /// No diagnostic output (CTU artifact generation).
    None,
}

/// One concrete analyzer subprocess, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub sink: DiagnosticSink,
}

impl Invocation {
    /// The diagnostic file this invocation produces, if any.
    pub fn out_file(&self) -> Option<&Path> {
        match &self.sink {
            DiagnosticSink::File(path) | DiagnosticSink::Stdout(path) => Some(path),
            DiagnosticSink::None => None,
        }
    }

    /// Shell-style rendering for logs and failure bundles.
    pub fn command_text(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.clone());
        words.extend(self.args.iter().cloned());
        join_words(&words)
    }
}

/// One analyzer engine the scheduler can dispatch to.
#[async_trait]
pub trait AnalyzerEngine: Send + Sync {
    /// Which engine this is; names output files and log fields.
    fn kind(&self) -> EngineKind;

    /// List the engine's checker catalog by asking the binary.
    async fn checkers(&self) -> Result<Vec<String>, EngineError>;

    /// Build the analysis invocation for one action.
    fn invocation(&self, action: &BuildAction, ctx: &EngineContext) -> Invocation;
}

/// The Clang static analyzer.
#[derive(Debug, Clone)]
pub struct ClangSa {
    /// The clang driver binary.
    pub binary: String,
    /// The external-definition mapping tool shipped next to clang.
    pub extdef_binary: String,
    /// Validated checker toggles for this engine, specification order.
    pub checkers: Vec<CheckerToggle>,
}

impl ClangSa {
    /// The mapping tool is looked up next to an explicit clang path,
    /// or on `PATH` when the binary is a bare name.
    pub fn new(binary: impl Into<String>) -> ClangSa {
        let binary = binary.into();
        let extdef_binary = sibling_tool(&binary, "clang-extdef-mapping");
        ClangSa {
            binary,
            extdef_binary,
            checkers: Vec::new(),
        }
    }

    /// Where a source's AST artifact lives under the CTU dir. The
    /// absolute source path is mirrored below `ast/` so two sources
    /// with one file name never collide.
    pub fn ast_path(ctu_dir: &Path, source: &Path) -> PathBuf {
        let relative = source.strip_prefix("/").unwrap_or(source);
        let mut path = ctu_dir.join("ast").join(relative).into_os_string();
        path.push(".ast");
        PathBuf::from(path)
    }

    /// AST dump invocation for the CTU collect phase.
    pub fn ast_dump_invocation(&self, action: &BuildAction, ctu_dir: &Path) -> Invocation {
        let ast_file = Self::ast_path(ctu_dir, action.source_path());
        let mut args = vec![
            "-emit-ast".to_string(),
            "-D__clang_analyzer__".to_string(),
            "-w".to_string(),
        ];
        args.extend(implicit_flags(action));
        args.extend(action.analyzer_options.iter().cloned());
        args.push("-o".to_string());
        args.push(ast_file.to_string_lossy().into_owned());
        args.push(action.source_path().to_string_lossy().into_owned());
        Invocation {
            program: self.binary.clone(),
            args,
            sink: DiagnosticSink::None,
        }
    }

    /// External-definition mapping invocation; mapping lines arrive on
    /// stdout as `<symbol> <source path>`.
    pub fn extdef_invocation(&self, action: &BuildAction) -> Invocation {
        let mut args = vec![
            action.source_path().to_string_lossy().into_owned(),
            "--".to_string(),
        ];
        args.extend(implicit_flags(action));
        args.extend(action.analyzer_options.iter().cloned());
        Invocation {
            program: self.extdef_binary.clone(),
            args,
            sink: DiagnosticSink::None,
        }
    }
}

#[async_trait]
impl AnalyzerEngine for ClangSa {
    fn kind(&self) -> EngineKind {
        EngineKind::ClangSa
    }

    async fn checkers(&self) -> Result<Vec<String>, EngineError> {
        let output = Command::new(&self.binary)
            .args(["-cc1", "-analyzer-checker-help"])
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.binary.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(EngineError::CheckerList {
                program: self.binary.clone(),
                code: output.status.code(),
            });
        }
        Ok(parse_sa_catalog(&String::from_utf8_lossy(&output.stdout)))
    }

    fn invocation(&self, action: &BuildAction, ctx: &EngineContext) -> Invocation {
        let id = SourceId::new(action.source_path(), self.kind().name());
        let out_file = id.diagnostic_path(&ctx.report_dir);

        let mut args = vec![
            "--analyze".to_string(),
            "-Xclang".to_string(),
            "-analyzer-output=sarif".to_string(),
        ];
        if let Some(lang) = action.lang {
            args.push("-x".to_string());
            args.push(lang.as_flag().to_string());
        }
        for toggle in &self.checkers {
            args.push("-Xclang".to_string());
            if toggle.enable {
                args.push(format!("-analyzer-checker={}", toggle.name));
            } else {
                args.push(format!("-analyzer-disable-checker={}", toggle.name));
            }
        }
        if ctx.z3 {
            args.push("-Xclang".to_string());
            args.push("-analyzer-constraints=z3".to_string());
        }
        if let Some(dir) = &ctx.ctu_dir {
            args.push("-Xclang".to_string());
            args.push("-analyzer-config".to_string());
            args.push("-Xclang".to_string());
            args.push(format!(
                "experimental-enable-naive-ctu-analysis=true,ctu-dir={}",
                dir.display()
            ));
        }
        args.extend(implicit_flags(action));
        args.extend(action.analyzer_options.iter().cloned());
        args.push("-o".to_string());
        args.push(out_file.to_string_lossy().into_owned());
        args.push(action.source_path().to_string_lossy().into_owned());

        Invocation {
            program: self.binary.clone(),
            args,
            sink: DiagnosticSink::File(out_file),
        }
    }
}

/// The lint-style checker.
#[derive(Debug, Clone)]
pub struct ClangTidy {
    pub binary: String,
    /// Validated checker toggles for this engine, specification order.
    pub checkers: Vec<CheckerToggle>,
}

impl ClangTidy {
    pub fn new(binary: impl Into<String>) -> ClangTidy {
        ClangTidy {
            binary: binary.into(),
            checkers: Vec::new(),
        }
    }
}

#[async_trait]
impl AnalyzerEngine for ClangTidy {
    fn kind(&self) -> EngineKind {
        EngineKind::Tidy
    }

    async fn checkers(&self) -> Result<Vec<String>, EngineError> {
        let output = Command::new(&self.binary)
            .args(["-list-checks", "-checks=*"])
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.binary.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(EngineError::CheckerList {
                program: self.binary.clone(),
                code: output.status.code(),
            });
        }
        Ok(parse_tidy_catalog(&String::from_utf8_lossy(&output.stdout)))
    }

    fn invocation(&self, action: &BuildAction, ctx: &EngineContext) -> Invocation {
        let id = SourceId::new(action.source_path(), self.kind().name());
        let out_file = id.diagnostic_path(&ctx.report_dir);

        let mut args = Vec::new();
        if !self.checkers.is_empty() {
            let list = self
                .checkers
                .iter()
                .map(|toggle| {
                    if toggle.enable {
                        toggle.name.clone()
                    } else {
                        format!("-{}", toggle.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            args.push(format!("-checks={list}"));
        }
        args.push(action.source_path().to_string_lossy().into_owned());
        args.push("--".to_string());
        args.extend(implicit_flags(action));
        args.extend(action.analyzer_options.iter().cloned());

        Invocation {
            program: self.binary.clone(),
            args,
            sink: DiagnosticSink::Stdout(out_file),
        }
    }
}

fn sibling_tool(binary: &str, tool: &str) -> String {
    match Path::new(binary).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(tool).to_string_lossy().into_owned(),
        _ => tool.to_string(),
    }
}

/// Implicit configuration probed from the original compiler, spelled
/// as explicit flags: language standard (only when the command has
/// none of its own), target, system include directories.
fn implicit_flags(action: &BuildAction) -> Vec<String> {
    let mut flags = Vec::new();
    let Some(info) = &action.compiler_info else {
        return flags;
    };
    if let Some(standard) = &info.standard {
        let explicit = action
            .analyzer_options
            .iter()
            .any(|option| option.starts_with("-std="));
        if !explicit {
            flags.push(standard.clone());
        }
    }
    if let Some(target) = action.target.as_ref().or(info.target.as_ref()) {
        flags.push(format!("--target={target}"));
    }
    for dir in &info.includes {
        flags.push("-isystem".to_string());
        flags.push(dir.to_string_lossy().into_owned());
    }
    flags
}

/// Parse `clang -cc1 -analyzer-checker-help` output: indented
/// two-column lines after the `CHECKERS:` header.
fn parse_sa_catalog(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_checkers = false;
    for line in text.lines() {
        if line.trim_end().ends_with("CHECKERS:") {
            in_checkers = true;
            continue;
        }
        if !in_checkers || !line.starts_with(' ') {
            continue;
        }
        if let Some(name) = line.split_whitespace().next() {
            names.push(name.to_string());
        }
    }
    names
}

/// Parse `clang-tidy -list-checks` output: one indented name per line
/// after the `Enabled checks:` header.
fn parse_tidy_catalog(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_checks = false;
    for line in text.lines() {
        if line.starts_with("Enabled checks") {
            in_checks = true;
            continue;
        }
        if !in_checks {
            continue;
        }
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
